// Canonical wire payload for create/update requests

use serde::{Deserialize, Serialize};

use super::storage::{Credential, MONGODB_CR, Server, StorageKind, StorageResource};

/// Body sent to the storage-resource store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePayload {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: StorageKind,
    pub config: StorageConfig,
}

/// Type-specific connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StorageConfig {
    Mongo(MongoConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MongoConfig {
    pub db: String,
    pub servers: Vec<Server>,
    pub credentials: Vec<Credential>,
}

impl StoragePayload {
    /// Project an edited resource into the shape the server accepts.
    ///
    /// Only credential 0 is carried, its mechanism is forced to `MONGODB-CR`
    /// and its database is forced to the resource's `db`.
    pub fn from_resource(resource: &StorageResource) -> Self {
        let config = match resource.kind {
            StorageKind::Mongo => {
                let (username, password) = resource
                    .primary_credential()
                    .map(|c| (c.username.clone(), c.password.clone()))
                    .unwrap_or_default();
                StorageConfig::Mongo(MongoConfig {
                    db: resource.db.clone(),
                    servers: resource.servers.clone(),
                    credentials: vec![Credential {
                        mechanism: MONGODB_CR.to_string(),
                        username,
                        password,
                        database: resource.db.clone(),
                    }],
                })
            }
        };

        Self { id: resource.id.clone(), kind: resource.kind, config }
    }

    pub fn mongo(&self) -> Option<&MongoConfig> {
        match &self.config {
            StorageConfig::Mongo(config) => Some(config),
        }
    }
}

impl From<&StorageResource> for StoragePayload {
    fn from(resource: &StorageResource) -> Self {
        Self::from_resource(resource)
    }
}
