// Storage resource models

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::helpers::REDACTED_PASSWORD;

/// Authentication mechanism written into every credential we submit.
pub const MONGODB_CR: &str = "MONGODB-CR";

pub const DEFAULT_MONGO_HOST: &str = "localhost";
pub const DEFAULT_MONGO_PORT: u16 = 27017;

/// Storage engine family. Determines which connection shape applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Mongo,
}

impl StorageKind {
    /// Wire name, as sent in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Mongo => "mongo",
        }
    }

    /// Human-readable provider name for list rows.
    pub fn label(self) -> &'static str {
        match self {
            StorageKind::Mongo => "Mongo DB",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mongo" => Some(StorageKind::Mongo),
            _ => None,
        }
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `host:port` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new(DEFAULT_MONGO_HOST, DEFAULT_MONGO_PORT)
    }
}

/// Credential record. Only index 0 of a resource's credentials is edited.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default = "default_mechanism")]
    pub mechanism: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub database: String,
}

fn default_mechanism() -> String {
    MONGODB_CR.to_string()
}

impl Default for Credential {
    fn default() -> Self {
        Self {
            mechanism: default_mechanism(),
            username: String::new(),
            password: String::new(),
            database: String::new(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let password = if self.password.is_empty() { "" } else { REDACTED_PASSWORD };
        f.debug_struct("Credential")
            .field("mechanism", &self.mechanism)
            .field("username", &self.username)
            .field("password", &password)
            .field("database", &self.database)
            .finish()
    }
}

/// A storage resource attached to an application.
///
/// Equality is structural over every field, which is what the edit buffer
/// uses to decide whether the working copy has diverged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStorageResource")]
pub struct StorageResource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: StorageKind,
    pub db: String,
    pub servers: Vec<Server>,
    pub credentials: Vec<Credential>,
}

impl StorageResource {
    /// Empty template used when creating a new resource.
    pub fn blank() -> Self {
        Self {
            id: String::new(),
            kind: StorageKind::Mongo,
            db: String::new(),
            servers: vec![Server::default()],
            credentials: vec![Credential::default()],
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    pub fn primary_server(&self) -> Option<&Server> {
        self.servers.first()
    }

    pub fn primary_credential(&self) -> Option<&Credential> {
        self.credentials.first()
    }

    /// Password of credential 0, empty when there is no credential.
    pub fn password(&self) -> &str {
        self.primary_credential().map(|c| c.password.as_str()).unwrap_or_default()
    }

    /// Mutable access to credential 0, created on demand.
    pub fn credential_mut(&mut self) -> &mut Credential {
        if self.credentials.is_empty() {
            self.credentials.push(Credential::default());
        }
        &mut self.credentials[0]
    }
}

/// Server-side representation. Older servers omit `type` and expose the
/// driver options under `MongoClientOptions` instead.
#[derive(Deserialize)]
struct RawStorageResource {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    db: Option<String>,
    #[serde(default)]
    servers: Vec<Server>,
    #[serde(default)]
    credentials: Vec<Credential>,
    #[serde(rename = "MongoClientOptions", default)]
    mongo_client_options: Option<serde_json::Value>,
}

impl TryFrom<RawStorageResource> for StorageResource {
    type Error = Error;

    fn try_from(raw: RawStorageResource) -> Result<Self, Self::Error> {
        let kind = match raw.kind.as_deref() {
            Some(name) => StorageKind::parse(name)
                .ok_or_else(|| Error::Decode(format!("unsupported storage type '{name}'")))?,
            None if raw.mongo_client_options.is_some() || raw.db.is_some() => StorageKind::Mongo,
            None => {
                return Err(Error::Decode(format!(
                    "cannot determine storage type of resource '{}'",
                    raw.id
                )));
            }
        };

        Ok(Self {
            id: raw.id,
            kind,
            db: raw.db.unwrap_or_default(),
            servers: raw.servers,
            credentials: raw.credentials,
        })
    }
}
