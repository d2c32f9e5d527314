// Collection envelopes and list-row projection

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::storage::StorageKind;

/// An application as returned by the application list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Application {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }

    /// Display name, falling back to the id when the server sent none.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCollection {
    #[serde(rename = "_members", default)]
    pub members: Vec<Application>,
}

/// Raw storage collection. Members are kept untyped because an application's
/// resources include more than storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageCollection {
    #[serde(rename = "_members", default)]
    pub members: Vec<Value>,
}

impl StorageCollection {
    /// Rows for every member that looks like a storage resource.
    pub fn rows(&self) -> Vec<StorageRow> {
        self.members.iter().filter_map(StorageRow::from_member).collect()
    }
}

/// Summary of one storage resource for the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageRow {
    pub provider: String,
    pub path: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: String,
}

impl StorageRow {
    /// Project a collection member. Members without a `db` are not storage.
    pub fn from_member(member: &Value) -> Option<Self> {
        let database = member.get("db")?.as_str()?.to_string();
        let path = member.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
        let server = member.get("servers").and_then(Value::as_array).and_then(|s| s.first());
        let host = server.and_then(|s| s.get("host")).and_then(Value::as_str).map(String::from);
        let port = server
            .and_then(|s| s.get("port"))
            .and_then(Value::as_u64)
            .and_then(|p| u16::try_from(p).ok());

        Some(Self { provider: StorageKind::Mongo.label().to_string(), path, host, port, database })
    }

    /// `host:port` for display, empty when the resource lists no server.
    pub fn endpoint(&self) -> String {
        match (&self.host, self.port) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.clone(),
            _ => String::new(),
        }
    }
}
