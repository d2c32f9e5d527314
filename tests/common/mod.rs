//! Common test utilities for integration tests.
//!
//! `MemoryStore` stands in for the remote admin API. Writes can be made to
//! fail with a given status, or held at a gate so a test can interleave edits
//! with an outstanding save.

#![allow(dead_code)]

pub mod http;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{Notify, oneshot};

use storage_console::models::{
    Application, Credential, Server, StorageCollection, StorageKind, StoragePayload,
    StorageResource,
};
use storage_console::store::{ApplicationDirectory, Created, StorageStore, StoreError, StoreScope};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List { app_id: String },
    Get { app_id: String, resource_id: String },
    Create { scope: StoreScope, payload: StoragePayload },
    Update { scope: StoreScope, payload: StoragePayload },
}

#[derive(Default)]
pub struct MemoryStore {
    calls: Mutex<Vec<StoreCall>>,
    members: Mutex<Vec<Value>>,
    applications: Mutex<Vec<Application>>,
    next_failure: Mutex<Option<StoreError>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    write_started: Notify,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: Vec<Value>) -> Self {
        let store = Self::new();
        *store.members.lock() = members;
        store
    }

    pub fn set_applications(&self, applications: Vec<Application>) {
        *self.applications.lock() = applications;
    }

    /// Make the next call (any kind) fail with `err`.
    pub fn fail_next(&self, err: StoreError) {
        *self.next_failure.lock() = Some(err);
    }

    /// Hold the next write until the returned sender fires.
    pub fn hold_next_write(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock() = Some(rx);
        tx
    }

    /// Resolves once a write has reached the store.
    pub async fn wait_for_write(&self) {
        self.write_started.notified().await;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, StoreCall::Create { .. } | StoreCall::Update { .. }))
            .collect()
    }

    fn take_failure(&self) -> Result<(), StoreError> {
        match self.next_failure.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn pass_gate(&self) {
        self.write_started.notify_one();
        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    fn store_payload(&self, payload: &StoragePayload) {
        let member = serde_json::to_value(payload_as_resource(payload)).unwrap();
        let mut members = self.members.lock();
        members.retain(|m| m.get("id").and_then(Value::as_str) != Some(payload.id.as_str()));
        members.push(member);
    }
}

fn payload_as_resource(payload: &StoragePayload) -> StorageResource {
    let config = payload.mongo().expect("mongo payload");
    StorageResource {
        id: payload.id.clone(),
        kind: payload.kind,
        db: config.db.clone(),
        servers: config.servers.clone(),
        credentials: config.credentials.clone(),
    }
}

impl StorageStore for MemoryStore {
    async fn list(&self, app_id: &str) -> Result<StorageCollection, StoreError> {
        self.calls.lock().push(StoreCall::List { app_id: app_id.to_string() });
        self.take_failure()?;
        Ok(StorageCollection { members: self.members.lock().clone() })
    }

    async fn get(&self, app_id: &str, resource_id: &str) -> Result<StorageResource, StoreError> {
        self.calls.lock().push(StoreCall::Get {
            app_id: app_id.to_string(),
            resource_id: resource_id.to_string(),
        });
        self.take_failure()?;
        let member = self
            .members
            .lock()
            .iter()
            .find(|m| m.get("id").and_then(Value::as_str) == Some(resource_id))
            .cloned()
            .ok_or(StoreError::Status { status: 404, body: None })?;
        serde_json::from_value(member).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn create(
        &self,
        scope: &StoreScope,
        payload: &StoragePayload,
    ) -> Result<Created, StoreError> {
        self.calls
            .lock()
            .push(StoreCall::Create { scope: scope.clone(), payload: payload.clone() });
        self.pass_gate().await;
        self.take_failure()?;
        self.store_payload(payload);
        let location = format!("/admin/applications/{}/resources/{}", scope.app_id(), payload.id);
        Ok(Created { id: payload.id.clone(), location: Some(location) })
    }

    async fn update(&self, scope: &StoreScope, payload: &StoragePayload) -> Result<(), StoreError> {
        self.calls
            .lock()
            .push(StoreCall::Update { scope: scope.clone(), payload: payload.clone() });
        self.pass_gate().await;
        self.take_failure()?;
        self.store_payload(payload);
        Ok(())
    }
}

impl ApplicationDirectory for MemoryStore {
    async fn applications(&self) -> Result<Vec<Application>, StoreError> {
        Ok(self.applications.lock().clone())
    }
}

/// A saved resource as the server would return it.
pub fn existing_resource(id: &str) -> StorageResource {
    StorageResource {
        id: id.to_string(),
        kind: StorageKind::Mongo,
        db: "mydb".to_string(),
        servers: vec![Server::new("h", 27017)],
        credentials: vec![Credential {
            username: "u".to_string(),
            password: "p".to_string(),
            database: "mydb".to_string(),
            ..Credential::default()
        }],
    }
}

pub fn shop() -> Application {
    Application::new("shop", "Shop")
}
