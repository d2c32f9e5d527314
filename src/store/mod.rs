//! Remote persistence for storage resources.

mod http;

use std::future::Future;

use thiserror::Error;

use crate::helpers::format_failure;
use crate::models::{Application, StorageCollection, StoragePayload, StorageResource};

pub use http::HttpStorageStore;

/// Failure of a store call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The server answered with a non-2xx status.
    #[error("server returned {}", format_failure(Some(*status), body.as_deref()))]
    Status { status: u16, body: Option<String> },

    /// The request never produced a response (refused, timed out, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered 2xx with a body we could not decode.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            StoreError::Status { body, .. } => body.as_deref(),
            StoreError::Transport(message) | StoreError::Decode(message) => Some(message),
        }
    }
}

/// Where a create or update request is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreScope {
    /// The storage collection of an application
    Application { app_id: String },
    /// One existing storage resource
    Resource { app_id: String, resource_id: String },
}

impl StoreScope {
    pub fn application(app_id: impl Into<String>) -> Self {
        Self::Application { app_id: app_id.into() }
    }

    pub fn resource(app_id: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::Resource { app_id: app_id.into(), resource_id: resource_id.into() }
    }

    pub fn app_id(&self) -> &str {
        match self {
            Self::Application { app_id } | Self::Resource { app_id, .. } => app_id,
        }
    }

    pub fn resource_id(&self) -> Option<&str> {
        match self {
            Self::Resource { resource_id, .. } => Some(resource_id),
            Self::Application { .. } => None,
        }
    }
}

/// Result of a successful create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: String,
    /// `Location` header, when the server sent one
    pub location: Option<String>,
}

/// Storage-resource persistence used by the console controllers.
pub trait StorageStore: Send + Sync {
    fn list(
        &self,
        app_id: &str,
    ) -> impl Future<Output = Result<StorageCollection, StoreError>> + Send;

    fn get(
        &self,
        app_id: &str,
        resource_id: &str,
    ) -> impl Future<Output = Result<StorageResource, StoreError>> + Send;

    fn create(
        &self,
        scope: &StoreScope,
        payload: &StoragePayload,
    ) -> impl Future<Output = Result<Created, StoreError>> + Send;

    fn update(
        &self,
        scope: &StoreScope,
        payload: &StoragePayload,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Source of the sibling applications shown in navigation.
pub trait ApplicationDirectory: Send + Sync {
    fn applications(&self) -> impl Future<Output = Result<Vec<Application>, StoreError>> + Send;
}
