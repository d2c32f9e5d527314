//! Save protocol: validate, project, dispatch, reconcile.
//!
//! A save is split around the store call so the buffer lock is never held
//! while the request is outstanding. The operator can keep editing; on
//! success the buffer is re-baselined to the snapshot that was actually sent.

use thiserror::Error;

use crate::helpers::{format_failure, password_confirmed};
use crate::models::{StoragePayload, StorageResource};
use crate::store::{StorageStore, StoreError, StoreScope};

use super::edit_buffer::{EditBuffer, SharedEditBuffer};

/// Lifecycle of a single save invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    Idle,
    Validating,
    Submitting,
    Rejected,
    Succeeded,
    Failed,
}

impl SavePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SavePhase::Rejected | SavePhase::Succeeded | SavePhase::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Create,
    Update,
}

impl SaveAction {
    pub fn label(self) -> &'static str {
        match self {
            SaveAction::Create => "create",
            SaveAction::Update => "update",
        }
    }
}

/// Local, pre-submission rejection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("password mismatch")]
    PasswordMismatch,

    /// The id of a saved resource was edited.
    #[error("storage id cannot change from '{saved}' to '{edited}'")]
    IdChanged { saved: String, edited: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{} failed: {source}", action.label())]
    Transport {
        action: SaveAction,
        #[source]
        source: StoreError,
    },

    #[error("a save is already in progress")]
    InFlight,
}

impl SaveError {
    /// Terminal phase this error leaves the save in.
    pub fn phase(&self) -> SavePhase {
        match self {
            SaveError::Validation(_) | SaveError::InFlight => SavePhase::Rejected,
            SaveError::Transport { .. } => SavePhase::Failed,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SaveError::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            SaveError::Transport { source, .. } => source.body(),
            _ => None,
        }
    }

    /// "409 already exists" style description of a transport failure.
    pub fn describe(&self) -> String {
        match self {
            SaveError::Transport { .. } => format_failure(self.status(), self.body()),
            other => other.to_string(),
        }
    }
}

/// Successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created { id: String, location: Option<String> },
    Updated { id: String },
}

impl SaveOutcome {
    pub fn id(&self) -> &str {
        match self {
            SaveOutcome::Created { id, .. } | SaveOutcome::Updated { id } => id,
        }
    }
}

/// A validated, projected save waiting for the store.
#[derive(Debug, Clone)]
pub struct PendingSave {
    pub action: SaveAction,
    pub scope: StoreScope,
    pub payload: StoragePayload,
    /// Working copy at the moment the payload was built
    pub snapshot: StorageResource,
}

/// Validates, submits and reconciles edits for one application's storage.
#[derive(Debug, Clone)]
pub struct SaveCoordinator {
    app_id: String,
}

impl SaveCoordinator {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self { app_id: app_id.into() }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Validate the buffer and build the request. Does not touch the buffer.
    pub fn prepare(
        &self,
        buffer: &EditBuffer,
        confirmation: &str,
    ) -> Result<PendingSave, SaveError> {
        let working = buffer.working();
        if !password_confirmed(working.password(), confirmation) {
            log::debug!("Rejecting save of '{}': password mismatch", working.id);
            return Err(ValidationError::PasswordMismatch.into());
        }

        let (action, scope) = if buffer.is_create_mode() {
            (SaveAction::Create, StoreScope::application(&self.app_id))
        } else {
            let saved = &buffer.pristine().id;
            if working.id != *saved {
                log::debug!("Rejecting save of '{saved}': id edited to '{}'", working.id);
                return Err(ValidationError::IdChanged {
                    saved: saved.clone(),
                    edited: working.id.clone(),
                }
                .into());
            }
            (SaveAction::Update, StoreScope::resource(&self.app_id, saved))
        };
        let payload = StoragePayload::from_resource(working);

        Ok(PendingSave { action, scope, payload, snapshot: working.clone() })
    }

    /// Send a prepared save. Returns the `Location` of a created resource.
    pub async fn dispatch<S: StorageStore>(
        &self,
        store: &S,
        pending: &PendingSave,
    ) -> Result<Option<String>, StoreError> {
        match pending.action {
            SaveAction::Create => {
                log::debug!("Creating new storage resource: {}", pending.payload.id);
                let created = store.create(&pending.scope, &pending.payload).await?;
                Ok(created.location)
            }
            SaveAction::Update => {
                log::debug!("Updating storage resource: {}", pending.payload.id);
                store.update(&pending.scope, &pending.payload).await?;
                Ok(None)
            }
        }
    }

    /// Apply the store's answer to the buffer. Failures leave it untouched.
    pub fn reconcile(
        &self,
        buffer: &mut EditBuffer,
        pending: PendingSave,
        result: Result<Option<String>, StoreError>,
    ) -> Result<SaveOutcome, SaveError> {
        let location = match result {
            Ok(location) => location,
            Err(source) => {
                log::warn!(
                    "Failed to {} storage '{}': {source}",
                    pending.action.label(),
                    pending.payload.id
                );
                return Err(SaveError::Transport { action: pending.action, source });
            }
        };

        let id = pending.payload.id.clone();
        buffer.rebaseline_to(pending.snapshot);
        log::info!("Saved storage '{id}' ({})", pending.action.label());

        Ok(match pending.action {
            SaveAction::Create => SaveOutcome::Created { id, location },
            SaveAction::Update => SaveOutcome::Updated { id },
        })
    }

    /// Full save against a shared buffer.
    pub async fn save<S: StorageStore>(
        &self,
        store: &S,
        buffer: &SharedEditBuffer,
        confirmation: &str,
    ) -> Result<SaveOutcome, SaveError> {
        let pending = {
            let buffer = buffer.lock();
            self.prepare(&buffer, confirmation)?
        };

        let result = self.dispatch(store, &pending).await;

        let mut buffer = buffer.lock();
        self.reconcile(&mut buffer, pending, result)
    }
}
