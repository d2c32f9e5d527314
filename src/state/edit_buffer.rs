//! Working/pristine pair for a storage resource being edited.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::StorageResource;

/// Edit buffer shared between a view controller and an in-flight save.
pub type SharedEditBuffer = Arc<Mutex<EditBuffer>>;

/// Holds the operator's working copy next to the last-saved snapshot.
///
/// `is_dirty` is never set on its own: every operation that touches either
/// copy recomputes it as `working != pristine`.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    working: StorageResource,
    pristine: StorageResource,
    create_mode: bool,
    dirty: bool,
    password_confirmation: String,
}

impl EditBuffer {
    /// Open a buffer on an existing resource (edit mode) or, when `source`
    /// is absent or has no id, on the blank template (create mode).
    pub fn initialize(source: Option<StorageResource>) -> Self {
        let (resource, create_mode) = match source {
            Some(resource) if resource.has_id() => (resource, false),
            _ => (StorageResource::blank(), true),
        };

        Self {
            working: resource.clone(),
            pristine: resource,
            create_mode,
            dirty: false,
            password_confirmation: String::new(),
        }
    }

    pub fn shared(self) -> SharedEditBuffer {
        Arc::new(Mutex::new(self))
    }

    /// Apply an in-place change to the working copy.
    pub fn mutate<R>(&mut self, updater: impl FnOnce(&mut StorageResource) -> R) -> R {
        let result = updater(&mut self.working);
        self.recompute_dirty();
        result
    }

    /// Discard unsaved edits.
    pub fn reset(&mut self) {
        self.working = self.pristine.clone();
        self.dirty = false;
    }

    /// Promote the current working copy to pristine.
    pub fn rebaseline(&mut self) {
        self.pristine = self.working.clone();
        self.dirty = false;
    }

    /// Promote `snapshot` (what was actually persisted) to pristine. Edits
    /// made after the snapshot was taken keep the buffer dirty.
    pub fn rebaseline_to(&mut self, snapshot: StorageResource) {
        self.pristine = snapshot;
        self.recompute_dirty();
    }

    pub fn working(&self) -> &StorageResource {
        &self.working
    }

    pub fn pristine(&self) -> &StorageResource {
        &self.pristine
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_create_mode(&self) -> bool {
        self.create_mode
    }

    pub fn password_confirmation(&self) -> &str {
        &self.password_confirmation
    }

    /// The confirmation is not part of the resource and never affects
    /// `is_dirty`.
    pub fn set_password_confirmation(&mut self, confirmation: impl Into<String>) {
        self.password_confirmation = confirmation.into();
    }

    fn recompute_dirty(&mut self) {
        self.dirty = self.working != self.pristine;
    }
}
