//! Create/edit view controller for a single storage resource.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::helpers::format_failure;
use crate::models::{Application, StorageResource};
use crate::state::{
    Breadcrumb, EditBuffer, Location, SaveAction, SaveCoordinator, SaveError, SaveOutcome,
    SavePhase, SharedEditBuffer, ValidationError, editor_breadcrumbs,
};
use crate::store::{ApplicationDirectory, StorageStore, StoreError};

use super::{ConsoleServices, load_applications};

pub const PASSWORD_MISMATCH_MESSAGE: &str = "Password does not match the password confirmation.";
pub const CREATED_MESSAGE: &str = "New storage successfully created.";
pub const UPDATED_MESSAGE: &str = "Storage successfully updated.";
pub const ID_CHANGED_MESSAGE: &str = "The id of a saved storage cannot be changed.";
pub const IN_FLIGHT_MESSAGE: &str = "A save is already in progress.";

/// Owns the edit buffer of one storage resource and drives its save.
///
/// All methods take `&self` so the operator can keep editing while a
/// `submit` is awaiting the store.
pub struct StorageEditor<S> {
    app: Application,
    services: ConsoleServices<S>,
    coordinator: SaveCoordinator,
    buffer: SharedEditBuffer,
    breadcrumbs: Vec<Breadcrumb>,
    applications: Mutex<Vec<Application>>,
    phase: Mutex<SavePhase>,
    in_flight: AtomicBool,
}

/// Accept a fetched resource only if it carries the id it was fetched by.
fn requested(id: &str, resource: StorageResource) -> Result<StorageResource, StoreError> {
    if resource.id != id {
        return Err(StoreError::Decode(format!(
            "expected storage '{id}', server returned '{}'",
            resource.id
        )));
    }
    Ok(resource)
}

/// Clears the in-flight flag however `submit` exits.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<S: StorageStore> StorageEditor<S> {
    /// Open the editor on `source` (edit mode) or a blank template.
    pub fn open(
        app: Application,
        source: Option<StorageResource>,
        services: ConsoleServices<S>,
    ) -> Self {
        let buffer = EditBuffer::initialize(source);
        let resource_id =
            if buffer.is_create_mode() { None } else { Some(buffer.working().id.clone()) };
        log::debug!(
            "Opening storage editor for app '{}' ({})",
            app.id,
            resource_id.as_deref().unwrap_or("new")
        );

        Self {
            breadcrumbs: editor_breadcrumbs(&app, resource_id.as_deref()),
            coordinator: SaveCoordinator::new(app.id.clone()),
            app,
            services,
            buffer: buffer.shared(),
            applications: Mutex::new(Vec::new()),
            phase: Mutex::new(SavePhase::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Fetch the resource named by `resource_id` (or start blank) together
    /// with the sibling applications.
    pub async fn load<D: ApplicationDirectory>(
        app: Application,
        resource_id: Option<&str>,
        services: ConsoleServices<S>,
        directory: &D,
    ) -> Result<Self, StoreError> {
        let notifier = services.notifier.clone();
        let fetch = async {
            match resource_id {
                Some(id) => {
                    let resource = services.store.get(&app.id, id).await;
                    resource.and_then(|r| requested(id, r)).map(Some)
                }
                None => Ok(None),
            }
        };
        let (source, applications) =
            futures::join!(fetch, load_applications(directory, notifier.as_ref()));

        let source = source.inspect_err(|err| {
            log::error!("Failed to load storage: {err}");
            notifier.error(&format!(
                "Failed to load storage ({})",
                format_failure(err.status(), err.body())
            ));
        })?;

        let editor = Self::open(app, source, services);
        *editor.applications.lock() = applications;
        Ok(editor)
    }

    pub fn app(&self) -> &Application {
        &self.app
    }

    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    pub fn applications(&self) -> Vec<Application> {
        self.applications.lock().clone()
    }

    /// Handle to the underlying buffer
    pub fn buffer(&self) -> SharedEditBuffer {
        self.buffer.clone()
    }

    pub fn working(&self) -> StorageResource {
        self.buffer.lock().working().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.lock().is_dirty()
    }

    pub fn is_create_mode(&self) -> bool {
        self.buffer.lock().is_create_mode()
    }

    pub fn phase(&self) -> SavePhase {
        *self.phase.lock()
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Edit the working copy.
    pub fn edit<R>(&self, updater: impl FnOnce(&mut StorageResource) -> R) -> R {
        self.buffer.lock().mutate(updater)
    }

    pub fn set_password_confirmation(&self, confirmation: impl Into<String>) {
        self.buffer.lock().set_password_confirmation(confirmation);
    }

    /// Discard unsaved edits.
    pub fn clear(&self) {
        self.buffer.lock().reset();
    }

    /// Validate and persist the working copy, reporting the outcome to the
    /// operator. On create success, navigates to the storage list with the
    /// new id as the `created` marker.
    pub async fn submit(&self) -> Result<SaveOutcome, SaveError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.services.notifier.error(IN_FLIGHT_MESSAGE);
            return Err(SaveError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        self.set_phase(SavePhase::Validating);
        let prepared = {
            let buffer = self.buffer.lock();
            self.coordinator.prepare(&buffer, buffer.password_confirmation())
        };
        let pending = match prepared {
            Ok(pending) => pending,
            Err(err) => {
                self.set_phase(SavePhase::Rejected);
                let message = match &err {
                    SaveError::Validation(ValidationError::IdChanged { .. }) => ID_CHANGED_MESSAGE,
                    _ => PASSWORD_MISMATCH_MESSAGE,
                };
                self.services.notifier.error(message);
                return Err(err);
            }
        };

        self.set_phase(SavePhase::Submitting);
        let action = pending.action;
        let result = self.coordinator.dispatch(self.services.store.as_ref(), &pending).await;
        let outcome = {
            let mut buffer = self.buffer.lock();
            self.coordinator.reconcile(&mut buffer, pending, result)
        };

        match &outcome {
            Ok(SaveOutcome::Created { id, .. }) => {
                self.set_phase(SavePhase::Succeeded);
                self.services.notifier.success(CREATED_MESSAGE);
                self.services.navigator.navigate(Location::storage_created(&self.app.id, id));
            }
            Ok(SaveOutcome::Updated { .. }) => {
                self.set_phase(SavePhase::Succeeded);
                self.services.notifier.success(UPDATED_MESSAGE);
            }
            Err(err) => {
                self.set_phase(err.phase());
                let verb = match action {
                    SaveAction::Create => "create new",
                    SaveAction::Update => "update",
                };
                self.services
                    .notifier
                    .error(&format!("Failed to {verb} storage ({})", err.describe()));
            }
        }

        outcome
    }

    fn set_phase(&self, phase: SavePhase) {
        *self.phase.lock() = phase;
    }
}
