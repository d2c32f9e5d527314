//! Storage list view controller.

use crate::helpers::format_failure;
use crate::models::{Application, StorageCollection, StorageRow};
use crate::state::{Breadcrumb, Location, Notifier, storage_breadcrumbs};
use crate::store::{ApplicationDirectory, StorageStore, StoreError};

use super::load_applications;

pub struct StorageListView {
    app: Application,
    rows: Vec<StorageRow>,
    created_id: Option<String>,
    breadcrumbs: Vec<Breadcrumb>,
    applications: Vec<Application>,
}

impl StorageListView {
    /// Build the view from an already-fetched collection. `location` is the
    /// location the view was opened at; its `created` marker is kept.
    pub fn new(
        app: Application,
        collection: &StorageCollection,
        location: Option<&Location>,
    ) -> Self {
        Self {
            breadcrumbs: storage_breadcrumbs(&app),
            rows: collection.rows(),
            created_id: location.and_then(Location::created_id).map(String::from),
            applications: Vec::new(),
            app,
        }
    }

    /// Fetch the storage collection and the sibling applications.
    pub async fn load<S, D>(
        app: Application,
        store: &S,
        directory: &D,
        location: Option<&Location>,
        notifier: &dyn Notifier,
    ) -> Result<Self, StoreError>
    where
        S: StorageStore,
        D: ApplicationDirectory,
    {
        let (collection, applications) =
            futures::join!(store.list(&app.id), load_applications(directory, notifier));

        let collection = collection.inspect_err(|err| {
            log::error!("Failed to list storage for '{}': {err}", app.id);
            notifier.error(&format!(
                "Failed to load storage ({})",
                format_failure(err.status(), err.body())
            ));
        })?;

        let mut view = Self::new(app, &collection, location);
        view.applications = applications;
        Ok(view)
    }

    pub fn app(&self) -> &Application {
        &self.app
    }

    pub fn rows(&self) -> &[StorageRow] {
        &self.rows
    }

    pub fn breadcrumbs(&self) -> &[Breadcrumb] {
        &self.breadcrumbs
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// Id of the resource created just before navigating here
    pub fn created_id(&self) -> Option<&str> {
        self.created_id.as_deref()
    }

    pub fn is_just_created(&self, row: &StorageRow) -> bool {
        self.created_id.as_deref() == Some(row.path.as_str())
    }
}
