// View controllers
pub mod storage_editor;
pub mod storage_list;

use std::sync::Arc;

use crate::helpers::format_failure;
use crate::models::Application;
use crate::state::{Navigator, Notifier};
use crate::store::{ApplicationDirectory, StorageStore};

pub use storage_editor::StorageEditor;
pub use storage_list::StorageListView;

/// Collaborators shared by the storage views.
pub struct ConsoleServices<S> {
    pub store: Arc<S>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

impl<S: StorageStore> ConsoleServices<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, notifier, navigator }
    }
}

impl<S> Clone for ConsoleServices<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            notifier: self.notifier.clone(),
            navigator: self.navigator.clone(),
        }
    }
}

/// Fetch sibling applications for navigation. A failure is reported and
/// yields an empty list; the view stays usable.
pub(crate) async fn load_applications<D: ApplicationDirectory>(
    directory: &D,
    notifier: &dyn Notifier,
) -> Vec<Application> {
    match directory.applications().await {
        Ok(applications) => applications,
        Err(err) => {
            log::warn!("Failed to load applications: {err}");
            notifier.error(&format!(
                "Failed to load applications ({})",
                format_failure(err.status(), err.body())
            ));
            Vec::new()
        }
    }
}
