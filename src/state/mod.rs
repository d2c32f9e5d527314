// Console state: edit buffers, save protocol, settings, feedback

pub mod config;
pub mod edit_buffer;
pub mod navigation;
pub mod save;
pub mod settings;
pub mod status;

pub use config::ConfigManager;
pub use edit_buffer::{EditBuffer, SharedEditBuffer};
pub use navigation::{
    Breadcrumb, CREATED_PARAM, Location, NavigationHistory, Navigator, editor_breadcrumbs,
    storage_breadcrumbs,
};
pub use save::{
    PendingSave, SaveAction, SaveCoordinator, SaveError, SaveOutcome, SavePhase, ValidationError,
};
pub use settings::ConsoleSettings;
pub use status::{LogNotifier, Notifier, StatusLevel, StatusLog, StatusMessage};
