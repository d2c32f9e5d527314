//! Console locations and breadcrumb trails.

use parking_lot::Mutex;

use crate::models::Application;

/// Query key carrying the id of a resource that was just created.
pub const CREATED_PARAM: &str = "created";

/// A console path plus ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), query: Vec::new() }
    }

    /// Set a query parameter, replacing any earlier value for `key`.
    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.retain(|(k, _)| k != key);
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Storage list of an application
    pub fn storage_list(app_id: &str) -> Self {
        Self::new(format!("applications/{app_id}/storage"))
    }

    /// Storage list with the "just created" marker
    pub fn storage_created(app_id: &str, resource_id: &str) -> Self {
        Self::storage_list(app_id).with_query(CREATED_PARAM, resource_id)
    }

    pub fn created_id(&self) -> Option<&str> {
        self.get_query(CREATED_PARAM)
    }

    /// Render as `path?key=value&...`.
    pub fn to_url(&self) -> String {
        let mut output = self.path.clone();
        for (idx, (key, value)) in self.query.iter().enumerate() {
            output.push(if idx == 0 { '?' } else { '&' });
            output.push_str(key);
            output.push('=');
            output.push_str(value);
        }
        output
    }
}

/// Accepts navigation requests from controllers.
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: Location);
}

/// Remembers every requested location; the CLI and tests read it back.
#[derive(Debug, Default)]
pub struct NavigationHistory {
    visited: Mutex<Vec<Location>>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Location> {
        self.visited.lock().last().cloned()
    }

    pub fn visited(&self) -> Vec<Location> {
        self.visited.lock().clone()
    }
}

impl Navigator for NavigationHistory {
    fn navigate(&self, location: Location) {
        log::debug!("Navigating to {}", location.to_url());
        self.visited.lock().push(location);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    pub href: String,
}

impl Breadcrumb {
    fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self { label: label.into(), href: href.into() }
    }
}

/// `Applications → <app> → Storage`
pub fn storage_breadcrumbs(app: &Application) -> Vec<Breadcrumb> {
    vec![
        Breadcrumb::new("Applications", "#/applications"),
        Breadcrumb::new(app.display_name(), format!("#/applications/{}", app.id)),
        Breadcrumb::new("Storage", format!("#/applications/{}/storage", app.id)),
    ]
}

/// Storage trail plus the resource being edited, or "New Storage".
pub fn editor_breadcrumbs(app: &Application, resource_id: Option<&str>) -> Vec<Breadcrumb> {
    let mut crumbs = storage_breadcrumbs(app);
    let base = format!("#/applications/{}/storage", app.id);
    crumbs.push(match resource_id {
        Some(id) => Breadcrumb::new(id, format!("{base}/{id}")),
        None => Breadcrumb::new("New Storage", format!("{base}/create-storage")),
    });
    crumbs
}
