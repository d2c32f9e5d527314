//! HTTP/JSON implementation of the storage-resource store.

use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::models::{
    Application, ApplicationCollection, StorageCollection, StoragePayload, StorageResource,
};
use crate::state::ConsoleSettings;

use super::{ApplicationDirectory, Created, StorageStore, StoreError, StoreScope};

/// Talks to the admin API under `{base_url}/admin/applications`.
#[derive(Clone)]
pub struct HttpStorageStore {
    client: Client,
    base_url: Url,
}

impl HttpStorageStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let raw = base_url.trim();
        if !raw.starts_with("http://") && !raw.starts_with("https://") {
            return Err(Error::Config(format!(
                "base URL must start with http:// or https:// (got '{raw}')"
            )));
        }
        let base_url = Url::parse(raw)
            .map_err(|e| Error::Config(format!("invalid base URL '{raw}': {e}")))?;
        if base_url.cannot_be_a_base() || base_url.query().is_some() {
            return Err(Error::Config(format!("base URL '{raw}' cannot carry resource paths")));
        }

        let client = Client::builder()
            .user_agent(format!("storage-console/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &ConsoleSettings) -> Result<Self> {
        Self::new(&settings.base_url, Duration::from_secs(settings.request_timeout_secs))
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Base URL extended by `segments`, each percent-encoded as one path
    /// segment.
    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Transport("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn applications_url(&self) -> std::result::Result<Url, StoreError> {
        self.endpoint(&["admin", "applications"])
    }

    fn collection_url(&self, app_id: &str) -> std::result::Result<Url, StoreError> {
        self.endpoint(&["admin", "applications", app_id, "resources"])
    }

    fn resource_url(
        &self,
        app_id: &str,
        resource_id: &str,
    ) -> std::result::Result<Url, StoreError> {
        self.endpoint(&["admin", "applications", app_id, "resources", resource_id])
    }

    fn scope_url(&self, scope: &StoreScope) -> std::result::Result<Url, StoreError> {
        match scope {
            StoreScope::Application { app_id } => self.collection_url(app_id),
            StoreScope::Resource { app_id, resource_id } => self.resource_url(app_id, resource_id),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, StoreError> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        response.json::<T>().await.map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// `?expand=members`, which asks the server to inline collection members.
fn expand_members(mut url: Url) -> Url {
    url.query_pairs_mut().append_pair("expand", "members");
    url
}

/// Map a non-2xx response to `StoreError::Status`, keeping the body text.
async fn check_status(response: Response) -> std::result::Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.ok().map(|text| text.trim().to_string());
    let body = body.filter(|text| !text.is_empty());
    log::warn!("Store request failed with {}", status.as_u16());
    Err(StoreError::Status { status: status.as_u16(), body })
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Transport("request timed out".to_string())
    } else if err.is_connect() {
        StoreError::Transport(format!("could not connect: {err}"))
    } else {
        StoreError::Transport(err.to_string())
    }
}

impl StorageStore for HttpStorageStore {
    async fn list(&self, app_id: &str) -> std::result::Result<StorageCollection, StoreError> {
        let url = expand_members(self.collection_url(app_id)?);
        self.get_json(url).await
    }

    async fn get(
        &self,
        app_id: &str,
        resource_id: &str,
    ) -> std::result::Result<StorageResource, StoreError> {
        self.get_json(self.resource_url(app_id, resource_id)?).await
    }

    async fn create(
        &self,
        scope: &StoreScope,
        payload: &StoragePayload,
    ) -> std::result::Result<Created, StoreError> {
        let url = self.scope_url(scope)?;
        log::debug!("POST {url}: {payload:?}");
        let response = self.client.post(url).json(payload).send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        Ok(Created { id: payload.id.clone(), location })
    }

    async fn update(
        &self,
        scope: &StoreScope,
        payload: &StoragePayload,
    ) -> std::result::Result<(), StoreError> {
        let url = self.scope_url(scope)?;
        log::debug!("PUT {url}: {payload:?}");
        let response = self.client.put(url).json(payload).send().await.map_err(transport_error)?;
        check_status(response).await?;
        Ok(())
    }
}

impl ApplicationDirectory for HttpStorageStore {
    async fn applications(&self) -> std::result::Result<Vec<Application>, StoreError> {
        let url = expand_members(self.applications_url()?);
        let collection: ApplicationCollection = self.get_json(url).await?;
        Ok(collection.members)
    }
}
