//! Gallery service façade and bootstrap helpers.
//!
//! This crate wires a host-provided [`HttpClient`] into the shared core: the
//! Dropbox connector, the credential manager, the event bus and a
//! [`GallerySession`] for the configured folder. Desktop apps typically enable
//! the `desktop-shims` feature (which depends on `bridge-desktop`) and call
//! [`GalleryService::from_config`]; other hosts inject their own client through
//! [`GalleryDependencies`].

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{http::HttpClient, storage::StorageProvider};
use core_auth::{AccessToken, CredentialManager, RefreshCredentials, RefreshTokenExchange};
use core_gallery::{GalleryBatch, GalleryIndex, GalleryProgress, GallerySession, SessionOptions};
use core_runtime::config::GalleryConfig;
use core_runtime::events::{EventBus, EventStream};
use provider_dropbox::DropboxConnector;
use tracing::info;

/// Broadcast capacity of the service's event bus.
pub const EVENT_BUFFER: usize = 64;

/// Host-provided dependencies of the core.
pub struct GalleryDependencies {
    pub http_client: Arc<dyn HttpClient>,
    /// Storage provider override; defaults to the Dropbox connector over
    /// `http_client`.
    pub storage: Option<Arc<dyn StorageProvider>>,
}

impl GalleryDependencies {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            storage: None,
        }
    }

    pub fn with_storage(mut self, storage: Arc<dyn StorageProvider>) -> Self {
        self.storage = Some(storage);
        self
    }
}

/// Primary façade exposed to host applications.
///
/// Cheap to clone; clones share the same session, credential and event bus.
#[derive(Clone)]
pub struct GalleryService {
    config: Arc<GalleryConfig>,
    credentials: Arc<CredentialManager>,
    session: Arc<GallerySession>,
    event_bus: EventBus,
}

impl GalleryService {
    /// Validate `config` and wire the core over `deps`.
    pub fn new(config: GalleryConfig, deps: GalleryDependencies) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::new(EVENT_BUFFER);
        let exchange = RefreshTokenExchange::new(
            RefreshCredentials::from_config(&config),
            config.token_url.clone(),
            Arc::clone(&deps.http_client),
        );
        let credentials =
            Arc::new(CredentialManager::new(exchange).with_event_bus(event_bus.clone()));

        let storage: Arc<dyn StorageProvider> = match deps.storage {
            Some(storage) => storage,
            None => Arc::new(DropboxConnector::with_api_base(
                Arc::clone(&deps.http_client),
                config.api_base.clone(),
            )),
        };

        let session = GallerySession::new(
            storage,
            Arc::clone(&credentials),
            SessionOptions::from_config(&config),
        )
        .with_event_bus(event_bus.clone());

        info!(
            folder = %config.folder_path,
            window_size = config.window_size,
            policy = ?config.resolve_policy,
            "Gallery service initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            credentials,
            session: Arc::new(session),
            event_bus,
        })
    }

    /// Build the service over the desktop `reqwest` client.
    #[cfg(feature = "desktop-shims")]
    pub fn from_config(config: GalleryConfig) -> Result<Self> {
        let http_client: Arc<dyn HttpClient> = Arc::new(bridge_desktop::ReqwestHttpClient::new());
        Self::new(config, GalleryDependencies::new(http_client))
    }

    /// [`from_config`](Self::from_config) with settings read from the
    /// environment.
    #[cfg(feature = "desktop-shims")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(GalleryConfig::from_env()?)
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn session(&self) -> &GallerySession {
        &self.session
    }

    pub fn credentials(&self) -> Arc<CredentialManager> {
        Arc::clone(&self.credentials)
    }

    /// Subscribe to auth and gallery events. Past events are not replayed.
    pub fn events(&self) -> EventStream {
        self.event_bus.stream()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Obtain an access token up front, surfacing bad credentials before the
    /// first batch.
    pub async fn authenticate(&self) -> Result<AccessToken> {
        Ok(self.credentials.get_credential().await?)
    }

    pub async fn next_batch(&self, window_size: usize) -> Result<GalleryBatch> {
        Ok(self.session.next_batch(window_size).await?)
    }

    /// Next batch with the configured window size.
    pub async fn next_page(&self) -> Result<GalleryBatch> {
        Ok(self.session.next_page().await?)
    }

    pub async fn index(&self) -> Result<Arc<GalleryIndex>> {
        Ok(self.session.index().await?)
    }

    pub async fn progress(&self) -> GalleryProgress {
        self.session.progress().await
    }

    /// Re-list the folder on the next batch and start again from the newest
    /// image.
    pub async fn reset(&self) {
        self.session.reset().await
    }
}
