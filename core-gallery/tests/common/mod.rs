//! In-memory storage provider and token endpoint shared by the session tests.
#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::storage::{EntryKind, FolderPage, RemoteEntry, StorageProvider};
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use core_auth::{CredentialManager, RefreshCredentials, RefreshTokenExchange};
use core_gallery::{GallerySession, SessionOptions};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FOLDER: &str = "/Photos";

/// Image file under [`FOLDER`] modified at `ts` seconds after the epoch.
pub fn image(name: &str, ts: i64) -> RemoteEntry {
    RemoteEntry {
        kind: EntryKind::File,
        name: name.to_string(),
        path_display: Some(format!("{}/{}", FOLDER, name)),
        path_lower: Some(format!("{}/{}", FOLDER, name).to_lowercase()),
        client_modified: Some(Utc.timestamp_opt(ts, 0).unwrap()),
        server_modified: None,
        size: Some(1024),
    }
}

pub fn lookup(name: &str) -> String {
    format!("{}/{}", FOLDER, name).to_lowercase()
}

pub fn link_for(name: &str) -> String {
    format!("https://dl.example.com{}", lookup(name))
}

/// Folder listing served from memory, paginated by the requested limit.
pub struct FakeStorage {
    entries: Vec<RemoteEntry>,
    limit: AtomicU32,
    revoked: Mutex<HashSet<String>>,
    link_rejections: Mutex<HashMap<String, usize>>,
    link_failures: Mutex<HashMap<String, usize>>,
    missing: Mutex<HashSet<String>>,
    listing_failures: AtomicUsize,
    link_delay: Mutex<Duration>,
    listing_delay: Mutex<Duration>,
    list_calls: AtomicUsize,
    continue_calls: AtomicUsize,
    link_calls: AtomicUsize,
}

impl FakeStorage {
    pub fn new(entries: Vec<RemoteEntry>) -> Self {
        Self {
            entries,
            limit: AtomicU32::new(0),
            revoked: Mutex::new(HashSet::new()),
            link_rejections: Mutex::new(HashMap::new()),
            link_failures: Mutex::new(HashMap::new()),
            missing: Mutex::new(HashSet::new()),
            listing_failures: AtomicUsize::new(0),
            link_delay: Mutex::new(Duration::ZERO),
            listing_delay: Mutex::new(Duration::ZERO),
            list_calls: AtomicUsize::new(0),
            continue_calls: AtomicUsize::new(0),
            link_calls: AtomicUsize::new(0),
        }
    }

    /// Reject `token` on every call from now on.
    pub fn revoke(&self, token: &str) {
        self.revoked.lock().unwrap().insert(token.to_string());
    }

    /// Reject the next `times` link requests for `path` as unauthorized.
    pub fn reject_link(&self, path: &str, times: usize) {
        self.link_rejections
            .lock()
            .unwrap()
            .insert(path.to_string(), times);
    }

    /// Fail the next `times` link requests for `path` with a server error.
    pub fn fail_link(&self, path: &str, times: usize) {
        self.link_failures
            .lock()
            .unwrap()
            .insert(path.to_string(), times);
    }

    pub fn remove(&self, path: &str) {
        self.missing.lock().unwrap().insert(path.to_string());
    }

    pub fn fail_listing(&self, times: usize) {
        self.listing_failures.store(times, Ordering::SeqCst);
    }

    pub fn set_link_delay(&self, delay: Duration) {
        *self.link_delay.lock().unwrap() = delay;
    }

    pub fn set_listing_delay(&self, delay: Duration) {
        *self.listing_delay.lock().unwrap() = delay;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn continue_calls(&self) -> usize {
        self.continue_calls.load(Ordering::SeqCst)
    }

    pub fn link_calls(&self) -> usize {
        self.link_calls.load(Ordering::SeqCst)
    }

    fn authorize(&self, token: &str) -> BridgeResult<()> {
        if self.revoked.lock().unwrap().contains(token) {
            return Err(BridgeError::Unauthorized(
                "expired_access_token/".to_string(),
            ));
        }
        Ok(())
    }

    fn take(map: &Mutex<HashMap<String, usize>>, path: &str) -> bool {
        let mut map = map.lock().unwrap();
        match map.get_mut(path) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    fn page_from(&self, offset: usize) -> BridgeResult<FolderPage> {
        if self.listing_failures.load(Ordering::SeqCst) > 0 {
            self.listing_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(BridgeError::OperationFailed("HTTP 503".to_string()));
        }

        let limit = self.limit.load(Ordering::SeqCst) as usize;
        let offset = offset.min(self.entries.len());
        let end = (offset + limit).min(self.entries.len());
        Ok(FolderPage {
            entries: self.entries[offset..end].to_vec(),
            cursor: end.to_string(),
            has_more: end < self.entries.len(),
        })
    }
}

#[async_trait]
impl StorageProvider for FakeStorage {
    async fn list_folder(
        &self,
        access_token: &str,
        _path: &str,
        limit: u32,
    ) -> BridgeResult<FolderPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.listing_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.authorize(access_token)?;
        self.limit.store(limit, Ordering::SeqCst);
        self.page_from(0)
    }

    async fn list_folder_continue(
        &self,
        access_token: &str,
        cursor: &str,
    ) -> BridgeResult<FolderPage> {
        self.continue_calls.fetch_add(1, Ordering::SeqCst);
        self.authorize(access_token)?;
        let offset = cursor
            .parse()
            .map_err(|_| BridgeError::OperationFailed("reset".to_string()))?;
        self.page_from(offset)
    }

    async fn get_temporary_link(&self, access_token: &str, path: &str) -> BridgeResult<String> {
        self.link_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.link_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.authorize(access_token)?;
        if Self::take(&self.link_rejections, path) {
            return Err(BridgeError::Unauthorized(
                "expired_access_token/".to_string(),
            ));
        }
        if Self::take(&self.link_failures, path) {
            return Err(BridgeError::OperationFailed("HTTP 500".to_string()));
        }
        if self.missing.lock().unwrap().contains(path) {
            return Err(BridgeError::NotFound(path.to_string()));
        }

        Ok(format!("https://dl.example.com{}", path))
    }
}

/// Token endpoint handing out `token-1`, `token-2`, ...
pub struct CountingTokenEndpoint {
    calls: AtomicUsize,
    /// Calls beyond this number are refused with `invalid_grant`
    succeed_first: Option<usize>,
}

impl CountingTokenEndpoint {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            succeed_first: None,
        }
    }

    pub fn refusing_after(calls: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            succeed_first: Some(calls),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for CountingTokenEndpoint {
    async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        let (status, body) = match self.succeed_first {
            Some(limit) if n > limit => (
                400,
                r#"{"error":"invalid_grant","error_description":"refresh token is malformed"}"#
                    .to_string(),
            ),
            _ => (
                200,
                format!(
                    r#"{{"access_token":"token-{}","token_type":"bearer","expires_in":14400}}"#,
                    n
                ),
            ),
        };

        Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body),
        })
    }
}

pub struct Harness {
    pub storage: Arc<FakeStorage>,
    pub endpoint: Arc<CountingTokenEndpoint>,
    pub credentials: Arc<CredentialManager>,
    pub session: GallerySession,
}

impl Harness {
    pub fn new(entries: Vec<RemoteEntry>) -> Self {
        Self::build(entries, CountingTokenEndpoint::new(), SessionOptions::default())
    }

    pub fn with_options(entries: Vec<RemoteEntry>, options: SessionOptions) -> Self {
        Self::build(entries, CountingTokenEndpoint::new(), options)
    }

    pub fn build(
        entries: Vec<RemoteEntry>,
        endpoint: CountingTokenEndpoint,
        options: SessionOptions,
    ) -> Self {
        let storage = Arc::new(FakeStorage::new(entries));
        let endpoint = Arc::new(endpoint);
        let exchange = RefreshTokenExchange::new(
            RefreshCredentials::new("refresh", "app-key", "app-secret"),
            "https://auth.example.com/oauth2/token",
            endpoint.clone(),
        );
        let credentials = Arc::new(CredentialManager::new(exchange));
        let options = SessionOptions {
            folder_path: FOLDER.to_string(),
            ..options
        };
        let session = GallerySession::new(storage.clone(), credentials.clone(), options);

        Self {
            storage,
            endpoint,
            credentials,
            session,
        }
    }
}

pub fn filenames(batch: &core_gallery::GalleryBatch) -> Vec<&str> {
    batch.images.iter().map(|i| i.filename.as_str()).collect()
}
