//! # Gallery Session
//!
//! Hands out a folder's images in windows, resolving each window into
//! temporary links on demand.
//!
//! ## Batch lifecycle
//!
//! ```text
//! next_batch(w)
//!   ├─ validate w
//!   ├─ lock cursor ── exhausted? → empty batch
//!   ├─ ensure index (built once; one refresh + rebuild on a rejected token)
//!   ├─ slice [offset, offset + w)
//!   ├─ resolve every item concurrently (one refresh + retry per rejected item)
//!   └─ commit offset / has_more, emit events
//! ```
//!
//! Calls are serialized: a second `next_batch` waits for the first to settle
//! and then continues from the committed offset. Nothing is committed until
//! the window resolves, so dropping the future leaves the session where it
//! was.

use crate::error::{GalleryError, Result};
use crate::indexer::FolderIndexer;
use crate::types::{FileReference, GalleryBatch, GalleryIndex, GalleryProgress, ResolvedImage};
use bridge_traits::storage::StorageProvider;
use core_auth::{AccessToken, CredentialManager};
use core_runtime::config::{
    GalleryConfig, ResolvePolicy, DEFAULT_PAGE_LIMIT, DEFAULT_WINDOW_SIZE,
};
use core_runtime::events::{CoreEvent, EventBus, GalleryEvent};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Settings for a [`GallerySession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Folder to index; the empty string is the root
    pub folder_path: String,
    /// Entries requested per listing page
    pub page_limit: u32,
    /// Window used by [`GallerySession::next_page`]
    pub window_size: usize,
    pub resolve_policy: ResolvePolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            folder_path: String::new(),
            page_limit: DEFAULT_PAGE_LIMIT,
            window_size: DEFAULT_WINDOW_SIZE,
            resolve_policy: ResolvePolicy::Strict,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            folder_path: config.folder_path.clone(),
            page_limit: config.page_limit,
            window_size: config.window_size,
            resolve_policy: config.resolve_policy,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    offset: usize,
    has_more: bool,
}

impl Cursor {
    fn start() -> Self {
        Self {
            offset: 0,
            has_more: true,
        }
    }
}

pub struct GallerySession {
    indexer: FolderIndexer,
    provider: Arc<dyn StorageProvider>,
    credentials: Arc<CredentialManager>,
    options: SessionOptions,
    /// Lock order: `cursor` before `index`.
    cursor: Mutex<Cursor>,
    index: Mutex<Option<Arc<GalleryIndex>>>,
    event_bus: Option<EventBus>,
}

impl GallerySession {
    pub fn new(
        provider: Arc<dyn StorageProvider>,
        credentials: Arc<CredentialManager>,
        options: SessionOptions,
    ) -> Self {
        let indexer = FolderIndexer::new(
            Arc::clone(&provider),
            Arc::clone(&credentials),
            options.page_limit,
        );

        Self {
            indexer,
            provider,
            credentials,
            options,
            cursor: Mutex::new(Cursor::start()),
            index: Mutex::new(None),
            event_bus: None,
        }
    }

    /// Emit gallery events on `event_bus`.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Resolve the next `window_size` images.
    ///
    /// Returns an empty batch with `has_more == false` once the index is
    /// exhausted. On error the offset is unchanged and the same call retries
    /// the same window.
    #[instrument(skip(self), fields(folder = %self.options.folder_path))]
    pub async fn next_batch(&self, window_size: usize) -> Result<GalleryBatch> {
        if window_size == 0 {
            return Err(GalleryError::InvalidRequest(
                "window_size must be greater than zero".to_string(),
            ));
        }

        let mut cursor = self.cursor.lock().await;
        if !cursor.has_more {
            debug!("Gallery exhausted");
            return Ok(GalleryBatch::exhausted());
        }

        match self.load_window(*cursor, window_size).await {
            Ok((batch, end, total)) => {
                let start = cursor.offset;
                cursor.offset = end;
                cursor.has_more = batch.has_more;

                info!(
                    offset = start,
                    count = batch.len(),
                    skipped = batch.skipped.len(),
                    has_more = batch.has_more,
                    "Loaded gallery batch"
                );
                self.emit(GalleryEvent::BatchLoaded {
                    offset: start,
                    count: batch.len(),
                    skipped: batch.skipped.len(),
                    has_more: batch.has_more,
                });
                if !batch.has_more {
                    self.emit(GalleryEvent::Exhausted { total });
                }

                Ok(batch)
            }
            Err(error) => {
                warn!(offset = cursor.offset, error = %error, "Gallery batch failed");
                self.emit(GalleryEvent::Failed {
                    message: error.to_string(),
                    kind: error.kind().as_str().to_string(),
                    retryable: error.is_retryable(),
                });
                Err(error)
            }
        }
    }

    /// [`next_batch`](Self::next_batch) with the configured window size.
    pub async fn next_page(&self) -> Result<GalleryBatch> {
        self.next_batch(self.options.window_size).await
    }

    /// The folder index, building it if needed.
    pub async fn index(&self) -> Result<Arc<GalleryIndex>> {
        self.ensure_index().await
    }

    /// Committed position. Waits for an in-flight batch to settle.
    pub async fn progress(&self) -> GalleryProgress {
        let cursor = *self.cursor.lock().await;
        let total = self.index.lock().await.as_ref().map(|index| index.len());

        GalleryProgress {
            offset: cursor.offset,
            total,
            has_more: cursor.has_more,
        }
    }

    /// Drop the index and rewind. The next batch re-lists the folder.
    pub async fn reset(&self) {
        let mut cursor = self.cursor.lock().await;
        let mut index = self.index.lock().await;
        *cursor = Cursor::start();
        *index = None;
        info!(folder = %self.options.folder_path, "Gallery session reset");
    }

    /// Resolves the window at `cursor`, returning the batch, the new offset
    /// and the index length.
    async fn load_window(
        &self,
        cursor: Cursor,
        window_size: usize,
    ) -> Result<(GalleryBatch, usize, usize)> {
        let index = self.ensure_index().await?;
        let total = index.len();
        let start = cursor.offset.min(total);
        let end = start.saturating_add(window_size).min(total);
        let window = index.window(start..end);

        if window.is_empty() {
            return Ok((GalleryBatch::exhausted(), end, total));
        }

        let token = self.credentials.get_credential().await?;
        let results = join_all(window.iter().map(|item| self.resolve(item, &token))).await;

        let mut images = Vec::with_capacity(window.len());
        let mut skipped = Vec::new();
        for result in results {
            match result {
                Ok(image) => images.push(image),
                Err(GalleryError::Resolve { path, source })
                    if self.options.resolve_policy == ResolvePolicy::SkipFailed =>
                {
                    warn!(path = %path, error = %source, "Skipping unresolvable image");
                    skipped.push(path);
                }
                Err(error) => return Err(error),
            }
        }

        let batch = GalleryBatch {
            images,
            has_more: end < total,
            skipped,
        };
        Ok((batch, end, total))
    }

    /// Resolve one item, refreshing the credential and retrying once if the
    /// provider rejects `token`.
    async fn resolve(&self, item: &FileReference, token: &AccessToken) -> Result<ResolvedImage> {
        let path = item.lookup_path.as_str();

        let link = match self.provider.get_temporary_link(token.as_str(), path).await {
            Ok(link) => link,
            Err(error) if error.is_unauthorized() => {
                debug!(path, "Access token rejected while resolving, refreshing");
                let fresh = self.credentials.refresh_rejected(token).await?;
                self.provider
                    .get_temporary_link(fresh.as_str(), path)
                    .await
                    .map_err(|error| GalleryError::resolve(path, error))?
            }
            Err(error) => return Err(GalleryError::resolve(path, error)),
        };

        Ok(ResolvedImage {
            access_url: link,
            filename: item.filename.clone(),
        })
    }

    async fn ensure_index(&self) -> Result<Arc<GalleryIndex>> {
        let mut slot = self.index.lock().await;
        if let Some(index) = slot.as_ref() {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(self.build_index().await?);
        self.emit(GalleryEvent::IndexBuilt {
            folder_path: index.folder_path().to_string(),
            total: index.len(),
            pages: index.pages(),
        });
        *slot = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Build the index, refreshing and rebuilding once if the listing rejects
    /// the credential. A second rejection is an authentication failure.
    async fn build_index(&self) -> Result<GalleryIndex> {
        let folder = self.options.folder_path.as_str();
        let token = self.credentials.get_credential().await?;

        match self.indexer.build_index_with(&token, folder).await {
            Err(GalleryError::AuthExpired(reason)) => {
                warn!(reason = %reason, "Listing rejected the access token, refreshing");
                let fresh = self.credentials.refresh_rejected(&token).await?;
                match self.indexer.build_index_with(&fresh, folder).await {
                    Err(GalleryError::AuthExpired(reason)) => Err(GalleryError::Auth(format!(
                        "access token rejected after refresh: {}",
                        reason
                    ))),
                    other => other,
                }
            }
            other => other,
        }
    }

    fn emit(&self, event: GalleryEvent) {
        if let Some(bus) = &self.event_bus {
            let _ = bus.emit(CoreEvent::Gallery(event));
        }
    }
}
