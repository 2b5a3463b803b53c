//! # Folder Indexer
//!
//! Walks a remote folder listing to completion and produces the sorted
//! [`GalleryIndex`] of its images.

use crate::error::{GalleryError, Result};
use crate::filter::{is_gallery_image, normalize_folder_path};
use crate::types::{FileReference, GalleryIndex};
use bridge_traits::error::BridgeError;
use bridge_traits::storage::{FolderPage, StorageProvider};
use core_auth::{AccessToken, CredentialManager};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct FolderIndexer {
    provider: Arc<dyn StorageProvider>,
    credentials: Arc<CredentialManager>,
    page_limit: u32,
}

impl FolderIndexer {
    pub fn new(
        provider: Arc<dyn StorageProvider>,
        credentials: Arc<CredentialManager>,
        page_limit: u32,
    ) -> Self {
        Self {
            provider,
            credentials,
            page_limit,
        }
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// Build the index of `folder_path` with the current credential.
    pub async fn build_index(&self, folder_path: &str) -> Result<GalleryIndex> {
        let token = self.credentials.get_credential().await?;
        self.build_index_with(&token, folder_path).await
    }

    /// Build the index of `folder_path` using `token` for every listing call.
    ///
    /// A rejected token surfaces as [`GalleryError::AuthExpired`] so the
    /// caller knows which credential to refresh. Nothing is returned until the
    /// listing is complete.
    #[instrument(skip(self, token), fields(page_limit = self.page_limit))]
    pub async fn build_index_with(
        &self,
        token: &AccessToken,
        folder_path: &str,
    ) -> Result<GalleryIndex> {
        let folder = normalize_folder_path(folder_path);
        let mut items = Vec::new();

        let mut page = self
            .provider
            .list_folder(token.as_str(), &folder, self.page_limit)
            .await
            .map_err(listing_error)?;
        let mut pages = 1;
        collect_images(&page, &folder, &mut items);

        while page.has_more {
            page = self
                .provider
                .list_folder_continue(token.as_str(), &page.cursor)
                .await
                .map_err(listing_error)?;
            pages += 1;
            collect_images(&page, &folder, &mut items);
            debug!(pages, images = items.len(), "Fetched listing page");
        }

        let index = GalleryIndex::new(folder, items, pages);
        info!(
            folder = index.folder_path(),
            total = index.len(),
            pages,
            "Indexed folder"
        );
        Ok(index)
    }
}

fn collect_images(page: &FolderPage, folder: &str, items: &mut Vec<FileReference>) {
    items.extend(
        page.entries
            .iter()
            .filter(|entry| is_gallery_image(entry))
            .map(|entry| FileReference::from_entry(entry, folder)),
    );
}

fn listing_error(error: BridgeError) -> GalleryError {
    match error {
        BridgeError::Unauthorized(reason) => GalleryError::AuthExpired(reason),
        other => GalleryError::Transient(other.to_string()),
    }
}
