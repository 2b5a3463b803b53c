//! Remote Storage Abstractions
//!
//! The remote storage provider is a black box exposing three operations:
//! list the first page of a folder, continue listing from a cursor, and
//! resolve a file into a short-lived, directly fetchable link. Each operation
//! may fail with [`BridgeError::Unauthorized`](crate::error::BridgeError) when
//! the access credential it was given has been revoked or has expired.
//!
//! Credentials are passed per call rather than captured at construction so a
//! single provider instance survives credential rotation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kind of a folder entry as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Folder,
    Deleted,
}

/// One entry of a folder listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub kind: EntryKind,
    /// Last path component, original casing
    pub name: String,
    /// Path with the casing the user sees
    pub path_display: Option<String>,
    /// Lower-cased path, stable for lookups
    pub path_lower: Option<String>,
    /// Modification time reported by the uploading client
    pub client_modified: Option<DateTime<Utc>>,
    /// Modification time on the provider side
    pub server_modified: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

impl RemoteEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Best available modification timestamp.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.client_modified.or(self.server_modified)
    }
}

/// One page of a cursor-paginated folder listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPage {
    pub entries: Vec<RemoteEntry>,
    /// Opaque continuation token, only meaningful while `has_more` is set
    pub cursor: String,
    pub has_more: bool,
}

/// Remote storage provider trait
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::StorageProvider;
///
/// async fn count_entries(provider: &dyn StorageProvider, token: &str) -> Result<usize> {
///     let mut page = provider.list_folder(token, "/photos", 100).await?;
///     let mut count = page.entries.len();
///     while page.has_more {
///         page = provider.list_folder_continue(token, &page.cursor).await?;
///         count += page.entries.len();
///     }
///     Ok(count)
/// }
/// ```
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// List the first page of a folder. An empty `path` denotes the root.
    async fn list_folder(&self, access_token: &str, path: &str, limit: u32)
        -> Result<FolderPage>;

    /// Continue a listing from the cursor returned by the previous page.
    async fn list_folder_continue(&self, access_token: &str, cursor: &str) -> Result<FolderPage>;

    /// Resolve a file path into a temporary, directly fetchable URL.
    async fn get_temporary_link(&self, access_token: &str, path: &str) -> Result<String>;
}
