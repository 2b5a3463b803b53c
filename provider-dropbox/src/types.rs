//! Dropbox API request and response types
//!
//! Data structures for the RPC endpoints under `https://api.dropboxapi.com/2`.

use serde::{Deserialize, Serialize};

/// Entry of a folder listing.
///
/// See: https://www.dropbox.com/developers/documentation/http/documentation#files-list_folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropboxMetadata {
    /// `file`, `folder` or `deleted`
    #[serde(rename = ".tag")]
    pub tag: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_lower: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_display: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Size in bytes (files only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Modification time set by the uploading client (ISO 8601, files only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_modified: Option<String>,

    /// Last modification on the server (ISO 8601, files only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_modified: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListFolderArg<'a> {
    pub path: &'a str,
    pub limit: u32,
    pub recursive: bool,
    pub include_deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct ListFolderContinueArg<'a> {
    pub cursor: &'a str,
}

/// Response of `files/list_folder` and `files/list_folder/continue`.
#[derive(Debug, Deserialize)]
pub struct ListFolderResult {
    pub entries: Vec<DropboxMetadata>,
    pub cursor: String,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct GetTemporaryLinkArg<'a> {
    pub path: &'a str,
}

/// Response of `files/get_temporary_link`. The link stays valid for four hours.
#[derive(Debug, Deserialize)]
pub struct GetTemporaryLinkResult {
    pub link: String,
    #[serde(default)]
    pub metadata: Option<DropboxMetadata>,
}

/// Error body returned with 4xx statuses.
#[derive(Debug, Deserialize, Default)]
pub struct ApiErrorBody {
    /// Slash-separated error path, e.g. `path/not_found/..`
    #[serde(default)]
    pub error_summary: Option<String>,
}
