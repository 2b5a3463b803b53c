//! Dropbox API connector implementation
//!
//! Implements the `StorageProvider` trait for Dropbox API v2.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::storage::{EntryKind, FolderPage, RemoteEntry, StorageProvider};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::DropboxError;
use crate::types::{
    ApiErrorBody, DropboxMetadata, GetTemporaryLinkArg, GetTemporaryLinkResult, ListFolderArg,
    ListFolderContinueArg, ListFolderResult,
};

/// Dropbox RPC API base URL
pub const DROPBOX_API_BASE: &str = "https://api.dropboxapi.com/2";

/// Dropbox API connector
///
/// Stateless apart from the HTTP client: the access token arrives with every
/// call, so one connector serves a session across credential refreshes.
///
/// # Example
///
/// ```ignore
/// use provider_dropbox::DropboxConnector;
/// use bridge_traits::storage::StorageProvider;
///
/// let connector = DropboxConnector::new(http_client);
/// let page = connector.list_folder(token.as_str(), "/Photos", 20).await?;
/// ```
pub struct DropboxConnector {
    http_client: Arc<dyn HttpClient>,
    api_base: String,
}

impl DropboxConnector {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_api_base(http_client, DROPBOX_API_BASE)
    }

    /// Create a connector against a non-default RPC base URL
    pub fn with_api_base(http_client: Arc<dyn HttpClient>, api_base: impl Into<String>) -> Self {
        Self {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Parse an ISO 8601 timestamp as sent by Dropbox
    fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
        value
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Convert DropboxMetadata to RemoteEntry
    fn convert_entry(meta: DropboxMetadata) -> RemoteEntry {
        let kind = match meta.tag.as_str() {
            "file" => EntryKind::File,
            "folder" => EntryKind::Folder,
            _ => EntryKind::Deleted,
        };

        RemoteEntry {
            kind,
            client_modified: Self::parse_timestamp(meta.client_modified.as_deref()),
            server_modified: Self::parse_timestamp(meta.server_modified.as_deref()),
            name: meta.name,
            path_display: meta.path_display,
            path_lower: meta.path_lower,
            size: meta.size,
        }
    }

    fn convert_page(result: ListFolderResult) -> FolderPage {
        FolderPage {
            entries: result
                .entries
                .into_iter()
                .map(Self::convert_entry)
                .collect(),
            cursor: result.cursor,
            has_more: result.has_more,
        }
    }

    /// Classify a non-2xx response
    fn classify_error(response: &HttpResponse, subject: &str) -> DropboxError {
        let text = String::from_utf8_lossy(&response.body).to_string();
        let summary = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.error_summary)
            .unwrap_or_else(|| text.trim().to_string());

        if response.status == 401
            || summary.starts_with("invalid_access_token")
            || summary.starts_with("expired_access_token")
        {
            return DropboxError::InvalidAccessToken(summary);
        }

        if summary.contains("path/not_found") || summary.contains("path_lookup/not_found") {
            return DropboxError::PathNotFound(subject.to_string());
        }

        DropboxError::ApiError {
            status_code: response.status,
            message: summary,
        }
    }

    /// POST a JSON argument to an RPC endpoint and decode the JSON result.
    ///
    /// Issued as a single attempt: a failed call surfaces to the gallery as a
    /// transient error and the caller decides whether to ask again.
    async fn rpc_call<A, T>(
        &self,
        access_token: &str,
        endpoint: &str,
        arg: &A,
        subject: &str,
    ) -> std::result::Result<T, DropboxError>
    where
        A: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.api_base, endpoint);
        let request = HttpRequest::new(HttpMethod::Post, url)
            .bearer_token(access_token)
            .json(arg)?;

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::none())
            .await?;

        if !response.is_success() {
            let error = Self::classify_error(&response, subject);
            warn!(endpoint, status = response.status, error = %error, "Dropbox call failed");
            return Err(error);
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            DropboxError::ParseError(format!("Failed to parse {} response: {}", endpoint, e))
        })
    }
}

#[async_trait]
impl StorageProvider for DropboxConnector {
    #[instrument(skip(self, access_token), fields(path = %path))]
    async fn list_folder(
        &self,
        access_token: &str,
        path: &str,
        limit: u32,
    ) -> Result<FolderPage> {
        let arg = ListFolderArg {
            path,
            limit,
            recursive: false,
            include_deleted: false,
        };

        let result: ListFolderResult = self
            .rpc_call(access_token, "files/list_folder", &arg, path)
            .await?;

        debug!(
            entries = result.entries.len(),
            has_more = result.has_more,
            "Listed folder page"
        );
        Ok(Self::convert_page(result))
    }

    #[instrument(skip(self, access_token, cursor))]
    async fn list_folder_continue(&self, access_token: &str, cursor: &str) -> Result<FolderPage> {
        let arg = ListFolderContinueArg { cursor };

        let result: ListFolderResult = self
            .rpc_call(access_token, "files/list_folder/continue", &arg, "<cursor>")
            .await?;

        debug!(
            entries = result.entries.len(),
            has_more = result.has_more,
            "Listed continuation page"
        );
        Ok(Self::convert_page(result))
    }

    #[instrument(skip(self, access_token), fields(path = %path))]
    async fn get_temporary_link(&self, access_token: &str, path: &str) -> Result<String> {
        let arg = GetTemporaryLinkArg { path };

        let result: GetTemporaryLinkResult = self
            .rpc_call(access_token, "files/get_temporary_link", &arg, path)
            .await?;

        Ok(result.link)
    }
}
