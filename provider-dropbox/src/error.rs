//! Error types for the Dropbox provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Dropbox provider errors
#[derive(Error, Debug)]
pub enum DropboxError {
    /// The access token was rejected (expired, revoked or malformed)
    #[error("Dropbox rejected the access token: {0}")]
    InvalidAccessToken(String),

    /// The requested path does not exist
    #[error("Dropbox path not found: {0}")]
    PathNotFound(String),

    /// API request returned an error
    #[error("Dropbox API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for Dropbox operations
pub type Result<T> = std::result::Result<T, DropboxError>;

impl From<DropboxError> for BridgeError {
    fn from(error: DropboxError) -> Self {
        match error {
            DropboxError::InvalidAccessToken(summary) => BridgeError::Unauthorized(summary),
            DropboxError::PathNotFound(path) => BridgeError::NotFound(path),
            DropboxError::BridgeError(e) => e,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}
