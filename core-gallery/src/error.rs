use bridge_traits::error::BridgeError;
use core_auth::AuthError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    /// A credential could not be obtained, or was rejected again right after
    /// a refresh.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The provider rejected the access token.
    #[error("Access token rejected: {0}")]
    AuthExpired(String),

    /// Network or decoding failure unrelated to credentials.
    #[error("Temporary failure: {0}")]
    Transient(String),

    /// A file's temporary link could not be resolved.
    #[error("Failed to resolve {path}: {source}")]
    Resolve {
        path: String,
        #[source]
        source: BridgeError,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Stable classification of [`GalleryError`] for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Auth,
    AuthExpired,
    Transient,
    Resolve,
    InvalidRequest,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "Auth",
            ErrorKind::AuthExpired => "AuthExpired",
            ErrorKind::Transient => "Transient",
            ErrorKind::Resolve => "Resolve",
            ErrorKind::InvalidRequest => "InvalidRequest",
        }
    }
}

impl GalleryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GalleryError::Auth(_) => ErrorKind::Auth,
            GalleryError::AuthExpired(_) => ErrorKind::AuthExpired,
            GalleryError::Transient(_) => ErrorKind::Transient,
            GalleryError::Resolve { .. } => ErrorKind::Resolve,
            GalleryError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// Whether repeating the same call may succeed without outside changes.
    ///
    /// A missing file and a bad configuration will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            GalleryError::Transient(_) | GalleryError::AuthExpired(_) => true,
            GalleryError::Resolve { source, .. } => !matches!(source, BridgeError::NotFound(_)),
            GalleryError::Auth(_) | GalleryError::InvalidRequest(_) => false,
        }
    }

    /// Lookup path of the item that failed, for resolve errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            GalleryError::Resolve { path, .. } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn resolve(path: impl Into<String>, source: BridgeError) -> Self {
        GalleryError::Resolve {
            path: path.into(),
            source,
        }
    }
}

/// Unreachable token endpoints are transient; every other refresh failure
/// needs new credentials.
impl From<AuthError> for GalleryError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::NetworkError(_) => GalleryError::Transient(error.to_string()),
            other => GalleryError::Auth(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_retryability() {
        let err = GalleryError::Transient("timeout".to_string());
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert!(err.is_retryable());

        let err = GalleryError::InvalidRequest("window_size must be positive".to_string());
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(!err.is_retryable());

        let err = GalleryError::resolve("/a.jpg", BridgeError::NotFound("/a.jpg".to_string()));
        assert_eq!(err.kind(), ErrorKind::Resolve);
        assert_eq!(err.path(), Some("/a.jpg"));
        assert!(!err.is_retryable());

        let err = GalleryError::resolve("/b.jpg", BridgeError::OperationFailed("503".to_string()));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_auth_error_conversion() {
        let err: GalleryError = AuthError::TokenRefreshFailed("invalid_grant".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert!(err.to_string().contains("invalid_grant"));

        let err: GalleryError = AuthError::MissingAccessToken.into();
        assert_eq!(err.kind(), ErrorKind::Auth);

        let err: GalleryError = AuthError::NetworkError("refused".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Transient);
    }

    #[test]
    fn test_resolve_display_names_path() {
        let err = GalleryError::resolve(
            "/photos/a.jpg",
            BridgeError::Unauthorized("expired_access_token/".to_string()),
        );
        assert!(err.to_string().contains("/photos/a.jpg"));
    }
}
