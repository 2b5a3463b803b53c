use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token endpoint answered with a non-success status.
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// The token endpoint answered 2xx without an access token.
    #[error("Token endpoint response did not contain an access token")]
    MissingAccessToken,

    /// The token endpoint could not be reached.
    #[error("Network error during token refresh: {0}")]
    NetworkError(String),
}

impl AuthError {
    /// Whether a later attempt may succeed without changing configuration.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AuthError::NetworkError(_))
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
