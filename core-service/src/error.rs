use core_gallery::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error("Gallery error: {0}")]
    Gallery(#[from] core_gallery::GalleryError),
}

impl CoreError {
    /// Gallery error kind, for failures raised while paging.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            CoreError::Gallery(e) => Some(e.kind()),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Gallery(e) => e.is_retryable(),
            CoreError::Auth(e) => e.is_recoverable(),
            CoreError::InitializationFailed(_) | CoreError::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
