use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The provider rejected the access credential (invalid or expired).
    #[error("Credential rejected by provider: {0}")]
    Unauthorized(String),

    #[error("Remote path not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether this failure means the access credential must be refreshed.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BridgeError::Unauthorized(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
