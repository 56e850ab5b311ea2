//! Server-level errors (startup and run loop)

use thiserror::Error;

/// Result alias for server startup/run paths
pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Startup error: {0}")]
    Startup(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<crate::utils::AppError> for ServerError {
    fn from(e: crate::utils::AppError) -> Self {
        ServerError::Startup(e.to_string())
    }
}
