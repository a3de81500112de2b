//! Application error types.

use thiserror::Error;

/// Errors raised during CLI startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;
