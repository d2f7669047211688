use std::io;
use thiserror::Error;

/// Crate-wide error type, consolidating all possible errors into a single enum.
///
/// Only the ambient layers (settings, calibration persistence, tracing setup)
/// produce these. Unknown topics or empty datasets are answered with a
/// response message instead.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors, typically while persisting calibration.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<tracing::subscriber::SetGlobalDefaultError> for AppError {
    fn from(err: tracing::subscriber::SetGlobalDefaultError) -> Self {
        AppError::Internal(format!("Tracing setup error: {}", err))
    }
}
