//! Error types for the lopdf backend.
//!
//! [`BackendError`] wraps lopdf-level failures and converts them to
//! [`ExtractError`] at the crate boundary.

use tabula_core::ExtractError;
use thiserror::Error;

/// Error type for document loading and content interpretation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] ExtractError),
}

impl From<BackendError> for ExtractError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => ExtractError::Parse(msg),
            BackendError::Io(e) => ExtractError::Io(e),
            BackendError::Interpreter(msg) => ExtractError::Parse(format!("content stream: {msg}")),
            BackendError::Core(e) => e,
        }
    }
}
