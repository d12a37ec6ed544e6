//! Error types for lexicon-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by input validation and corpus loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid word: {0:?}")]
    InvalidWord(String),

    #[error("focus level must be between 1 and 5, got {0}")]
    InvalidFocusLevel(u8),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("unknown user level: {0}")]
    UnknownLevel(String),

    #[error("corpus error: {0}")]
    Corpus(String),
}
