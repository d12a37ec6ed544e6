//! Engine error types.

use crate::store::StoreError;
use lexicon_core::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("study session {0} is already active")]
    SessionAlreadyActive(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}
