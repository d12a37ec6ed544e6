//! Persistence error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unsupported record version {version} under key {key}")]
    UnsupportedVersion { key: String, version: u64 },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
