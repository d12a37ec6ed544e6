//! Device-local vocabulary learning engine.
//!
//! Persists word progress, study sessions, daily plans and the learning goal
//! in a key-value store (SQLite on disk, or in memory) and exposes them
//! through [`LexiconEngine`].

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod goal;
pub mod logging;
pub mod plan;
pub mod progress;
pub mod review;
pub mod session;
pub mod stats;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use engine::LexiconEngine;
pub use error::{EngineError, Result};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
