//! Device-local persistence.
//!
//! Everything the engine stores is a JSON document under one of a handful of
//! stable keys. [`KeyValueStore`] is the only seam to the backing storage;
//! the typed repository traits layer record codecs on top of it.

pub mod codec;
pub mod error;
pub mod memory;
pub mod repository;
pub mod schema;
pub mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use repository::{
    GoalRepository, PlanRepository, ProgressRepository, SessionRepository, StatsRepository,
};
pub use sqlite::SqliteStore;

pub type Result<T> = std::result::Result<T, StoreError>;

pub const WORD_PROGRESS_KEY: &str = "lexicon_word_progress";
pub const STUDY_SESSIONS_KEY: &str = "lexicon_study_sessions";
pub const CURRENT_SESSION_KEY: &str = "lexicon_current_session";
pub const DAILY_PLANS_KEY: &str = "lexicon_daily_plans";
pub const LEARNING_GOAL_KEY: &str = "lexicon_learning_goal";
pub const LEARNING_STATS_KEY: &str = "lexicon_learning_stats";

/// Every key the engine writes.
pub const ALL_KEYS: [&str; 6] = [
    WORD_PROGRESS_KEY,
    STUDY_SESSIONS_KEY,
    CURRENT_SESSION_KEY,
    DAILY_PLANS_KEY,
    LEARNING_GOAL_KEY,
    LEARNING_STATS_KEY,
];

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}
