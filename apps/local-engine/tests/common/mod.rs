//! Common test utilities and fixtures for integration tests.
//!
//! This module provides:
//! - Engines over in-memory and on-disk stores with a pinned clock
//! - A store that can be switched to fail every call
//! - Local-time helpers so study-day assertions hold in any timezone

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use lexicon_core::StaticCorpus;
use lexicon_local::store::{KeyValueStore, MemoryStore, StoreError};
use lexicon_local::{EngineConfig, FixedClock, LexiconEngine};

/// Wednesday.
pub fn study_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
}

/// Noon on `date` in the local timezone.
pub fn local_noon(date: NaiveDate) -> DateTime<Utc> {
    Local
        .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
        .single()
        .expect("noon is never ambiguous")
        .with_timezone(&Utc)
}

pub fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date - Duration::days(days)
}

pub fn test_config() -> EngineConfig {
    EngineConfig {
        db_path: "unused.db".into(),
        ..EngineConfig::default()
    }
}

pub fn clock_at(date: NaiveDate) -> Arc<FixedClock> {
    Arc::new(FixedClock::new(local_noon(date)))
}

/// In-memory engine with the bundled corpus, a seeded RNG and a shared clock.
pub fn memory_engine(clock: &Arc<FixedClock>) -> LexiconEngine<MemoryStore> {
    engine_over(MemoryStore::new(), clock)
}

pub fn engine_over<S: KeyValueStore>(store: S, clock: &Arc<FixedClock>) -> LexiconEngine<S> {
    LexiconEngine::new(store, StaticCorpus::builtin().unwrap(), test_config())
        .with_clock(clock.clone())
        .with_seed(7)
}

/// Run one finished session starting at noon on `date`.
pub fn study_on<S: KeyValueStore>(
    engine: &LexiconEngine<S>,
    clock: &FixedClock,
    date: NaiveDate,
    words: &[&str],
) {
    clock.set(local_noon(date));
    engine.start_session().unwrap();
    for word in words {
        engine.add_word_to_session(word).unwrap();
    }
    clock.advance(Duration::minutes(10));
    engine.end_session(3, None).unwrap();
}

/// Memory store that fails every call while switched on.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("storage switched off".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.delete(key)
    }
}
