//! Word progress store.

use crate::error::Result;
use crate::store::{self, KeyValueStore, ProgressRepository};
use chrono::{DateTime, Utc};
use lexicon_core::mastery::normalize_word;
use lexicon_core::types::{Difficulty, WordProgressRecord};
use std::collections::BTreeMap;
use tracing::debug;

/// Mastery records keyed by normalized word.
pub struct WordProgressStore<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> WordProgressStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create the record for an unseen word, or apply another exposure to it.
    pub fn record_progress(
        &self,
        word: &str,
        context: &str,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Result<WordProgressRecord> {
        let word = normalize_word(word)?;
        let mut records = self.store.load_word_progress()?;

        let record = match records.get_mut(&word) {
            Some(record) => {
                record.review(difficulty, now);
                record.clone()
            }
            None => {
                let record = WordProgressRecord::first_exposure(&word, context, difficulty, now)?;
                records.insert(word, record.clone());
                record
            }
        };

        self.store.save_word_progress(&records)?;
        debug!(
            word = %record.word,
            mastery = record.mastery_level,
            reviews = record.review_count,
            "recorded word progress"
        );
        Ok(record)
    }

    /// Record for `word`, if it has been studied. Blank words have no record.
    pub fn get_progress(&self, word: &str) -> store::Result<Option<WordProgressRecord>> {
        let Ok(word) = normalize_word(word) else {
            return Ok(None);
        };
        Ok(self.store.load_word_progress()?.remove(&word))
    }

    pub fn list_all(&self) -> store::Result<BTreeMap<String, WordProgressRecord>> {
        self.store.load_word_progress()
    }

    pub fn clear_all(&self) -> store::Result<()> {
        self.store.clear_word_progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_first_then_repeat_exposure() {
        let store = MemoryStore::new();
        let progress = WordProgressStore::new(&store);

        let first = progress
            .record_progress("construct", "struct", Difficulty::Medium, now())
            .unwrap();
        assert_eq!(first.review_count, 1);
        assert_eq!(first.mastery_level, 55);

        let later = now() + Duration::hours(3);
        let second = progress
            .record_progress("Construct ", "ignored", Difficulty::Easy, later)
            .unwrap();
        assert_eq!(second.review_count, 2);
        assert_eq!(second.mastery_level, 75);
        assert_eq!(second.context, "struct");
        assert_eq!(second.learned_at, now());
        assert_eq!(second.last_reviewed, later);

        assert_eq!(progress.get_progress("CONSTRUCT").unwrap(), Some(second));
        assert_eq!(progress.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_mastery_stays_in_range() {
        let store = MemoryStore::new();
        let progress = WordProgressStore::new(&store);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let word = format!("word-{}", difficulty.as_str());
            for _ in 0..30 {
                let record = progress.record_progress(&word, "", difficulty, now()).unwrap();
                assert!(record.mastery_level <= 100);
            }
        }
        let capped = progress.get_progress("word-easy").unwrap().unwrap();
        assert_eq!(capped.mastery_level, 100);
    }

    #[test]
    fn test_blank_word_rejected() {
        let store = MemoryStore::new();
        let progress = WordProgressStore::new(&store);
        let result = progress.record_progress("   ", "", Difficulty::Medium, now());
        assert!(matches!(result, Err(EngineError::InvalidInput(_))));
        assert_eq!(progress.get_progress("").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let store = MemoryStore::new();
        let progress = WordProgressStore::new(&store);
        progress.record_progress("vision", "vid", Difficulty::Hard, now()).unwrap();
        progress.clear_all().unwrap();
        assert!(progress.list_all().unwrap().is_empty());
    }
}
