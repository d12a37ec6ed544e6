//! Review scheduler.

use crate::store::{KeyValueStore, ProgressRepository, Result};
use chrono::{DateTime, Utc};
use lexicon_core::algorithm::{due_for_review, ReviewAlgorithm};
use lexicon_core::types::WordProgressRecord;

pub struct ReviewScheduler<'a, S: ?Sized> {
    store: &'a S,
    algorithm: &'a dyn ReviewAlgorithm,
}

impl<'a, S: KeyValueStore + ?Sized> ReviewScheduler<'a, S> {
    pub fn new(store: &'a S, algorithm: &'a dyn ReviewAlgorithm) -> Self {
        Self { store, algorithm }
    }

    /// Records due at `as_of`, weakest then stalest first, optionally truncated.
    pub fn due_for_review(
        &self,
        as_of: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<Vec<WordProgressRecord>> {
        let records = self.store.load_word_progress()?;
        let mut due = due_for_review(records.values(), self.algorithm, as_of);
        if let Some(limit) = limit {
            due.truncate(limit);
        }
        Ok(due)
    }

    /// Words due at `as_of`, in review order.
    pub fn due_words(&self, as_of: DateTime<Utc>) -> Result<Vec<String>> {
        Ok(self
            .due_for_review(as_of, None)?
            .into_iter()
            .map(|record| record.word)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::WordProgressStore;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};
    use lexicon_core::algorithm::forgetting_curve::ForgettingCurve;
    use lexicon_core::types::Difficulty;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_due_words_ordered_and_limited() {
        let store = MemoryStore::new();
        let progress = WordProgressStore::new(&store);
        let three_days_ago = now() - Duration::days(3);
        progress.record_progress("vision", "vid", Difficulty::Easy, three_days_ago).unwrap();
        progress.record_progress("inspect", "spect", Difficulty::Hard, three_days_ago).unwrap();
        progress.record_progress("respect", "spect", Difficulty::Medium, three_days_ago).unwrap();
        progress.record_progress("fresh", "", Difficulty::Hard, now()).unwrap();

        let algorithm = ForgettingCurve::default();
        let scheduler = ReviewScheduler::new(&store, &algorithm);

        assert_eq!(scheduler.due_words(now()).unwrap(), vec!["inspect", "respect", "vision"]);
        let limited = scheduler.due_for_review(now(), Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].word, "inspect");
    }
}
