//! Statistics aggregator: recompute-on-write cache of [`LearningStats`].

use crate::store::{KeyValueStore, ProgressRepository, Result, SessionRepository, StatsRepository};
use chrono::{DateTime, Local, TimeZone, Utc};
use lexicon_core::calendar::StudyCalendar;
use lexicon_core::stats::compute_stats;
use lexicon_core::types::LearningStats;
use tracing::debug;

pub struct StatsAggregator<'a, S: ?Sized, Tz: TimeZone = Local> {
    store: &'a S,
    calendar: &'a StudyCalendar<Tz>,
    weekly_goal: u32,
}

impl<'a, S: KeyValueStore + ?Sized, Tz: TimeZone> StatsAggregator<'a, S, Tz> {
    pub fn new(store: &'a S, calendar: &'a StudyCalendar<Tz>, weekly_goal: u32) -> Self {
        Self {
            store,
            calendar,
            weekly_goal,
        }
    }

    /// Recompute from both stores and replace the cache.
    pub fn recompute(&self, now: DateTime<Utc>) -> Result<LearningStats> {
        let records = self.store.load_word_progress()?;
        let sessions = self.store.load_sessions()?;
        let stats = compute_stats(records.values(), &sessions, self.calendar, now, self.weekly_goal);
        self.store.save_learning_stats(&stats)?;
        debug!(
            words = stats.total_words_learned,
            roots = stats.total_roots_learned,
            streak = stats.streak,
            "statistics recomputed"
        );
        Ok(stats)
    }

    /// Statistics as of the last recompute.
    pub fn cached(&self) -> Result<Option<LearningStats>> {
        self.store.load_learning_stats()
    }
}
