//! The engine facade the UI talks to.
//!
//! Storage failures stop here: they are logged and the call degrades to an
//! empty or default value. Only input errors, a conflicting session start,
//! and missing goals reach the caller as `Err`.

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::goal::{GoalStore, DEFAULT_DAILY_TARGET};
use crate::plan::DailyPlanner;
use crate::progress::WordProgressStore;
use crate::review::ReviewScheduler;
use crate::session::SessionTracker;
use crate::stats::StatsAggregator;
use crate::store::{self, KeyValueStore, SqliteStore, StoreError, ALL_KEYS};
use chrono::{DateTime, NaiveDate, Utc};
use lexicon_core::algorithm::forgetting_curve::ForgettingCurve;
use lexicon_core::algorithm::ReviewAlgorithm;
use lexicon_core::calendar::StudyCalendar;
use lexicon_core::mastery::normalize_word;
use lexicon_core::suggestions::suggest;
use lexicon_core::types::{
    DailyPlan, Difficulty, GoalPlan, GoalStatus, LearningGoal, LearningStats, LearningSuggestions,
    StudySession, UserLevel, WordProgressRecord,
};
use lexicon_core::{Corpus, StaticCorpus};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Vocabulary progress and scheduling engine over one store.
pub struct LexiconEngine<S, C = StaticCorpus> {
    store: S,
    corpus: C,
    config: EngineConfig,
    calendar: StudyCalendar,
    algorithm: Box<dyn ReviewAlgorithm>,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl LexiconEngine<SqliteStore> {
    /// Open the database at `config.db_path` with the bundled corpus.
    pub fn open(config: EngineConfig) -> Result<Self> {
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        let store = SqliteStore::open(&config.db_path)?;
        let corpus = StaticCorpus::builtin()?;
        info!(path = %config.db_path.display(), words = corpus.len(), "lexicon engine opened");
        Ok(Self::new(store, corpus, config))
    }
}

impl<S: KeyValueStore, C: Corpus> LexiconEngine<S, C> {
    pub fn new(store: S, corpus: C, config: EngineConfig) -> Self {
        Self {
            calendar: StudyCalendar::local(config.daily_reset_hour),
            algorithm: Box::new(ForgettingCurve::default()),
            clock: Box::new(SystemClock),
            rng: StdRng::from_entropy(),
            store,
            corpus,
            config,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Seed plan generation, making it reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_algorithm(mut self, algorithm: Box<dyn ReviewAlgorithm>) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn corpus(&self) -> &C {
        &self.corpus
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current study day, honouring the daily reset hour.
    pub fn today(&self) -> NaiveDate {
        self.calendar.study_day(self.clock.now())
    }

    fn progress(&self) -> WordProgressStore<'_, S> {
        WordProgressStore::new(&self.store)
    }

    fn sessions(&self) -> SessionTracker<'_, S> {
        SessionTracker::new(&self.store)
    }

    fn aggregator(&self) -> StatsAggregator<'_, S> {
        StatsAggregator::new(&self.store, &self.calendar, self.config.weekly_goal)
    }

    fn scheduler(&self) -> ReviewScheduler<'_, S> {
        ReviewScheduler::new(&self.store, self.algorithm.as_ref())
    }

    fn planner(&self) -> DailyPlanner<'_, S, C> {
        DailyPlanner::new(&self.store, &self.corpus, self.algorithm.as_ref())
    }

    fn goals(&self) -> GoalStore<'_, S> {
        GoalStore::new(&self.store)
    }

    // ==================== Word progress ====================

    /// Record one exposure to `word`.
    ///
    /// `Ok(None)` means the change could not be saved.
    pub fn record_progress(
        &self,
        word: &str,
        context: &str,
        difficulty: Difficulty,
    ) -> Result<Option<WordProgressRecord>> {
        let now = self.clock.now();
        let record = absorb(
            "record_progress",
            self.progress().record_progress(word, context, difficulty, now),
        )?;
        if record.is_some() {
            self.refresh_stats();
        }
        Ok(record)
    }

    /// Study a word inside the current session, starting one if idle.
    ///
    /// Records progress with the roots as context and adds the word and
    /// its roots to the session.
    pub fn study_word(
        &self,
        word: &str,
        roots: &[&str],
        difficulty: Difficulty,
    ) -> Result<Option<WordProgressRecord>> {
        let word = normalize_word(word)?;
        let roots: Vec<&str> = roots
            .iter()
            .map(|root| root.trim())
            .filter(|root| !root.is_empty())
            .collect();
        let record = absorb("study_word", self.study_word_in_session(&word, &roots, difficulty))?;
        if record.is_some() {
            self.refresh_stats();
        }
        Ok(record)
    }

    fn study_word_in_session(
        &self,
        word: &str,
        roots: &[&str],
        difficulty: Difficulty,
    ) -> Result<WordProgressRecord> {
        let now = self.clock.now();
        let sessions = self.sessions();
        sessions.ensure_started(now)?;
        let record = self
            .progress()
            .record_progress(word, &roots.join(","), difficulty, now)?;
        sessions.add_word(word)?;
        for root in roots {
            sessions.add_root(root)?;
        }
        Ok(record)
    }

    pub fn word_progress(&self, word: &str) -> Option<WordProgressRecord> {
        recover("word_progress", self.progress().get_progress(word), || None)
    }

    pub fn all_progress(&self) -> BTreeMap<String, WordProgressRecord> {
        recover("all_progress", self.progress().list_all(), BTreeMap::new)
    }

    // ==================== Sessions ====================

    /// Start a session. Fails with `SessionAlreadyActive` if one is running.
    pub fn start_session(&self) -> Result<Option<String>> {
        absorb("start_session", self.sessions().start(self.clock.now()))
    }

    /// Id of the running session, starting one if idle.
    pub fn ensure_session(&self) -> Result<Option<String>> {
        absorb("ensure_session", self.sessions().ensure_started(self.clock.now()))
    }

    pub fn add_word_to_session(&self, word: &str) -> Result<bool> {
        Ok(absorb("add_word_to_session", self.sessions().add_word(word))?.unwrap_or(false))
    }

    pub fn add_root_to_session(&self, root: &str) -> Result<bool> {
        Ok(absorb("add_root_to_session", self.sessions().add_root(root))?.unwrap_or(false))
    }

    /// Finish the running session. `Ok(None)` if none was running.
    pub fn end_session(
        &self,
        focus_level: u8,
        notes: Option<String>,
    ) -> Result<Option<StudySession>> {
        let ended = absorb(
            "end_session",
            self.sessions().end(focus_level, notes, self.clock.now()),
        )?
        .flatten();
        if ended.is_some() {
            self.refresh_stats();
        }
        Ok(ended)
    }

    pub fn current_session(&self) -> Option<StudySession> {
        recover("current_session", self.sessions().current(), || None)
    }

    /// Finished sessions, most recent first.
    pub fn session_history(&self) -> Vec<StudySession> {
        recover("session_history", self.sessions().history(), Vec::new)
    }

    // ==================== Statistics ====================

    /// Statistics as of the last change, computing them if never computed.
    pub fn stats(&self) -> LearningStats {
        match self.aggregator().cached() {
            Ok(Some(stats)) => stats,
            Ok(None) => self.refresh_stats(),
            Err(e) => {
                warn!(operation = "stats", error = %e, "storage failure, returning fallback");
                self.empty_stats()
            }
        }
    }

    /// Recompute statistics now.
    pub fn refresh_stats(&self) -> LearningStats {
        recover(
            "refresh_stats",
            self.aggregator().recompute(self.clock.now()),
            || self.empty_stats(),
        )
    }

    fn empty_stats(&self) -> LearningStats {
        LearningStats::empty(self.clock.now(), self.config.weekly_goal)
    }

    // ==================== Review ====================

    /// Words due now, weakest then stalest first.
    pub fn due_for_review(&self, limit: Option<usize>) -> Vec<WordProgressRecord> {
        self.due_for_review_at(self.clock.now(), limit)
    }

    pub fn due_for_review_at(
        &self,
        as_of: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Vec<WordProgressRecord> {
        recover(
            "due_for_review",
            self.scheduler().due_for_review(as_of, limit),
            Vec::new,
        )
    }

    // ==================== Daily plans ====================

    /// Plan for `date`, generated on first request.
    ///
    /// `level` and `target_words` default to the configured values.
    pub fn daily_plan(
        &mut self,
        date: NaiveDate,
        level: Option<UserLevel>,
        target_words: Option<u32>,
    ) -> Option<DailyPlan> {
        let level = level.unwrap_or(self.config.default_level);
        let target_words = target_words.unwrap_or(self.config.default_target_words);
        let now = self.clock.now();
        let planner = DailyPlanner::new(&self.store, &self.corpus, self.algorithm.as_ref());
        let plan = planner.get_or_create(date, level, target_words, now, &mut self.rng);
        recover("daily_plan", plan.map(Some), || None)
    }

    /// Plan for the current study day.
    pub fn today_plan(
        &mut self,
        level: Option<UserLevel>,
        target_words: Option<u32>,
    ) -> Option<DailyPlan> {
        let today = self.today();
        self.daily_plan(today, level, target_words)
    }

    /// Stored plan for `date`, never generating one.
    pub fn plan_for(&self, date: NaiveDate) -> Option<DailyPlan> {
        recover("plan_for", self.planner().get_plan(date), || None)
    }

    /// Mark a planned word complete. `Ok(None)` if there is no plan for `date`.
    pub fn mark_completed(&self, date: NaiveDate, word: &str) -> Result<Option<DailyPlan>> {
        Ok(absorb("mark_completed", self.planner().mark_completed(date, word))?.flatten())
    }

    pub fn mark_completed_today(&self, word: &str) -> Result<Option<DailyPlan>> {
        self.mark_completed(self.today(), word)
    }

    /// Stored plans for the current week, Sunday first.
    pub fn weekly_plans(&self) -> Vec<DailyPlan> {
        recover("weekly_plans", self.planner().weekly_plans(self.today()), Vec::new)
    }

    pub fn suggestions(&self) -> LearningSuggestions {
        suggest(&self.stats())
    }

    // ==================== Learning goal ====================

    pub fn set_learning_goal(
        &self,
        plan: GoalPlan,
        target_date: NaiveDate,
        daily_target: Option<u32>,
    ) -> Result<Option<LearningGoal>> {
        let stats = self.stats();
        absorb(
            "set_learning_goal",
            self.goals().set(
                plan,
                target_date,
                daily_target.unwrap_or(DEFAULT_DAILY_TARGET),
                &stats,
            ),
        )
    }

    /// The goal with progress brought up to date.
    pub fn learning_goal(&self) -> Option<LearningGoal> {
        let stats = self.stats();
        recover("learning_goal", self.goals().get(&stats), || None)
    }

    /// Pause or resume the goal. Fails with `NotFound` if no goal is set.
    pub fn set_goal_status(&self, status: GoalStatus) -> Result<Option<LearningGoal>> {
        let stats = self.stats();
        absorb("set_goal_status", self.goals().set_status(status, &stats))
    }

    pub fn clear_learning_goal(&self) {
        recover("clear_learning_goal", self.goals().clear(), || ());
    }

    // ==================== Reset ====================

    /// Delete everything the engine has stored. Returns false if any key
    /// could not be deleted.
    pub fn reset_all(&self) -> bool {
        let mut cleared = true;
        for key in ALL_KEYS {
            if let Err(e) = self.store.delete(key) {
                error!(key, error = %e, "failed to clear stored data");
                cleared = false;
            }
        }
        info!(cleared, "all learning data reset");
        cleared
    }
}

fn recover<T>(operation: &'static str, result: store::Result<T>, fallback: impl FnOnce() -> T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(operation, error = %e, "storage failure, returning fallback");
            fallback()
        }
    }
}

fn absorb<T>(operation: &'static str, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(EngineError::Persistence(e)) => {
            error!(operation, error = %e, "storage failure, change not saved");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
