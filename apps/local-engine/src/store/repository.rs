//! Typed repositories over a [`KeyValueStore`].
//!
//! Loads validate what they read: unreadable or inconsistent records are
//! dropped with a warning instead of failing the whole namespace. A value
//! that is not valid JSON for its namespace reads as absent, so the next
//! write replaces it. Records from a newer envelope version still fail.

use super::codec::{decode, encode};
use super::{
    KeyValueStore, Result, StoreError, CURRENT_SESSION_KEY, DAILY_PLANS_KEY, LEARNING_GOAL_KEY,
    LEARNING_STATS_KEY, STUDY_SESSIONS_KEY, WORD_PROGRESS_KEY,
};
use chrono::NaiveDate;
use lexicon_core::mastery::MAX_MASTERY;
use lexicon_core::types::{DailyPlan, LearningGoal, LearningStats, StudySession, WordProgressRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Repository for word progress records, keyed by normalized word.
pub trait ProgressRepository {
    fn load_word_progress(&self) -> Result<BTreeMap<String, WordProgressRecord>>;
    fn save_word_progress(&self, records: &BTreeMap<String, WordProgressRecord>) -> Result<()>;
    fn clear_word_progress(&self) -> Result<()>;
}

/// Repository for the session history and the current-session slot.
pub trait SessionRepository {
    fn load_sessions(&self) -> Result<Vec<StudySession>>;
    fn save_sessions(&self, sessions: &[StudySession]) -> Result<()>;
    fn load_current_session(&self) -> Result<Option<StudySession>>;
    fn save_current_session(&self, session: Option<&StudySession>) -> Result<()>;
}

/// Repository for daily plans, keyed by date.
pub trait PlanRepository {
    fn load_daily_plans(&self) -> Result<BTreeMap<NaiveDate, DailyPlan>>;
    fn save_daily_plans(&self, plans: &BTreeMap<NaiveDate, DailyPlan>) -> Result<()>;
}

/// Repository for the single learning goal.
pub trait GoalRepository {
    fn load_learning_goal(&self) -> Result<Option<LearningGoal>>;
    fn save_learning_goal(&self, goal: Option<&LearningGoal>) -> Result<()>;
}

/// Repository for the cached statistics.
pub trait StatsRepository {
    fn load_learning_stats(&self) -> Result<Option<LearningStats>>;
    fn save_learning_stats(&self, stats: &LearningStats) -> Result<()>;
}

fn load<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let decoded = match decode(key, &raw) {
        Ok(decoded) => decoded,
        Err(StoreError::Json(e)) => {
            warn!(key, error = %e, "discarding unreadable record");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    if decoded.legacy {
        debug!(key, "read unversioned record, next write upgrades it");
    }
    Ok(Some(decoded.value))
}

fn save<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    store.set(key, &encode(&value)?)
}

fn save_or_delete<S, T>(store: &S, key: &str, value: Option<&T>) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    match value {
        Some(value) => save(store, key, value),
        None => store.delete(key),
    }
}

impl<S: KeyValueStore + ?Sized> ProgressRepository for S {
    fn load_word_progress(&self) -> Result<BTreeMap<String, WordProgressRecord>> {
        let raw: BTreeMap<String, Value> = load(self, WORD_PROGRESS_KEY)?.unwrap_or_default();
        Ok(validate_word_progress(raw))
    }

    fn save_word_progress(&self, records: &BTreeMap<String, WordProgressRecord>) -> Result<()> {
        save(self, WORD_PROGRESS_KEY, records)
    }

    fn clear_word_progress(&self) -> Result<()> {
        self.delete(WORD_PROGRESS_KEY)
    }
}

impl<S: KeyValueStore + ?Sized> SessionRepository for S {
    fn load_sessions(&self) -> Result<Vec<StudySession>> {
        let raw: Vec<Value> = load(self, STUDY_SESSIONS_KEY)?.unwrap_or_default();
        Ok(raw
            .into_iter()
            .filter_map(|value| parse_or_warn(STUDY_SESSIONS_KEY, value))
            .map(validate_session)
            .collect())
    }

    fn save_sessions(&self, sessions: &[StudySession]) -> Result<()> {
        save(self, STUDY_SESSIONS_KEY, sessions)
    }

    fn load_current_session(&self) -> Result<Option<StudySession>> {
        let session: Option<StudySession> = load(self, CURRENT_SESSION_KEY)?;
        Ok(session.map(validate_session))
    }

    fn save_current_session(&self, session: Option<&StudySession>) -> Result<()> {
        save_or_delete(self, CURRENT_SESSION_KEY, session)
    }
}

impl<S: KeyValueStore + ?Sized> PlanRepository for S {
    fn load_daily_plans(&self) -> Result<BTreeMap<NaiveDate, DailyPlan>> {
        let raw: BTreeMap<String, Value> = load(self, DAILY_PLANS_KEY)?.unwrap_or_default();
        let mut plans = BTreeMap::new();
        for (key, value) in raw {
            let Some(plan) = parse_or_warn::<DailyPlan>(DAILY_PLANS_KEY, value) else {
                continue;
            };
            if plan.date.to_string() != key {
                debug!(key = %key, date = %plan.date, "re-keying daily plan by its date");
            }
            plans.entry(plan.date).or_insert_with(|| validate_plan(plan));
        }
        Ok(plans)
    }

    fn save_daily_plans(&self, plans: &BTreeMap<NaiveDate, DailyPlan>) -> Result<()> {
        let keyed: BTreeMap<String, &DailyPlan> = plans
            .iter()
            .map(|(date, plan)| (date.to_string(), plan))
            .collect();
        save(self, DAILY_PLANS_KEY, &keyed)
    }
}

impl<S: KeyValueStore + ?Sized> GoalRepository for S {
    fn load_learning_goal(&self) -> Result<Option<LearningGoal>> {
        load(self, LEARNING_GOAL_KEY)
    }

    fn save_learning_goal(&self, goal: Option<&LearningGoal>) -> Result<()> {
        save_or_delete(self, LEARNING_GOAL_KEY, goal)
    }
}

impl<S: KeyValueStore + ?Sized> StatsRepository for S {
    fn load_learning_stats(&self) -> Result<Option<LearningStats>> {
        load(self, LEARNING_STATS_KEY)
    }

    fn save_learning_stats(&self, stats: &LearningStats) -> Result<()> {
        save(self, LEARNING_STATS_KEY, stats)
    }
}

fn parse_or_warn<T: DeserializeOwned>(key: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(key, error = %e, "dropping unreadable record");
            None
        }
    }
}

/// Drop inconsistent records and key the rest by their normalized word.
pub(crate) fn validate_word_progress(
    raw: BTreeMap<String, Value>,
) -> BTreeMap<String, WordProgressRecord> {
    let mut records = BTreeMap::new();
    for (key, value) in raw {
        let Some(mut record) = parse_or_warn::<WordProgressRecord>(WORD_PROGRESS_KEY, value) else {
            continue;
        };
        let word = record.word.trim().to_lowercase();
        if word.is_empty()
            || record.review_count == 0
            || record.mastery_level > MAX_MASTERY
            || record.last_reviewed < record.learned_at
        {
            warn!(key = %key, "dropping invalid word progress record");
            continue;
        }
        if word != key {
            debug!(key = %key, word = %word, "re-keying word progress record");
        }
        record.word = word.clone();
        records.entry(word).or_insert(record);
    }
    records
}

fn validate_session(mut session: StudySession) -> StudySession {
    dedupe(&mut session.words_studied);
    dedupe(&mut session.roots_learned);
    session
}

fn validate_plan(mut plan: DailyPlan) -> DailyPlan {
    dedupe(&mut plan.completed_words);
    let planned: HashSet<String> = plan.words().cloned().collect();
    plan.completed_words.retain(|word| planned.contains(word));
    plan.refresh_progress();
    plan
}

// Keeps the first occurrence.
fn dedupe(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}
