//! Learning goal store.

use crate::error::{EngineError, Result};
use crate::store::{self, GoalRepository, KeyValueStore};
use chrono::NaiveDate;
use lexicon_core::types::{GoalPlan, GoalStatus, LearningGoal, LearningStats};
use tracing::info;

/// Daily word target used when the learner does not pick one.
pub const DEFAULT_DAILY_TARGET: u32 = 10;

pub struct GoalStore<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> GoalStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Replace the goal with a new active one.
    pub fn set(
        &self,
        plan: GoalPlan,
        target_date: NaiveDate,
        daily_target: u32,
        stats: &LearningStats,
    ) -> Result<LearningGoal> {
        if daily_target == 0 {
            return Err(EngineError::InvalidInput(
                "daily target must be at least one word".to_string(),
            ));
        }
        let mut goal = LearningGoal::new(plan, target_date, daily_target);
        goal.refresh(stats);
        self.store.save_learning_goal(Some(&goal))?;
        info!(
            plan = ?goal.plan,
            target_words = goal.target_words,
            target_date = %goal.target_date,
            "learning goal set"
        );
        Ok(goal)
    }

    /// The goal with progress recomputed from `stats`.
    pub fn get(&self, stats: &LearningStats) -> store::Result<Option<LearningGoal>> {
        let Some(mut goal) = self.store.load_learning_goal()? else {
            return Ok(None);
        };
        let before = goal.clone();
        goal.refresh(stats);
        if goal != before {
            self.store.save_learning_goal(Some(&goal))?;
        }
        Ok(Some(goal))
    }

    /// Pause or resume the goal.
    pub fn set_status(&self, status: GoalStatus, stats: &LearningStats) -> Result<LearningGoal> {
        let mut goal = self
            .store
            .load_learning_goal()?
            .ok_or_else(|| EngineError::NotFound("learning goal".to_string()))?;
        goal.status = status;
        goal.refresh(stats);
        self.store.save_learning_goal(Some(&goal))?;
        info!(status = ?goal.status, "learning goal status changed");
        Ok(goal)
    }

    pub fn clear(&self) -> store::Result<()> {
        self.store.save_learning_goal(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn stats(words: u32, roots: u32) -> LearningStats {
        let mut stats = LearningStats::empty(Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap(), 50);
        stats.total_words_learned = words;
        stats.total_roots_learned = roots;
        stats
    }

    fn target() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 20).unwrap()
    }

    #[test]
    fn test_set_and_refresh_on_read() {
        let store = MemoryStore::new();
        let goals = GoalStore::new(&store);
        assert_eq!(goals.get(&stats(0, 0)).unwrap(), None);

        let goal = goals.set(GoalPlan::Cet6, target(), 20, &stats(0, 0)).unwrap();
        assert_eq!(goal.target_words, 6000);
        assert_eq!(goal.target_roots, 1800);
        assert_eq!(goal.status, GoalStatus::Active);

        let read = goals.get(&stats(600, 40)).unwrap().unwrap();
        assert_eq!(read.current_words, 600);
        assert_eq!(read.current_roots, 40);
        assert_eq!(read.progress, 10);
    }

    #[test]
    fn test_status_changes_need_a_goal() {
        let store = MemoryStore::new();
        let goals = GoalStore::new(&store);
        assert!(matches!(
            goals.set_status(GoalStatus::Paused, &stats(0, 0)),
            Err(EngineError::NotFound(_))
        ));

        goals.set(GoalPlan::Custom, target(), 10, &stats(0, 0)).unwrap();
        let paused = goals.set_status(GoalStatus::Paused, &stats(10, 2)).unwrap();
        assert_eq!(paused.status, GoalStatus::Paused);
        assert_eq!(goals.get(&stats(10, 2)).unwrap().unwrap().status, GoalStatus::Paused);

        goals.clear().unwrap();
        assert_eq!(goals.get(&stats(10, 2)).unwrap(), None);
    }

    #[test]
    fn test_zero_daily_target_rejected() {
        let store = MemoryStore::new();
        let goals = GoalStore::new(&store);
        assert!(matches!(
            goals.set(GoalPlan::Cet4, target(), 0, &stats(0, 0)),
            Err(EngineError::InvalidInput(_))
        ));
    }
}
