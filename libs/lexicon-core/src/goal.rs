//! Learning goal progress.

use crate::types::{GoalPlan, GoalStatus, LearningGoal, LearningStats};
use chrono::NaiveDate;

impl LearningGoal {
    /// New active goal for `plan`; roots target is 30% of the word target.
    pub fn new(plan: GoalPlan, target_date: NaiveDate, daily_target: u32) -> Self {
        let target_words = plan.target_words();
        Self {
            target_date,
            target_words,
            target_roots: target_words * 3 / 10,
            current_words: 0,
            current_roots: 0,
            progress: 0,
            status: GoalStatus::Active,
            plan,
            daily_target,
        }
    }

    /// Update current counts and progress from the latest statistics.
    ///
    /// Reaching 100% completes the goal, even if it was paused.
    pub fn refresh(&mut self, stats: &LearningStats) {
        self.current_words = stats.total_words_learned;
        self.current_roots = stats.total_roots_learned;
        self.progress = if self.target_words == 0 {
            100
        } else {
            let percent = (self.current_words as f64 / self.target_words as f64 * 100.0).round();
            percent.min(100.0) as u8
        };
        if self.progress >= 100 {
            self.status = GoalStatus::Completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn stats(words: u32, roots: u32) -> LearningStats {
        let mut stats = LearningStats::empty(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 50);
        stats.total_words_learned = words;
        stats.total_roots_learned = roots;
        stats
    }

    fn target() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn targets_follow_plan() {
        let goal = LearningGoal::new(GoalPlan::Cet4, target(), 10);
        assert_eq!(goal.target_words, 4500);
        assert_eq!(goal.target_roots, 1350);
        assert_eq!(goal.status, GoalStatus::Active);

        assert_eq!(LearningGoal::new(GoalPlan::Gre, target(), 10).target_roots, 3600);
        assert_eq!(LearningGoal::new(GoalPlan::Custom, target(), 10).target_words, 5000);
    }

    #[test]
    fn refresh_tracks_progress() {
        let mut goal = LearningGoal::new(GoalPlan::Cet4, target(), 10);
        goal.refresh(&stats(45, 12));
        assert_eq!(goal.current_words, 45);
        assert_eq!(goal.current_roots, 12);
        assert_eq!(goal.progress, 1);
        assert_eq!(goal.status, GoalStatus::Active);
    }

    #[test]
    fn refresh_completes_goal_and_caps_progress() {
        let mut goal = LearningGoal::new(GoalPlan::Cet4, target(), 10);
        goal.status = GoalStatus::Paused;
        goal.refresh(&stats(5000, 900));
        assert_eq!(goal.progress, 100);
        assert_eq!(goal.status, GoalStatus::Completed);
    }
}
