//! Core vocabulary-learning library shared by the local engine and its front ends.
//!
//! Provides:
//! - Progress, session, plan and goal types
//! - Mastery update rule and forgetting-curve review scheduling
//! - Streak and weekly statistics
//! - Daily plan word selection and study suggestions
//! - The read-only vocabulary corpus

pub mod algorithm;
pub mod calendar;
pub mod corpus;
pub mod error;
pub mod goal;
pub mod mastery;
pub mod planner;
pub mod stats;
pub mod suggestions;
pub mod types;

pub use algorithm::{due_for_review, get_algorithm, ReviewAlgorithm};
pub use calendar::StudyCalendar;
pub use corpus::{Corpus, RootEntry, RootOrigin, StaticCorpus, WordEntry};
pub use error::{CoreError, Result};
pub use mastery::normalize_word;
pub use planner::{generate_plan, PlanQuotas, PlanRequest};
pub use stats::compute_stats;
pub use suggestions::suggest;
pub use types::{
    DailyPlan, Difficulty, GoalPlan, GoalStatus, LearningGoal, LearningStats, LearningSuggestions,
    PlanProgress, StudySession, UserLevel, WordProgressRecord,
};
