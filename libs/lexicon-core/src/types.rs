//! Core types for vocabulary progress tracking.
//!
//! All persisted entities serialize with camelCase field names and RFC 3339
//! timestamps so stored records stay readable by older clients.

use crate::error::{CoreError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Self-reported difficulty of a learning event, also used as a plan difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Learner level, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserLevel {
    Cet4,
    Cet6,
    Toefl,
    Ielts,
    Gre,
    Advanced,
}

impl UserLevel {
    pub const ALL: [UserLevel; 6] = [
        Self::Cet4,
        Self::Cet6,
        Self::Toefl,
        Self::Ielts,
        Self::Gre,
        Self::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cet4 => "cet4",
            Self::Cet6 => "cet6",
            Self::Toefl => "toefl",
            Self::Ielts => "ielts",
            Self::Gre => "gre",
            Self::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == s)
    }

    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(&s.trim().to_lowercase()).ok_or_else(|| CoreError::UnknownLevel(s.to_string()))
    }

    /// Display name of the exam or tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cet4 => "CET-4",
            Self::Cet6 => "CET-6",
            Self::Toefl => "TOEFL",
            Self::Ielts => "IELTS",
            Self::Gre => "GRE",
            Self::Advanced => "Advanced",
        }
    }
}

/// Mastery record for one learned word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgressRecord {
    pub word: String,
    pub learned_at: DateTime<Utc>,
    pub last_reviewed: DateTime<Utc>,
    pub review_count: u32,
    pub mastery_level: u8,
    pub difficulty: Difficulty,
    /// Comma-joined root identifiers seen when the word was studied.
    pub context: String,
}

impl WordProgressRecord {
    /// Root identifiers referenced by this record's context.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.context
            .split(',')
            .map(str::trim)
            .filter(|root| !root.is_empty())
    }
}

/// One continuous study interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub words_studied: Vec<String>,
    #[serde(default)]
    pub roots_learned: Vec<String>,
    /// Whole minutes, set when the session ends.
    #[serde(default)]
    pub session_duration: u32,
    pub focus_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StudySession {
    /// Create an active session starting at `start_time`.
    pub fn new(id: String, start_time: DateTime<Utc>) -> Self {
        Self {
            id,
            start_time,
            end_time: None,
            words_studied: Vec::new(),
            roots_learned: Vec::new(),
            session_duration: 0,
            focus_level: 3,
            notes: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// Add a word, keeping set semantics. Returns true if it was new.
    pub fn add_word(&mut self, word: &str) -> bool {
        push_unique(&mut self.words_studied, word)
    }

    /// Add a root, keeping set semantics. Returns true if it was new.
    pub fn add_root(&mut self, root: &str) -> bool {
        push_unique(&mut self.roots_learned, root)
    }
}

pub(crate) fn push_unique(items: &mut Vec<String>, value: &str) -> bool {
    if items.iter().any(|item| item == value) {
        false
    } else {
        items.push(value.to_string());
        true
    }
}

/// Aggregated statistics derived from word progress and session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub total_words_learned: u32,
    pub total_roots_learned: u32,
    /// Minutes.
    pub total_study_time: u32,
    pub average_mastery: u8,
    pub streak: u32,
    pub longest_streak: u32,
    pub last_study_date: DateTime<Utc>,
    pub weekly_goal: u32,
    pub weekly_progress: u32,
}

impl LearningStats {
    /// Zeroed statistics, used when nothing has been studied or stats are unreadable.
    pub fn empty(now: DateTime<Utc>, weekly_goal: u32) -> Self {
        Self {
            total_words_learned: 0,
            total_roots_learned: 0,
            total_study_time: 0,
            average_mastery: 0,
            streak: 0,
            longest_streak: 0,
            last_study_date: now,
            weekly_goal,
            weekly_progress: 0,
        }
    }
}

/// Completion state of a daily plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanProgress {
    NotStarted,
    InProgress,
    Completed,
}

impl Default for PlanProgress {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl PlanProgress {
    /// Progress as a pure function of the completion ratio.
    pub fn from_completion(completed: usize, total: usize) -> Self {
        if completed == 0 || total == 0 {
            Self::NotStarted
        } else if completed < total {
            Self::InProgress
        } else {
            Self::Completed
        }
    }
}

/// Study plan for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    #[serde(deserialize_with = "crate::calendar::deserialize_date")]
    pub date: NaiveDate,
    pub core_words: Vec<String>,
    pub extended_words: Vec<String>,
    pub review_words: Vec<String>,
    pub difficulty: Difficulty,
    /// Minutes.
    pub estimated_time: u32,
    pub progress: PlanProgress,
    #[serde(default)]
    pub completed_words: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DailyPlan {
    pub fn total_words(&self) -> usize {
        self.core_words.len() + self.extended_words.len() + self.review_words.len()
    }

    /// All planned words: core, then extended, then review.
    pub fn words(&self) -> impl Iterator<Item = &String> {
        self.core_words
            .iter()
            .chain(self.extended_words.iter())
            .chain(self.review_words.iter())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words().any(|w| w == word)
    }

    /// Mark a planned word complete. Returns false if the word is unknown to
    /// the plan or already complete.
    pub fn mark_completed(&mut self, word: &str) -> bool {
        if !self.contains(word) || !push_unique(&mut self.completed_words, word) {
            return false;
        }
        self.refresh_progress();
        true
    }

    pub fn refresh_progress(&mut self) {
        self.progress = PlanProgress::from_completion(self.completed_words.len(), self.total_words());
    }
}

/// Lifecycle state of the learning goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
}

/// Exam or custom target a learning goal is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPlan {
    Cet4,
    Cet6,
    Toefl,
    Ielts,
    Gre,
    Custom,
}

impl GoalPlan {
    /// Vocabulary size the plan aims for.
    pub fn target_words(&self) -> u32 {
        match self {
            Self::Cet4 => 4500,
            Self::Cet6 => 6000,
            Self::Toefl => 8000,
            Self::Ielts => 7500,
            Self::Gre => 12000,
            Self::Custom => 5000,
        }
    }
}

/// The learner's single active goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningGoal {
    #[serde(deserialize_with = "crate::calendar::deserialize_date")]
    pub target_date: NaiveDate,
    pub target_words: u32,
    pub target_roots: u32,
    pub current_words: u32,
    pub current_roots: u32,
    /// Percent, 0-100.
    pub progress: u8,
    pub status: GoalStatus,
    pub plan: GoalPlan,
    pub daily_target: u32,
}

/// Advice derived from the current statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningSuggestions {
    pub recommended_daily_words: u32,
    pub focus_areas: Vec<String>,
    pub next_milestone: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn plan() -> DailyPlan {
        DailyPlan {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            core_words: vec!["construct".into(), "inspect".into()],
            extended_words: vec!["portable".into()],
            review_words: vec!["vision".into()],
            difficulty: Difficulty::Easy,
            estimated_time: 9,
            progress: PlanProgress::NotStarted,
            completed_words: Vec::new(),
            notes: None,
        }
    }

    #[test]
    fn user_level_parse() {
        assert_eq!(UserLevel::parse(" TOEFL "), Ok(UserLevel::Toefl));
        assert_eq!(
            UserLevel::parse("expert"),
            Err(CoreError::UnknownLevel("expert".to_string()))
        );
        assert!(UserLevel::Cet4 < UserLevel::Gre);
    }

    #[test]
    fn progress_follows_completion_ratio() {
        assert_eq!(PlanProgress::from_completion(0, 4), PlanProgress::NotStarted);
        assert_eq!(PlanProgress::from_completion(1, 4), PlanProgress::InProgress);
        assert_eq!(PlanProgress::from_completion(4, 4), PlanProgress::Completed);
        assert_eq!(PlanProgress::from_completion(0, 0), PlanProgress::NotStarted);
    }

    #[test]
    fn mark_completed_ignores_unknown_and_repeated_words() {
        let mut plan = plan();
        assert!(!plan.mark_completed("unrelated"));
        assert!(plan.mark_completed("inspect"));
        assert!(!plan.mark_completed("inspect"));
        assert_eq!(plan.completed_words, vec!["inspect".to_string()]);
        assert_eq!(plan.progress, PlanProgress::InProgress);

        for word in ["construct", "portable", "vision"] {
            plan.mark_completed(word);
        }
        assert_eq!(plan.progress, PlanProgress::Completed);
    }

    #[test]
    fn record_roots_skip_blank_fragments() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let record = WordProgressRecord {
            word: "biography".into(),
            learned_at: at,
            last_reviewed: at,
            review_count: 1,
            mastery_level: 55,
            difficulty: Difficulty::Medium,
            context: "graph, bio,,".into(),
        };
        assert_eq!(record.roots().collect::<Vec<_>>(), vec!["graph", "bio"]);
    }

    #[test]
    fn session_word_and_root_sets() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let mut session = StudySession::new("s1".into(), at);
        assert!(session.add_word("inspect"));
        assert!(!session.add_word("inspect"));
        assert!(session.add_root("spect"));
        assert!(!session.add_root("spect"));
        assert_eq!(session.words_studied.len(), 1);
        assert_eq!(session.roots_learned.len(), 1);
        assert!(session.is_active());
    }

    #[test]
    fn stored_field_names_are_camel_case() {
        let json = serde_json::to_value(plan()).unwrap();
        assert_eq!(json["date"], "2024-03-04");
        assert_eq!(json["coreWords"][0], "construct");
        assert_eq!(json["progress"], "not_started");
    }

    #[test]
    fn level_round_trips_through_str() {
        for level in UserLevel::ALL {
            assert_eq!(UserLevel::from_str(level.as_str()), Some(level));
        }
        assert!(UserLevel::Cet4 < UserLevel::Gre);
    }
}
