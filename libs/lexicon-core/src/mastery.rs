//! Mastery update rules for word progress records.

use crate::error::{CoreError, Result};
use crate::types::{Difficulty, WordProgressRecord};
use chrono::{DateTime, Utc};

/// Upper bound of the mastery scale.
pub const MAX_MASTERY: u8 = 100;

/// Cap on the review-count bonus applied per exposure.
const MAX_REVIEW_BONUS: i32 = 30;

/// Normalize a word for use as a record key (trimmed, lower-case).
pub fn normalize_word(word: &str) -> Result<String> {
    let normalized = word.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(CoreError::InvalidWord(word.to_string()));
    }
    Ok(normalized)
}

impl Difficulty {
    /// Mastery assigned on first exposure.
    pub fn initial_mastery(self) -> u8 {
        match self {
            Self::Easy => 70,
            Self::Medium => 55,
            Self::Hard => 40,
        }
    }

    /// Mastery adjustment applied on every later exposure.
    pub fn mastery_bonus(self) -> i32 {
        match self {
            Self::Easy => 10,
            Self::Medium => 0,
            Self::Hard => -5,
        }
    }
}

/// Bonus for the given (already incremented) review count.
pub fn review_bonus(review_count: u32) -> i32 {
    (review_count as i64 * 5).min(MAX_REVIEW_BONUS as i64) as i32
}

impl WordProgressRecord {
    /// Record created on the first exposure to `word`.
    pub fn first_exposure(
        word: &str,
        context: &str,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            word: normalize_word(word)?,
            learned_at: now,
            last_reviewed: now,
            review_count: 1,
            mastery_level: difficulty.initial_mastery(),
            difficulty,
            context: context.to_string(),
        })
    }

    /// Apply a later exposure to an existing record.
    ///
    /// The context of the first exposure is kept.
    pub fn review(&mut self, difficulty: Difficulty, now: DateTime<Utc>) {
        self.last_reviewed = now.max(self.learned_at);
        self.review_count = self.review_count.saturating_add(1);
        self.difficulty = difficulty;

        let mastery = self.mastery_level as i32
            + difficulty.mastery_bonus()
            + review_bonus(self.review_count);
        self.mastery_level = mastery.clamp(0, MAX_MASTERY as i32) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn first_exposure_uses_difficulty_baseline() {
        let easy = WordProgressRecord::first_exposure("Inspect", "spect", Difficulty::Easy, at(9)).unwrap();
        assert_eq!(easy.word, "inspect");
        assert_eq!(easy.mastery_level, 70);
        assert_eq!(easy.review_count, 1);

        let hard = WordProgressRecord::first_exposure("inspect", "spect", Difficulty::Hard, at(9)).unwrap();
        assert_eq!(hard.mastery_level, 40);
    }

    #[test]
    fn construct_scenario() {
        let mut record =
            WordProgressRecord::first_exposure("construct", "struct", Difficulty::Medium, at(9)).unwrap();
        assert_eq!(record.review_count, 1);
        assert_eq!(record.mastery_level, 55);

        record.review(Difficulty::Easy, at(10));
        assert_eq!(record.review_count, 2);
        assert_eq!(record.mastery_level, 75);
        assert_eq!(record.last_reviewed, at(10));
        assert_eq!(record.learned_at, at(9));
    }

    #[test]
    fn mastery_stays_in_range_for_every_difficulty() {
        for first in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            for later in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                let mut record =
                    WordProgressRecord::first_exposure("retain", "tain", first, at(0)).unwrap();
                for i in 0..40 {
                    record.review(later, at(0) + Duration::hours(i));
                    assert!(record.mastery_level <= MAX_MASTERY);
                    assert!(record.review_count >= 1);
                }
            }
        }
    }

    #[test]
    fn review_bonus_caps_at_thirty() {
        assert_eq!(review_bonus(2), 10);
        assert_eq!(review_bonus(6), 30);
        assert_eq!(review_bonus(100), 30);
        assert_eq!(review_bonus(u32::MAX), 30);
    }

    #[test]
    fn last_reviewed_never_precedes_learned_at() {
        let mut record =
            WordProgressRecord::first_exposure("vision", "vid", Difficulty::Medium, at(12)).unwrap();
        record.review(Difficulty::Medium, at(8));
        assert_eq!(record.last_reviewed, at(12));
    }

    #[test]
    fn blank_word_is_rejected() {
        assert_eq!(
            normalize_word("   "),
            Err(CoreError::InvalidWord("   ".to_string()))
        );
        assert!(WordProgressRecord::first_exposure("", "", Difficulty::Medium, at(0)).is_err());
    }
}
