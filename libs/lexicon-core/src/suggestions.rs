//! Study advice derived from learning statistics.

use crate::types::{LearningStats, LearningSuggestions};

/// Recommended daily words by minimum streak, highest first.
const DAILY_WORD_LADDER: [(u32, u32); 3] = [(30, 20), (7, 15), (0, 10)];

/// Next milestone by minimum words learned, highest first.
const MILESTONE_LADDER: [(u32, &str); 4] = [
    (500, "vocabulary master"),
    (100, "vocabulary expert"),
    (50, "100 core words"),
    (0, "first word"),
];

const LOW_MASTERY: u8 = 60;
const FEW_ROOTS: u32 = 20;
const SHORT_STREAK: u32 = 7;

/// Build suggestions for the learner's current statistics.
pub fn suggest(stats: &LearningStats) -> LearningSuggestions {
    let recommended_daily_words = DAILY_WORD_LADDER
        .iter()
        .find(|(streak, _)| stats.streak >= *streak)
        .map(|(_, words)| *words)
        .unwrap_or(10);

    let mut focus_areas = Vec::new();
    if stats.average_mastery < LOW_MASTERY {
        focus_areas.push("review learned words more often".to_string());
    }
    if stats.total_roots_learned < FEW_ROOTS {
        focus_areas.push("expand root knowledge".to_string());
    }
    if stats.streak < SHORT_STREAK {
        focus_areas.push("keep a daily study streak".to_string());
    }

    let next_milestone = MILESTONE_LADDER
        .iter()
        .find(|(words, _)| stats.total_words_learned >= *words)
        .map(|(_, milestone)| *milestone)
        .unwrap_or("first word")
        .to_string();

    LearningSuggestions {
        recommended_daily_words,
        focus_areas,
        next_milestone,
    }
}
