//! Review scheduling algorithms.

pub mod forgetting_curve;

use crate::types::WordProgressRecord;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Seconds in a day, for fractional day arithmetic.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Trait for review interval algorithms.
pub trait ReviewAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Days a word should rest after its last review.
    fn interval_days(&self, review_count: u32, mastery_level: u8) -> i64;

    /// Whether the word is due for review at `as_of`.
    fn is_due(&self, record: &WordProgressRecord, as_of: DateTime<Utc>) -> bool {
        let interval = self.interval_days(record.review_count, record.mastery_level);
        days_since(record.last_reviewed, as_of) >= interval as f64
    }
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn ReviewAlgorithm>> {
    match name {
        "forgetting_curve" => Some(Box::new(forgetting_curve::ForgettingCurve::default())),
        _ => None,
    }
}

/// Fractional days elapsed between two instants. Negative if `to` precedes `from`.
pub fn days_since(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    to.signed_duration_since(from).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Words due at `as_of`, weakest first, then stalest first.
pub fn due_for_review<'a>(
    records: impl IntoIterator<Item = &'a WordProgressRecord>,
    algorithm: &dyn ReviewAlgorithm,
    as_of: DateTime<Utc>,
) -> Vec<WordProgressRecord> {
    let mut due: Vec<WordProgressRecord> = records
        .into_iter()
        .filter(|record| algorithm.is_due(record, as_of))
        .cloned()
        .collect();
    due.sort_by(review_order);
    due
}

fn review_order(a: &WordProgressRecord, b: &WordProgressRecord) -> Ordering {
    a.mastery_level
        .cmp(&b.mastery_level)
        .then(a.last_reviewed.cmp(&b.last_reviewed))
        .then_with(|| a.word.cmp(&b.word))
}
