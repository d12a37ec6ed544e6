//! Forgetting-curve review interval.
//!
//! The rest period doubles with every review and scales with mastery:
//! `interval = max(1, round(2^(reviews - 1) * mastery / 50))` days.

use super::ReviewAlgorithm;

/// Exponential review interval scaled by mastery.
#[derive(Debug, Clone)]
pub struct ForgettingCurve {
    /// Growth factor per review.
    pub base: f64,
    /// Mastery at which the interval equals the bare exponential term.
    pub mastery_pivot: f64,
    pub minimum_interval: i64,
}

impl Default for ForgettingCurve {
    fn default() -> Self {
        Self {
            base: 2.0,
            mastery_pivot: 50.0,
            minimum_interval: 1,
        }
    }
}

impl ReviewAlgorithm for ForgettingCurve {
    fn name(&self) -> &'static str {
        "forgetting_curve"
    }

    fn interval_days(&self, review_count: u32, mastery_level: u8) -> i64 {
        let exponent = review_count.saturating_sub(1).min(i32::MAX as u32) as i32;
        let base_interval = self.base.powi(exponent);
        let multiplier = mastery_level as f64 / self.mastery_pivot;
        // `as` saturates on overflow
        ((base_interval * multiplier).round() as i64).max(self.minimum_interval)
    }
}
