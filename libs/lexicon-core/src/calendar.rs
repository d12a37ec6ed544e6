//! Study-day calendar arithmetic.
//!
//! A "study day" is a calendar date in the learner's timezone, shifted by a
//! daily reset hour: with a reset hour of 4, studying at 01:30 still counts
//! toward the previous day. A reset hour of 0 is plain local midnight.

use crate::error::{CoreError, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Maps instants onto study days.
#[derive(Debug, Clone)]
pub struct StudyCalendar<Tz: TimeZone = Local> {
    tz: Tz,
    daily_reset_hour: u32,
}

impl StudyCalendar<Local> {
    /// Calendar in the system timezone.
    pub fn local(daily_reset_hour: u32) -> Self {
        Self::new(Local, daily_reset_hour)
    }
}

impl<Tz: TimeZone> StudyCalendar<Tz> {
    /// Reset hours past 23 are clamped to 23.
    pub fn new(tz: Tz, daily_reset_hour: u32) -> Self {
        Self {
            tz,
            daily_reset_hour: daily_reset_hour.min(23),
        }
    }

    pub fn daily_reset_hour(&self) -> u32 {
        self.daily_reset_hour
    }

    /// Study day an instant belongs to.
    pub fn study_day(&self, at: DateTime<Utc>) -> NaiveDate {
        let local = at.with_timezone(&self.tz);
        (local - Duration::hours(self.daily_reset_hour as i64)).date_naive()
    }
}

/// Sunday that starts the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_sunday() as i64)
}

/// The seven days of the week containing `day`, Sunday first.
pub fn week_days(day: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let start = week_start(day);
    (0..7).map(move |offset| start + Duration::days(offset))
}

/// Parse a `YYYY-MM-DD` date.
///
/// RFC 3339 timestamps are also accepted and mapped to the local calendar
/// date, which is how older clients stored plan dates (local midnight).
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Local).date_naive())
        .map_err(|_| CoreError::InvalidDate(value.to_string()))
}

/// Serde helper for date fields that may hold a legacy timestamp.
pub fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}
