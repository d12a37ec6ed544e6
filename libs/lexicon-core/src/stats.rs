//! Learning statistics derived from word progress and session history.

use crate::calendar::{week_start, StudyCalendar};
use crate::types::{LearningStats, StudySession, WordProgressRecord};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::{BTreeSet, HashSet};

/// Default number of words per week the learner aims for.
pub const DEFAULT_WEEKLY_GOAL: u32 = 50;

/// Compute statistics from a snapshot of both stores.
pub fn compute_stats<'a, Tz: TimeZone>(
    records: impl IntoIterator<Item = &'a WordProgressRecord>,
    sessions: &[StudySession],
    calendar: &StudyCalendar<Tz>,
    now: DateTime<Utc>,
    weekly_goal: u32,
) -> LearningStats {
    let mut total_words = 0u32;
    let mut mastery_sum = 0u64;
    let mut roots: HashSet<&str> = HashSet::new();
    for record in records {
        total_words += 1;
        mastery_sum += record.mastery_level as u64;
        roots.extend(record.roots());
    }

    let average_mastery = if total_words == 0 {
        0
    } else {
        (mastery_sum as f64 / total_words as f64).round() as u8
    };

    let study_days = study_days(sessions, calendar);
    let today = calendar.study_day(now);

    LearningStats {
        total_words_learned: total_words,
        total_roots_learned: roots.len() as u32,
        total_study_time: sessions.iter().map(|s| s.session_duration).sum(),
        average_mastery,
        streak: current_streak(&study_days, today),
        longest_streak: longest_streak(&study_days),
        last_study_date: sessions
            .iter()
            .map(|s| s.start_time)
            .max()
            .unwrap_or(now),
        weekly_goal,
        weekly_progress: weekly_progress(sessions, calendar, today),
    }
}

/// Distinct study days on which at least one session started.
pub fn study_days<Tz: TimeZone>(
    sessions: &[StudySession],
    calendar: &StudyCalendar<Tz>,
) -> BTreeSet<NaiveDate> {
    sessions
        .iter()
        .map(|session| calendar.study_day(session.start_time))
        .collect()
}

/// Consecutive study days ending today. Zero if today has no session.
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(today);
    while let Some(current) = day {
        if !days.contains(&current) {
            break;
        }
        streak += 1;
        day = current.pred_opt();
    }
    streak
}

/// Longest run of consecutive study days anywhere in the history.
pub fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        run = match previous.and_then(|p| p.succ_opt()) {
            Some(next) if next == day => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

/// Words studied in sessions that started during the current week.
pub fn weekly_progress<Tz: TimeZone>(
    sessions: &[StudySession],
    calendar: &StudyCalendar<Tz>,
    today: NaiveDate,
) -> u32 {
    let start = week_start(today);
    let end = start + Duration::days(7);
    sessions
        .iter()
        .filter(|session| {
            let day = calendar.study_day(session.start_time);
            day >= start && day < end
        })
        .map(|session| session.words_studied.len() as u32)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;
    use pretty_assertions::assert_eq;

    fn calendar() -> StudyCalendar<Utc> {
        StudyCalendar::new(Utc, 0)
    }

    // Wednesday
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 18, 0, 0).unwrap()
    }

    fn session(days_ago: i64, words: &[&str], minutes: u32) -> StudySession {
        let start = now() - Duration::days(days_ago) - Duration::hours(2);
        let mut session = StudySession::new(format!("s{days_ago}"), start);
        for word in words {
            session.add_word(word);
        }
        session.end_time = Some(start + Duration::minutes(minutes as i64));
        session.session_duration = minutes;
        session
    }

    fn record(word: &str, context: &str, mastery: u8) -> WordProgressRecord {
        WordProgressRecord {
            word: word.into(),
            learned_at: now(),
            last_reviewed: now(),
            review_count: 1,
            mastery_level: mastery,
            difficulty: Difficulty::Medium,
            context: context.into(),
        }
    }

    #[test]
    fn empty_history_yields_zeroed_stats() {
        let stats = compute_stats(std::iter::empty(), &[], &calendar(), now(), DEFAULT_WEEKLY_GOAL);
        assert_eq!(stats, LearningStats::empty(now(), DEFAULT_WEEKLY_GOAL));
    }

    #[test]
    fn three_consecutive_days_make_a_streak_of_three() {
        let sessions = vec![
            session(0, &["inspect"], 10),
            session(1, &["respect"], 5),
            session(2, &["aspect"], 7),
        ];
        let stats = compute_stats(std::iter::empty(), &sessions, &calendar(), now(), 50);
        assert_eq!(stats.streak, 3);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.total_study_time, 22);
    }

    #[test]
    fn streak_is_zero_when_today_not_studied() {
        let sessions = vec![session(1, &[], 5), session(2, &[], 5)];
        let stats = compute_stats(std::iter::empty(), &sessions, &calendar(), now(), 50);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn longest_streak_spans_gaps() {
        let sessions = vec![
            session(0, &[], 1),
            session(5, &[], 1),
            session(6, &[], 1),
            session(7, &[], 1),
            session(7, &[], 1),
            session(9, &[], 1),
        ];
        let stats = compute_stats(std::iter::empty(), &sessions, &calendar(), now(), 50);
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.longest_streak, 3);
        assert!(stats.longest_streak >= stats.streak);
    }

    #[test]
    fn weekly_progress_counts_sessions_since_sunday() {
        // now is Wednesday; 3 days ago is the previous Sunday, 4 days ago Saturday
        let sessions = vec![
            session(0, &["inspect", "respect"], 5),
            session(3, &["vision"], 5),
            session(4, &["aspect", "suspect", "prospect"], 5),
        ];
        let stats = compute_stats(std::iter::empty(), &sessions, &calendar(), now(), 50);
        assert_eq!(stats.weekly_progress, 3);
    }

    #[test]
    fn weekly_progress_ignores_sessions_after_this_week() {
        // 4 days ahead is next Sunday
        let sessions = vec![
            session(0, &["inspect"], 5),
            session(-3, &["vision"], 5),
            session(-4, &["aspect", "suspect"], 5),
        ];
        let stats = compute_stats(std::iter::empty(), &sessions, &calendar(), now(), 50);
        assert_eq!(stats.weekly_progress, 2);
    }

    #[test]
    fn roots_and_mastery_aggregate_over_records() {
        let records = vec![
            record("biography", "graph,bio", 55),
            record("geography", "graph,geo", 70),
            record("inspect", "spect", 40),
            record("loose", "", 56),
        ];
        let stats = compute_stats(&records, &[], &calendar(), now(), 50);
        assert_eq!(stats.total_words_learned, 4);
        assert_eq!(stats.total_roots_learned, 4);
        // (55 + 70 + 40 + 56) / 4 = 55.25
        assert_eq!(stats.average_mastery, 55);
    }

    #[test]
    fn last_study_date_is_latest_session_start() {
        let sessions = vec![session(3, &[], 1), session(1, &[], 1)];
        let stats = compute_stats(std::iter::empty(), &sessions, &calendar(), now(), 50);
        assert_eq!(stats.last_study_date, sessions[1].start_time);
    }
}
