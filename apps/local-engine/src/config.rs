//! Engine configuration.

use lexicon_core::planner::DEFAULT_TARGET_WORDS;
use lexicon_core::stats::DEFAULT_WEEKLY_GOAL;
use lexicon_core::types::UserLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

pub const DB_PATH_VAR: &str = "LEXICON_DB_PATH";
pub const WEEKLY_GOAL_VAR: &str = "LEXICON_WEEKLY_GOAL";
pub const DAILY_TARGET_VAR: &str = "LEXICON_DAILY_TARGET";
pub const DAILY_RESET_HOUR_VAR: &str = "LEXICON_DAILY_RESET_HOUR";
pub const USER_LEVEL_VAR: &str = "LEXICON_USER_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Words per week the learner aims for.
    pub weekly_goal: u32,
    /// Plan size when the caller does not ask for one.
    pub default_target_words: u32,
    /// Hour (0-23) at which a new study day begins.
    pub daily_reset_hour: u32,
    /// Level plans are drawn from when the caller does not name one.
    pub default_level: UserLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            default_target_words: DEFAULT_TARGET_WORDS,
            daily_reset_hour: 0,
            default_level: UserLevel::Cet4,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `LEXICON_*` environment variables (and `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let daily_reset_hour = parse_or(&lookup, DAILY_RESET_HOUR_VAR, defaults.daily_reset_hour);
        let daily_reset_hour = if daily_reset_hour > 23 {
            warn!(value = daily_reset_hour, "daily reset hour out of range, using midnight");
            defaults.daily_reset_hour
        } else {
            daily_reset_hour
        };

        Self {
            db_path: lookup(DB_PATH_VAR)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            weekly_goal: parse_or(&lookup, WEEKLY_GOAL_VAR, defaults.weekly_goal),
            default_target_words: parse_or(
                &lookup,
                DAILY_TARGET_VAR,
                defaults.default_target_words,
            ),
            daily_reset_hour,
            default_level: match lookup(USER_LEVEL_VAR) {
                None => defaults.default_level,
                Some(raw) => UserLevel::parse(&raw).unwrap_or_else(|e| {
                    warn!(error = %e, "ignoring user level setting");
                    defaults.default_level
                }),
            },
        }
    }
}

/// `<data_local_dir>/lexicon/lexicon.db`, or the current directory as a fallback.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lexicon")
        .join("lexicon.db")
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(var = name, value = %raw, "ignoring unparsable setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.weekly_goal, 50);
        assert_eq!(config.default_target_words, 10);
        assert_eq!(config.daily_reset_hour, 0);
        assert!(config.db_path.ends_with("lexicon/lexicon.db"));
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            (DB_PATH_VAR, "/tmp/words.db"),
            (WEEKLY_GOAL_VAR, "80"),
            (DAILY_TARGET_VAR, " 15 "),
            (DAILY_RESET_HOUR_VAR, "4"),
            (USER_LEVEL_VAR, "IELTS"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/tmp/words.db"));
        assert_eq!(config.weekly_goal, 80);
        assert_eq!(config.default_target_words, 15);
        assert_eq!(config.daily_reset_hour, 4);
        assert_eq!(config.default_level, UserLevel::Ielts);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = EngineConfig::from_lookup(lookup(&[
            (WEEKLY_GOAL_VAR, "lots"),
            (DAILY_RESET_HOUR_VAR, "25"),
            (USER_LEVEL_VAR, "expert"),
        ]));
        assert_eq!(config.weekly_goal, 50);
        assert_eq!(config.daily_reset_hour, 0);
        assert_eq!(config.default_level, UserLevel::Cet4);
    }
}
