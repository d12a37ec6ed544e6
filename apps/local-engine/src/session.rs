//! Study session tracker.
//!
//! Two states: idle (no current session) and active. Finished sessions are
//! appended to the history log and never modified afterwards.

use crate::error::{EngineError, Result};
use crate::store::{self, KeyValueStore, SessionRepository};
use chrono::{DateTime, Utc};
use lexicon_core::mastery::normalize_word;
use lexicon_core::types::StudySession;
use lexicon_core::CoreError;
use tracing::{debug, info};
use uuid::Uuid;

pub const MIN_FOCUS_LEVEL: u8 = 1;
pub const MAX_FOCUS_LEVEL: u8 = 5;
pub const DEFAULT_FOCUS_LEVEL: u8 = 3;

pub struct SessionTracker<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> SessionTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Start a session. Fails if one is already active.
    pub fn start(&self, now: DateTime<Utc>) -> Result<String> {
        if let Some(active) = self.store.load_current_session()? {
            return Err(EngineError::SessionAlreadyActive(active.id));
        }
        let session = StudySession::new(Uuid::new_v4().to_string(), now);
        self.store.save_current_session(Some(&session))?;
        info!(session_id = %session.id, "study session started");
        Ok(session.id)
    }

    /// Id of the active session, starting one if idle.
    pub fn ensure_started(&self, now: DateTime<Utc>) -> Result<String> {
        match self.store.load_current_session()? {
            Some(active) => Ok(active.id),
            None => self.start(now),
        }
    }

    /// Add a word to the active session. Returns false when idle or already added.
    pub fn add_word(&self, word: &str) -> Result<bool> {
        let word = normalize_word(word)?;
        self.update_current(|session| session.add_word(&word))
    }

    /// Add a root to the active session. Returns false when idle or already added.
    pub fn add_root(&self, root: &str) -> Result<bool> {
        let root = root.trim();
        if root.is_empty() {
            return Err(EngineError::InvalidInput("root must not be empty".to_string()));
        }
        self.update_current(|session| session.add_root(root))
    }

    /// Finish the active session and append it to the history.
    ///
    /// Returns `None` if no session was active; the focus level is only
    /// checked when one is.
    pub fn end(
        &self,
        focus_level: u8,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<StudySession>> {
        let Some(mut session) = self.store.load_current_session()? else {
            return Ok(None);
        };
        if !(MIN_FOCUS_LEVEL..=MAX_FOCUS_LEVEL).contains(&focus_level) {
            return Err(CoreError::InvalidFocusLevel(focus_level).into());
        }

        session.end_time = Some(now);
        session.session_duration = duration_minutes(session.start_time, now);
        session.focus_level = focus_level;
        session.notes = notes.filter(|notes| !notes.trim().is_empty());

        let mut history = self.store.load_sessions()?;
        history.push(session.clone());
        self.store.save_sessions(&history)?;
        self.store.save_current_session(None)?;

        info!(
            session_id = %session.id,
            minutes = session.session_duration,
            words = session.words_studied.len(),
            "study session ended"
        );
        Ok(Some(session))
    }

    pub fn current(&self) -> store::Result<Option<StudySession>> {
        self.store.load_current_session()
    }

    /// Finished sessions, most recent first.
    pub fn history(&self) -> store::Result<Vec<StudySession>> {
        let mut sessions = self.store.load_sessions()?;
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(sessions)
    }

    /// Drop the history and any active session.
    pub fn clear_all(&self) -> store::Result<()> {
        self.store.save_current_session(None)?;
        self.store.save_sessions(&[])
    }

    fn update_current<F>(&self, apply: F) -> Result<bool>
    where
        F: FnOnce(&mut StudySession) -> bool,
    {
        let Some(mut session) = self.store.load_current_session()? else {
            debug!("no active session, ignoring addition");
            return Ok(false);
        };
        let changed = apply(&mut session);
        if changed {
            self.store.save_current_session(Some(&session))?;
        }
        Ok(changed)
    }
}

/// Whole minutes between two instants, rounded half up and never negative.
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let seconds = end.signed_duration_since(start).num_seconds().max(0);
    ((seconds + 30) / 60).min(u32::MAX as i64) as u32
}
