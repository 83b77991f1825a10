//! Burnout study-session timer.
//!
//! A wall-clock state machine with no internal thread: the caller passes
//! `now` into every operation and runs `check` on each user action, which is
//! the event-driven cadence the planner operates at. Timer state is never
//! persisted; each active view owns its own session.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::SessionError;

/// Cumulative session duration (2 hours) after which the session is
/// force-stopped and the user is warned.
pub const BURNOUT_THRESHOLD_SECS: u64 = 2 * 60 * 60;

/// Raised once when a running session crosses the burnout threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnoutWarning {
    /// Length of the session that was force-stopped, in seconds.
    pub session_secs: u64,
    /// Total studied time including earlier sessions, in seconds.
    pub total_secs: u64,
}

impl fmt::Display for BurnoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "burnout warning: {} hours of studying in one session, take a break",
            self.session_secs / 3600
        )
    }
}

/// Tracks one view's study time against the burnout threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudySession {
    started_at: Option<DateTime<Utc>>,
    banked_secs: u64,
}

impl StudySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start studying: records the start instant.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyRunning` if a session is in progress.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.started_at.is_some() {
            return Err(SessionError::AlreadyRunning);
        }
        self.started_at = Some(now);
        Ok(())
    }

    /// Stop studying: folds the running span into the total and clears the
    /// start instant. Returns the length of the stopped session in seconds.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRunning` if no session is in progress.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<u64, SessionError> {
        let started_at = self.started_at.take().ok_or(SessionError::NotRunning)?;
        let session_secs = span_secs(started_at, now);
        self.banked_secs += session_secs;
        Ok(session_secs)
    }

    /// Seconds elapsed in the current session, 0 when idle.
    #[must_use]
    pub fn session_secs(&self, now: DateTime<Utc>) -> u64 {
        self.started_at
            .map(|started_at| span_secs(started_at, now))
            .unwrap_or(0)
    }

    /// Total studied seconds, including the live session if one is running.
    #[must_use]
    pub fn total_secs(&self, now: DateTime<Utc>) -> u64 {
        self.banked_secs + self.session_secs(now)
    }

    /// Burnout check, to be run on every user action.
    ///
    /// When the running session has reached the 2-hour threshold, the
    /// session is force-stopped and a warning is returned; idle sessions and
    /// sessions under the threshold return `None`. Because stopping clears
    /// the start instant, each crossing warns exactly once.
    pub fn check(&mut self, now: DateTime<Utc>) -> Option<BurnoutWarning> {
        let started_at = self.started_at?;
        let session_secs = span_secs(started_at, now);
        if session_secs < BURNOUT_THRESHOLD_SECS {
            return None;
        }

        self.started_at = None;
        self.banked_secs += session_secs;
        let warning = BurnoutWarning {
            session_secs,
            total_secs: self.banked_secs,
        };
        warn!(session_secs, "burnout threshold crossed, session force-stopped");
        Some(warning)
    }
}

#[allow(clippy::cast_sign_loss)]
fn span_secs(started_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - started_at).num_seconds().max(0) as u64
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use planner_core::time::fixed_now;

    #[test]
    fn start_stop_accumulates_total() {
        let mut session = StudySession::new();
        let t0 = fixed_now();

        session.start(t0).unwrap();
        assert!(session.is_running());
        let stopped = session.stop(t0 + Duration::minutes(30)).unwrap();
        assert_eq!(stopped, 30 * 60);

        session.start(t0 + Duration::hours(1)).unwrap();
        session.stop(t0 + Duration::hours(1) + Duration::minutes(15)).unwrap();

        assert_eq!(session.total_secs(t0 + Duration::hours(2)), 45 * 60);
        assert!(!session.is_running());
    }

    #[test]
    fn double_start_is_rejected() {
        let mut session = StudySession::new();
        session.start(fixed_now()).unwrap();
        assert_eq!(session.start(fixed_now()), Err(SessionError::AlreadyRunning));
    }

    #[test]
    fn stop_without_start_is_rejected() {
        let mut session = StudySession::new();
        assert_eq!(session.stop(fixed_now()), Err(SessionError::NotRunning));
    }

    #[test]
    fn check_under_threshold_does_nothing() {
        let mut session = StudySession::new();
        let t0 = fixed_now();
        session.start(t0).unwrap();

        assert_eq!(session.check(t0 + Duration::minutes(119)), None);
        assert!(session.is_running());
    }

    #[test]
    fn crossing_threshold_force_stops_and_warns_once() {
        let mut session = StudySession::new();
        let t0 = fixed_now();
        session.start(t0).unwrap();

        let later = t0 + Duration::hours(2) + Duration::minutes(1);
        let warning = session.check(later).expect("warning");
        assert!(!session.is_running());
        assert_eq!(warning.session_secs, 2 * 3600 + 60);
        assert_eq!(warning.total_secs, warning.session_secs);

        // Already stopped: no second warning for the same crossing.
        assert_eq!(session.check(later + Duration::minutes(5)), None);
        assert_eq!(session.total_secs(later), warning.session_secs);
    }

    #[test]
    fn restarting_after_burnout_resets_the_session_span() {
        let mut session = StudySession::new();
        let t0 = fixed_now();
        session.start(t0).unwrap();
        session.check(t0 + Duration::hours(2)).expect("warning");

        let t1 = t0 + Duration::hours(3);
        session.start(t1).unwrap();
        assert_eq!(session.check(t1 + Duration::minutes(10)), None);
        assert_eq!(session.session_secs(t1 + Duration::minutes(10)), 600);
    }

    #[test]
    fn idle_session_reports_zero_span() {
        let session = StudySession::new();
        assert_eq!(session.session_secs(fixed_now()), 0);
        assert_eq!(session.total_secs(fixed_now()), 0);
    }
}
