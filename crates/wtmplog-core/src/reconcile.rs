//! Classification of raw session records into report statuses.
//!
//! The engine makes a single pass over the record stream in store delivery
//! order (newest first) and decides, for every record without a logout,
//! whether the session is still active or was lost to a reboot. All pass
//! state lives on the [`Reconciler`] instance so independent reports can
//! run side by side.

use crate::record::{RecordKind, SessionRecord};
use crate::time::SessionDuration;

/// The report classification of one session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// The session has a logout time and an elapsed duration.
    Closed {
        logout_time: i64,
        duration: SessionDuration,
    },
    /// An open user session with no later boot marker: still logged in.
    StillLoggedIn,
    /// An open boot marker: the system is still running.
    StillRunning,
    /// An open session observed after a boot marker in the pass; the
    /// system restarted without an orderly logout.
    Crashed,
    /// An open record of a kind the report does not understand.
    Unknown(i64),
}

/// Single-pass state for crash detection and the summary line.
#[derive(Debug, Default)]
pub struct Reconciler {
    after_reboot: bool,
    earliest_login: Option<i64>,
}

impl Reconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one record and updates the pass state.
    ///
    /// Records must be delivered newest first: crash detection presumes
    /// that any boot marker seen earlier in the pass happened *after* the
    /// sessions that follow it. That ordering is a precondition on the
    /// store, deliberately not re-checked here.
    pub fn observe(&mut self, record: &SessionRecord) -> SessionStatus {
        self.earliest_login = Some(match self.earliest_login {
            Some(earliest) => earliest.min(record.login_time),
            None => record.login_time,
        });

        let status = match record.logout_time {
            Some(logout_time) => SessionStatus::Closed {
                logout_time,
                duration: SessionDuration::from_span(record.login_time, logout_time),
            },
            None if self.after_reboot => SessionStatus::Crashed,
            None => match record.kind {
                RecordKind::UserProcess => SessionStatus::StillLoggedIn,
                RecordKind::BootTime => SessionStatus::StillRunning,
                RecordKind::Other(code) => SessionStatus::Unknown(code),
            },
        };

        // Every boot marker flips the flag, closed or not: anything still
        // open below it in the pass predates that restart.
        if record.kind == RecordKind::BootTime {
            self.after_reboot = true;
        }

        status
    }

    /// Minimum login time observed so far, for the trailing summary line.
    #[must_use]
    pub const fn earliest_login(&self) -> Option<i64> {
        self.earliest_login
    }
}
