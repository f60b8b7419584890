//! Fixed-width report rendering.
//!
//! Output is the only bit-exact contract of the system: consumers may
//! depend on the column widths, so every field is hard-truncated to its
//! column and space-padded when shorter.

use std::fmt;
use std::io;

use chrono::TimeZone;
use thiserror::Error;

use crate::reconcile::{Reconciler, SessionStatus};
use crate::record::SessionRecord;
use crate::time::{TimeFormat, format_timestamp};

const USER_WIDTH: usize = 8;
const TTY_WIDTH: usize = 12;
const HOST_WIDTH: usize = 16;
const LOGIN_WIDTH: usize = 16;
const LOGOUT_WIDTH: usize = 5;

/// Report generation failures.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The record stream failed mid-pass; the store's message is carried
    /// through verbatim.
    #[error("{0}")]
    Store(String),
    /// Writing a rendered line failed.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

fn column(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}

/// Renders one classified record as a fixed-width line.
///
/// Layout: user (8), terminal (12), host (16), login time (16, short
/// format), ` - `, logout column (5: clock text or a status word), then
/// the free-length duration/status text.
pub fn render_line<Tz>(record: &SessionRecord, status: &SessionStatus, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let login = format_timestamp(TimeFormat::Short, record.login_time, tz);
    let (logout, length) = match *status {
        SessionStatus::Closed {
            logout_time,
            duration,
        } => (
            format_timestamp(TimeFormat::Clock, logout_time, tz),
            duration.to_string(),
        ),
        SessionStatus::StillLoggedIn => ("still".to_string(), "logged in".to_string()),
        SessionStatus::StillRunning => ("still".to_string(), "running".to_string()),
        SessionStatus::Crashed => ("crash".to_string(), String::new()),
        SessionStatus::Unknown(code) => ("ERROR".to_string(), format!("Unknown: {code}")),
    };

    format!(
        "{} {} {} {} - {} {}",
        column(&record.user, USER_WIDTH),
        column(record.display_tty(), TTY_WIDTH),
        column(&record.host, HOST_WIDTH),
        column(&login, LOGIN_WIDTH),
        column(&logout, LOGOUT_WIDTH),
        length,
    )
}

/// Streams a full report: one line per record, rendered and written as
/// each record arrives, then the trailing summary line.
///
/// `label` names the store in the summary (`"<label> begins <time>"`);
/// the summary is omitted when the stream yields no records. A stream
/// error aborts the pass immediately.
pub fn render_report<I, E, Tz, W>(
    records: I,
    label: &str,
    tz: &Tz,
    out: &mut W,
) -> Result<(), ReportError>
where
    I: IntoIterator<Item = Result<SessionRecord, E>>,
    E: fmt::Display,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
    W: io::Write,
{
    let mut engine = Reconciler::new();
    for record in records {
        let record = record.map_err(|err| ReportError::Store(err.to_string()))?;
        let status = engine.observe(&record);
        writeln!(out, "{}", render_line(&record, &status, tz))?;
    }

    if let Some(earliest) = engine.earliest_login() {
        writeln!(out)?;
        writeln!(
            out,
            "{label} begins {}",
            format_timestamp(TimeFormat::Full, earliest, tz)
        )?;
    }
    Ok(())
}
