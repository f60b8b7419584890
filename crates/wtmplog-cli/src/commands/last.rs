//! Last command for rendering the session history.

use std::fmt;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};

use wtmplog_core::render::render_report;
use wtmplog_db::Database;

/// Streams the full session history to `writer`, newest first, followed
/// by the summary line naming the store and its earliest login.
pub fn write_history<W, Tz>(db: &Database, label: &str, tz: &Tz, writer: &mut W) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    db.with_records(|records| render_report(records, label, tz, writer))
        .context("failed to read session records")?
        .context("failed to render session history")?;
    Ok(())
}

pub fn run<W: Write>(writer: &mut W, database_path: &Path) -> Result<()> {
    let db = Database::open_read_only(database_path)
        .with_context(|| format!("failed to open {}", database_path.display()))?;
    let label = database_path.display().to_string();
    write_history(&db, &label, &Local, writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use insta::assert_snapshot;

    use wtmplog_core::{BOOT_TTY, BOOT_USER, RecordKind, USEC_PER_SEC};

    fn seed_database(path: &Path) -> Database {
        let db = Database::open(path).unwrap();
        let closed = db
            .login(RecordKind::UserProcess, "alice", 0, "tty1", "", "")
            .unwrap();
        db.logout(closed, 3_725_000_000).unwrap();
        db.login(
            RecordKind::BootTime,
            BOOT_USER,
            100 * USEC_PER_SEC,
            BOOT_TTY,
            "6.1.0-test",
            "",
        )
        .unwrap();
        db
    }

    #[test]
    fn history_renders_newest_first_with_summary() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("wtmplog.db");
        let db = seed_database(&db_path);

        let mut output = Vec::new();
        write_history(&db, &db_path.display().to_string(), &Utc, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&db_path.display().to_string(), "[TEMP]/wtmplog.db");
        assert_snapshot!(output, @r"
        reboot   system boot  6.1.0-test       Thu Jan  1 00:01 - still running
        alice    tty1                          Thu Jan  1 00:00 - 01:02  (01:02)

        [TEMP]/wtmplog.db begins Thu Jan  1 00:00:00 1970
        ");
    }

    #[test]
    fn open_sessions_older_than_a_boot_render_as_crashed() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("wtmplog.db");
        let db = seed_database(&db_path);
        // Open session from before the boot marker at 100s.
        db.login(RecordKind::UserProcess, "bob", 50 * USEC_PER_SEC, "tty2", "", "")
            .unwrap();

        let mut output = Vec::new();
        write_history(&db, "sessions.db", &Utc, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("reboot   system boot"));
        assert!(lines[1].starts_with("bob      tty2"));
        assert!(lines[1].ends_with(" - crash "));
        assert!(lines[2].starts_with("alice    tty1"));
        assert_eq!(lines[4], "sessions.db begins Thu Jan  1 00:00:00 1970");
    }

    #[test]
    fn empty_store_produces_no_output() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("wtmplog.db");
        let db = Database::open(&db_path).unwrap();

        let mut output = Vec::new();
        write_history(&db, "empty.db", &Utc, &mut output).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn missing_database_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("does-not-exist.db");

        let mut output = Vec::new();
        let err = run(&mut output, &db_path).unwrap_err();
        assert!(err.to_string().contains("failed to open"));
    }
}
