//! Shutdown command for closing the current boot marker.

use anyhow::{Context, Result};
use chrono::Utc;

use wtmplog_core::BOOT_TTY;
use wtmplog_db::Database;

/// Stamps `now_usec` as the logout time of the still-open boot record.
///
/// The record is located in the store by the tty sentinel, never from
/// in-memory state: the process that wrote it at boot is long gone by
/// shutdown time.
pub fn close_boot_record(db: &Database, now_usec: i64) -> Result<()> {
    let id = db
        .open_record_id(BOOT_TTY)
        .context("failed to find open boot record")?;
    db.logout(id, now_usec)
        .context("failed to write shutdown time")?;
    tracing::debug!(id, "boot record closed");
    Ok(())
}

pub fn run(db: &Database) -> Result<()> {
    close_boot_record(db, Utc::now().timestamp_micros())
}

#[cfg(test)]
mod tests {
    use super::*;

    use wtmplog_core::{BOOT_USER, RecordKind};

    #[test]
    fn shutdown_without_boot_record_writes_nothing() {
        let db = Database::open_in_memory().unwrap();

        let err = close_boot_record(&db, 100).unwrap_err();
        assert!(err.to_string().contains("failed to find open boot record"));

        let records = db
            .with_records(|records| records.collect::<Result<Vec<_>, _>>())
            .unwrap()
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn shutdown_closes_latest_boot_only() {
        let db = Database::open_in_memory().unwrap();
        let old_boot = db
            .login(RecordKind::BootTime, BOOT_USER, 100, BOOT_TTY, "", "")
            .unwrap();
        db.logout(old_boot, 150).unwrap();
        let current_boot = db
            .login(RecordKind::BootTime, BOOT_USER, 200, BOOT_TTY, "", "")
            .unwrap();

        close_boot_record(&db, 250).unwrap();

        let records = db
            .with_records(|records| records.collect::<Result<Vec<_>, _>>())
            .unwrap()
            .unwrap();
        let current = records.iter().find(|r| r.id == current_boot).unwrap();
        assert_eq!(current.logout_time, Some(250));
        let old = records.iter().find(|r| r.id == old_boot).unwrap();
        assert_eq!(old.logout_time, Some(150));
    }
}
