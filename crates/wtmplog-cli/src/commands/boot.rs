//! Boot command for recording the system-start marker.

use anyhow::{Context, Result};
use chrono::Utc;

use wtmplog_core::{BOOT_TTY, BOOT_USER, RecordKind};
use wtmplog_db::Database;

/// Writes an open boot record stamped with `now_usec` and returns its id.
///
/// The record uses the "reboot" pseudo-account and the tty sentinel the
/// shutdown path later searches for; the kernel release travels in the
/// host field.
pub fn write_boot_record(db: &Database, now_usec: i64, kernel_release: &str) -> Result<i64> {
    let id = db
        .login(
            RecordKind::BootTime,
            BOOT_USER,
            now_usec,
            BOOT_TTY,
            kernel_release,
            "",
        )
        .context("failed to write boot record")?;
    tracing::debug!(id, kernel_release, "boot record written");
    Ok(id)
}

pub fn run(db: &Database) -> Result<i64> {
    let release = kernel_release()?;
    write_boot_record(db, Utc::now().timestamp_micros(), &release)
}

fn kernel_release() -> Result<String> {
    let uts = nix::sys::utsname::uname().context("failed to read uname")?;
    Ok(uts.release().to_string_lossy().into_owned())
}
