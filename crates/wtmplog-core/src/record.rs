//! The session record model shared by the store and the report engine.

use serde::{Deserialize, Serialize};

/// Pseudo-account name stored on boot markers.
pub const BOOT_USER: &str = "reboot";

/// Sentinel terminal value marking boot/shutdown pseudo-sessions.
///
/// The shutdown path locates the still-open boot marker by this value
/// rather than by timestamp.
pub const BOOT_TTY: &str = "~";

/// Terminal text displayed for boot markers, overriding the stored value.
pub const BOOT_TTY_DISPLAY: &str = "system boot";

/// Process-accounting record kinds, following the classic utmp numbering.
///
/// Only user sessions and boot markers carry meaning here; every other
/// code is preserved so anomalous rows can be reported rather than lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A normal user login session (code 7).
    UserProcess,
    /// A system-boot marker (code 2).
    BootTime,
    /// Any other reserved process-accounting code.
    Other(i64),
}

impl RecordKind {
    const USER_PROCESS: i64 = 7;
    const BOOT_TIME: i64 = 2;

    /// Maps a stored type code onto the closed variant set.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            Self::USER_PROCESS => Self::UserProcess,
            Self::BOOT_TIME => Self::BootTime,
            other => Self::Other(other),
        }
    }

    /// The integer code stored in the database.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::UserProcess => Self::USER_PROCESS,
            Self::BootTime => Self::BOOT_TIME,
            Self::Other(code) => code,
        }
    }
}

impl Serialize for RecordKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for RecordKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = i64::deserialize(deserializer)?;
        Ok(Self::from_code(code))
    }
}

/// One accounting entry: a login/logout pair, or an unmatched login.
///
/// Records are created open by the store's login operation, completed by
/// the logout operation, and read-only thereafter. `id` is the correlation
/// key between the two and is never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Store-assigned handle, unique across the log.
    pub id: i64,
    /// What kind of session this row represents.
    pub kind: RecordKind,
    /// Account or pseudo-account name ("reboot" for boot markers).
    pub user: String,
    /// Microseconds since the Unix epoch; always present.
    pub login_time: i64,
    /// Microseconds since the Unix epoch, or `None` while the session is open.
    pub logout_time: Option<i64>,
    /// Terminal or pseudo-device identifier.
    pub tty: String,
    /// Remote host, or the kernel release string on boot markers.
    #[serde(default)]
    pub host: String,
    /// Originating service name.
    #[serde(default)]
    pub service: String,
}

impl SessionRecord {
    /// Terminal text for display: boot markers always show the
    /// "system boot" sentinel regardless of the stored value.
    #[must_use]
    pub fn display_tty(&self) -> &str {
        match self.kind {
            RecordKind::BootTime => BOOT_TTY_DISPLAY,
            _ => &self.tty,
        }
    }
}
