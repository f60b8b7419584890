//! Core domain logic for the login accounting log.
//!
//! This crate contains the fundamental types and logic for:
//! - Session records: the in-memory shape of one accounting entry
//! - Reconciliation: classifying open sessions as still-active or
//!   crash-presumed based on boot markers later in the pass
//! - Rendering: the fixed-width "last"-style report and its time formats
//!
//! It performs no I/O; the storage layer feeds it records one at a time
//! and the CLI decides where rendered lines go.

pub mod reconcile;
pub mod record;
pub mod render;
pub mod time;

pub use reconcile::{Reconciler, SessionStatus};
pub use record::{BOOT_TTY, BOOT_TTY_DISPLAY, BOOT_USER, RecordKind, SessionRecord};
pub use render::{ReportError, render_line, render_report};
pub use time::{SessionDuration, TimeFormat, USEC_PER_SEC, format_timestamp};
