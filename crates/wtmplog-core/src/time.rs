//! Conversion between stored microsecond timestamps and display text.
//!
//! Timestamps are stored as whole microseconds since the Unix epoch and
//! divided down to seconds (truncating, not rounding) before formatting.
//! Formatting is generic over the timezone so reports use local time while
//! tests pin UTC.

use std::fmt;

use chrono::{DateTime, TimeZone};

/// Microseconds per second, the resolution of stored timestamps.
pub const USEC_PER_SEC: i64 = 1_000_000;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// The three fixed display formats used by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// ctime-style calendar text, e.g. `Thu Jan  1 00:00:00 1970`.
    /// Used for the trailing summary line.
    Full,
    /// Abbreviated weekday, month, day and clock, e.g. `Thu Jan  1 00:00`.
    /// Used for login times; exactly 16 columns.
    Short,
    /// Bare `HH:MM`, used for logout times; exactly 5 columns.
    Clock,
}

impl TimeFormat {
    const fn pattern(self) -> &'static str {
        match self {
            Self::Full => "%a %b %e %H:%M:%S %Y",
            Self::Short => "%a %b %e %H:%M",
            Self::Clock => "%H:%M",
        }
    }
}

/// Formats a microsecond timestamp in the given timezone.
///
/// Timestamps outside chrono's representable range fall back to the epoch
/// rather than failing; the accounting log never refuses to render.
pub fn format_timestamp<Tz>(format: TimeFormat, usec: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let secs = usec / USEC_PER_SEC;
    let when = DateTime::from_timestamp(secs, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(tz);
    when.format(format.pattern()).to_string()
}

/// Elapsed time of a closed session, decomposed for display.
///
/// Components are always in range: minutes in `[0, 59]`, hours in
/// `[0, 23]`, days unbounded. Spans are clamped at zero so a logout
/// recorded before its login never renders negative digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionDuration {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl SessionDuration {
    /// Decomposes the whole-second span between two microsecond timestamps.
    #[must_use]
    pub const fn from_span(login_usec: i64, logout_usec: i64) -> Self {
        let secs = (logout_usec - login_usec) / USEC_PER_SEC;
        let secs = if secs < 0 { 0 } else { secs };
        Self {
            days: secs / SECS_PER_DAY,
            hours: (secs / SECS_PER_HOUR) % 24,
            minutes: (secs / SECS_PER_MINUTE) % 60,
        }
    }
}

impl fmt::Display for SessionDuration {
    /// `(D+HH:MM)` with a day count, ` (HH:MM)` with hours, ` (00:MM)`
    /// otherwise. The leading space keeps sub-day durations aligned with
    /// the day form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "({}+{:02}:{:02})", self.days, self.hours, self.minutes)
        } else if self.hours > 0 {
            write!(f, " ({:02}:{:02})", self.hours, self.minutes)
        } else {
            write!(f, " (00:{:02})", self.minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    #[test]
    fn full_format_matches_ctime_layout() {
        assert_eq!(
            format_timestamp(TimeFormat::Full, 0, &Utc),
            "Thu Jan  1 00:00:00 1970"
        );
    }

    #[test]
    fn short_format_is_sixteen_columns() {
        let text = format_timestamp(TimeFormat::Short, 0, &Utc);
        assert_eq!(text, "Thu Jan  1 00:00");
        assert_eq!(text.len(), 16);
    }

    #[test]
    fn clock_format_is_five_columns() {
        // 3725s = 01:02:05, seconds dropped
        let text = format_timestamp(TimeFormat::Clock, 3_725 * USEC_PER_SEC, &Utc);
        assert_eq!(text, "01:02");
    }

    #[test]
    fn sub_second_microseconds_truncate() {
        assert_eq!(
            format_timestamp(TimeFormat::Clock, 999_999, &Utc),
            format_timestamp(TimeFormat::Clock, 0, &Utc)
        );
    }

    #[test]
    fn duration_decomposes_hours_and_minutes() {
        let duration = SessionDuration::from_span(0, 3_725_000_000);
        assert_eq!(
            duration,
            SessionDuration {
                days: 0,
                hours: 1,
                minutes: 2
            }
        );
        assert_eq!(duration.to_string(), " (01:02)");
    }

    #[test]
    fn duration_with_days_uses_plus_form() {
        // 2 days, 3 hours, 4 minutes
        let secs = 2 * 86_400 + 3 * 3_600 + 4 * 60;
        let duration = SessionDuration::from_span(0, secs * USEC_PER_SEC);
        assert_eq!(duration.to_string(), "(2+03:04)");
    }

    #[test]
    fn sub_hour_duration_pads_zero_hours() {
        let duration = SessionDuration::from_span(0, 5 * 60 * USEC_PER_SEC);
        assert_eq!(duration.to_string(), " (00:05)");
    }

    #[test]
    fn negative_span_clamps_to_zero() {
        let duration = SessionDuration::from_span(100 * USEC_PER_SEC, 50 * USEC_PER_SEC);
        assert_eq!(
            duration,
            SessionDuration {
                days: 0,
                hours: 0,
                minutes: 0
            }
        );
        assert_eq!(duration.to_string(), " (00:00)");
    }

    #[test]
    fn components_stay_in_range_for_long_spans() {
        // 400 days and change
        let secs = 400 * 86_400 + 23 * 3_600 + 59 * 60 + 59;
        let duration = SessionDuration::from_span(0, secs * USEC_PER_SEC);
        assert_eq!(duration.days, 400);
        assert!((0..24).contains(&duration.hours));
        assert!((0..60).contains(&duration.minutes));
    }
}
