//! Time source used to stamp generated artifacts.

use chrono::{Local, NaiveDateTime};

/// Format used for every `Generated on:` stamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Supplies the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Current time rendered with [`TIMESTAMP_FORMAT`].
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// Milliseconds since the Unix epoch, used for default output names.
    fn unix_millis(&self) -> i64 {
        self.now().and_utc().timestamp_millis()
    }
}

/// Wall-clock time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn unix_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .ok()
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_formats_timestamp() {
        let clock = FixedClock::parse("2024-03-01 09:30:05").unwrap();
        assert_eq!(clock.timestamp(), "2024-03-01 09:30:05");
    }

    #[test]
    fn fixed_clock_unix_millis() {
        let clock = FixedClock::parse("1970-01-01 00:00:01").unwrap();
        assert_eq!(clock.unix_millis(), 1000);
    }

    #[test]
    fn rejects_malformed_timestamp() {
        assert!(FixedClock::parse("yesterday").is_none());
    }
}
