//! Clock and timezone source

use crate::model::TIMESTAMP_FORMAT;
use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Source of the local time used to stamp rows and name exports
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// `now()` formatted as a row timestamp (`dd/mm/yyyy hh:mm`)
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// System time shifted to a fixed UTC offset
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    /// Offset in whole hours; out-of-range values fall back to UTC
    pub fn from_hours(hours: i32) -> Self {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!("Invalid UTC offset {}h, using UTC", hours);
                Utc.fix()
            });
        Self { offset }
    }
}

impl Default for OffsetClock {
    /// GMT-3 (Brasília time)
    fn default() -> Self {
        Self::from_hours(-3)
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// A clock stopped at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let at = DateTime::parse_from_rfc3339("2025-03-07T09:05:00-03:00").unwrap();
        assert_eq!(FixedClock(at).timestamp(), "07/03/2025 09:05");
    }

    #[test]
    fn test_offset_clock() {
        let clock = OffsetClock::default();
        assert_eq!(clock.now().offset().local_minus_utc(), -3 * 3600);

        let utc = OffsetClock::from_hours(99);
        assert_eq!(utc.now().offset().local_minus_utc(), 0);
    }
}
