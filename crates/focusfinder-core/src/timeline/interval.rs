//! Immutable time interval shared by busy blocks, gaps and candidates.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` span of time in the engine's local offset.
///
/// Every transformation returns a new interval; nothing mutates in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeInterval {
    /// Create an interval, or `None` unless `end > start`.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Local hour of day the interval starts in.
    pub fn start_hour(&self) -> u32 {
        self.start.hour()
    }

    /// Local start time as fractional hours (10:30 -> 10.5).
    pub fn start_hours(&self) -> f64 {
        f64::from(self.start.hour()) + f64::from(self.start.minute()) / 60.0
    }

    /// Local calendar date the interval starts on.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Move both ends inward by `minutes`. `None` if nothing would remain.
    pub fn shrink(&self, minutes: i64) -> Option<Self> {
        let by = Duration::minutes(minutes);
        Self::new(self.start + by, self.end - by)
    }

    /// Move both ends outward by `minutes`.
    pub fn expand(&self, minutes: i64) -> Self {
        let by = Duration::minutes(minutes.max(0));
        Self {
            start: self.start - by,
            end: self.end + by,
        }
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.start.format("%Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// `date` at `hour:00` in `offset`. Hour 24 lands on the following midnight.
pub fn local_time(date: NaiveDate, hour: u32, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    let local = offset.from_local_datetime(&midnight).single()?;
    local.checked_add_signed(Duration::hours(i64::from(hour.min(24))))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    pub fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 3).unwrap()
    }

    /// 2025-10-03 at `h:m` UTC.
    pub fn at(h: u32, m: u32) -> DateTime<FixedOffset> {
        local_time(day(), h, utc()).unwrap() + Duration::minutes(i64::from(m))
    }

    pub fn span(from: (u32, u32), to: (u32, u32)) -> TimeInterval {
        TimeInterval::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
    }
}
