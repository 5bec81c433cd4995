//! All-day event expansion.
//!
//! A date-only entry has no start or end to merge against, yet it still
//! occupies the working day. Expansion rewrites it into concrete
//! working-hour blocks; timed events pass through untouched.

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::interval::{local_time, TimeInterval};
use crate::event::{CalendarEvent, EventTime};

/// Longest run of dates a single all-day entry expands to.
pub const MAX_ALL_DAY_SPAN_DAYS: usize = 31;

/// Local working hours an all-day entry blocks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
        }
    }
}

impl WorkingHours {
    /// Working-hour block on `date`, if the hours form a valid range.
    pub fn on(&self, date: NaiveDate, offset: FixedOffset) -> Option<TimeInterval> {
        TimeInterval::new(
            local_time(date, self.start_hour, offset)?,
            local_time(date, self.end_hour, offset)?,
        )
    }
}

/// Convert events into busy intervals, expanding all-day entries.
pub fn expand_events(events: &[CalendarEvent], hours: WorkingHours, offset: FixedOffset) -> Vec<TimeInterval> {
    let mut busy = Vec::with_capacity(events.len());
    for event in events {
        if event.is_all_day() {
            busy.extend(all_day_dates(event).filter_map(|date| hours.on(date, offset)));
        } else if let (Some(start), Some(end)) = (event.start_time.instant(offset), event.end_time.instant(offset)) {
            busy.extend(TimeInterval::new(start, end));
        }
    }
    busy
}

/// Dates an all-day entry covers. A date-only end is exclusive, as calendar
/// exports encode it; any other end covers just the start date.
fn all_day_dates(event: &CalendarEvent) -> impl Iterator<Item = NaiveDate> {
    let first = event.start_time.date();
    let span = match event.end_time {
        EventTime::Date(last) => usize::try_from((last - first).num_days()).unwrap_or(1),
        EventTime::At(_) => 1,
    };
    first.iter_days().take(span.clamp(1, MAX_ALL_DAY_SPAN_DAYS))
}
