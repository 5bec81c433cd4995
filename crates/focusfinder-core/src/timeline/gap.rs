//! Free-time gap detection between busy blocks.
//!
//! Finds the free intervals inside a day window that are not covered by any
//! merged busy block.

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::interval::{local_time, TimeInterval};

/// Local hours bounding the part of the day that is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for DayWindow {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 21,
        }
    }
}

impl DayWindow {
    /// Concrete window on `date`; `None` if the hours do not form a range.
    pub fn on(&self, date: NaiveDate, offset: FixedOffset) -> Option<TimeInterval> {
        TimeInterval::new(
            local_time(date, self.start_hour, offset)?,
            local_time(date, self.end_hour, offset)?,
        )
    }
}

/// Find gaps between busy blocks within `window`.
///
/// `busy` must be sorted and disjoint (see [`super::merge_intervals`]).
/// Blocks reaching outside the window are clipped to it.
///
/// # Returns
/// Gaps sorted by start time. With no blocks inside the window the single
/// gap is the whole window.
pub fn find_gaps(busy: &[TimeInterval], window: TimeInterval) -> Vec<TimeInterval> {
    let mut gaps = Vec::new();
    let mut cursor = window.start;

    for block in busy {
        // Entirely before the free region we are tracking
        if block.end <= cursor {
            continue;
        }
        if block.start >= window.end {
            break;
        }

        if block.start > cursor {
            gaps.extend(TimeInterval::new(cursor, block.start));
        }
        cursor = block.end.min(window.end);
    }

    if cursor < window.end {
        gaps.extend(TimeInterval::new(cursor, window.end));
    }

    gaps
}
