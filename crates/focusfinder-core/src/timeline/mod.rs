//! Interval algebra for the focus-window pipeline.
//!
//! This module provides:
//! - All-day event expansion into working-hour busy blocks
//! - Sorting and merging of busy intervals
//! - Gap detection inside a day window
//! - Buffering, duration filtering and preference-anchored carving

mod buffer;
mod carve;
mod expand;
mod gap;
mod interval;
mod merge;

pub use buffer::{apply_buffer, BufferedGap};
pub use carve::{carve_windows, Candidate, CarveRules};
pub use expand::{expand_events, WorkingHours, MAX_ALL_DAY_SPAN_DAYS};
pub use gap::{find_gaps, DayWindow};
pub use interval::{local_time, TimeInterval};
pub use merge::merge_intervals;

#[cfg(test)]
pub(crate) use interval::test_support;
