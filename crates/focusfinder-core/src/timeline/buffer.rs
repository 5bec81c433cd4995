//! Buffering and minimum-duration filtering of raw gaps.

use serde::{Deserialize, Serialize};

use super::interval::TimeInterval;
use crate::preferences::Preferences;

/// A gap that survived buffering and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferedGap {
    pub interval: TimeInterval,
    /// Whether the gap keeps the requested buffer from its neighbours.
    /// False when it was too small to shrink and kept whole.
    pub buffered: bool,
}

/// Shrink gaps by the buffer and drop the ones that cannot host a session.
///
/// A gap is shrunk on both ends only when it is at least
/// `minimum + 2 * buffer` long; smaller gaps are kept as-is. The result is
/// then dropped if shorter than the minimum or starting at or after
/// `latest_start_hour`.
pub fn apply_buffer(gaps: &[TimeInterval], preferences: &Preferences, latest_start_hour: u32) -> Vec<BufferedGap> {
    let minimum = preferences.minimum_duration_minutes;
    let buffer = preferences.buffer_minutes;

    gaps.iter()
        .map(|gap| {
            if buffer == 0 {
                return BufferedGap { interval: *gap, buffered: true };
            }
            let shrunk = (gap.duration_minutes() >= minimum + 2 * buffer)
                .then(|| gap.shrink(buffer))
                .flatten();
            match shrunk {
                Some(interval) => BufferedGap { interval, buffered: true },
                None => BufferedGap { interval: *gap, buffered: false },
            }
        })
        .filter(|g| g.interval.duration_minutes() >= minimum)
        .filter(|g| g.interval.start_hour() < latest_start_hour)
        .collect()
}
