//! Preference-anchored sub-windows for oversized gaps.
//!
//! Left alone, a huge free block is proposed from its earliest moment. For
//! every gap over the threshold an extra window starting at the preferred
//! peak hour is offered next to the full gap.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::buffer::BufferedGap;
use super::interval::{local_time, TimeInterval};
use crate::preferences::Preferences;

/// A window considered for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub interval: TimeInterval,
    pub buffered: bool,
    /// Anchored sub-window rather than a whole gap.
    pub carved: bool,
}

/// Thresholds for carving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarveRules {
    /// Gaps strictly longer than this get an anchored window.
    pub threshold_minutes: i64,
    /// Length of the anchored window (never shorter than the minimum duration).
    pub window_minutes: i64,
    /// Anchored windows starting at or after this local hour are not offered.
    pub latest_start_hour: u32,
}

impl Default for CarveRules {
    fn default() -> Self {
        Self {
            threshold_minutes: 180,
            window_minutes: 90,
            latest_start_hour: 21,
        }
    }
}

/// Turn surviving gaps into candidates: each gap, followed by its anchored
/// window when one fits entirely inside it.
pub fn carve_windows(gaps: &[BufferedGap], preferences: &Preferences, rules: CarveRules) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(gaps.len() * 2);
    for gap in gaps {
        candidates.push(Candidate {
            interval: gap.interval,
            buffered: gap.buffered,
            carved: false,
        });
        if gap.interval.duration_minutes() > rules.threshold_minutes {
            candidates.extend(anchored_window(gap, preferences, rules));
        }
    }
    candidates
}

fn anchored_window(gap: &BufferedGap, preferences: &Preferences, rules: CarveRules) -> Option<Candidate> {
    let length = rules.window_minutes.max(preferences.minimum_duration_minutes);
    let offset = *gap.interval.start.offset();
    let start = local_time(gap.interval.date(), preferences.preferred_time.peak_hour(), offset)?;
    let window = TimeInterval::new(start, start.checked_add_signed(Duration::minutes(length))?)?;
    if !gap.interval.contains(&window) || window.start_hour() >= rules.latest_start_hour {
        return None;
    }

    // Inside a shrunk gap the buffer holds already; inside an unshrunk one it
    // holds only if the window sits far enough from both edges.
    let buffer = Duration::minutes(preferences.buffer_minutes);
    let buffered = gap.buffered
        || (window.start - gap.interval.start >= buffer && gap.interval.end - window.end >= buffer);

    Some(Candidate {
        interval: window,
        buffered,
        carved: true,
    })
}
