//! Best-candidate selection and the human-readable justification.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::preferences::{PreferredTime, Preferences};
use crate::scoring::ScoredCandidate;

/// The chosen focus window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusWindowResult {
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub duration_minutes: i64,
    pub score: u8,
    pub reasoning: String,
}

/// Highest-scoring candidate with a score above zero.
///
/// Ties go to the candidate encountered first.
pub fn select_best(candidates: &[ScoredCandidate]) -> Option<&ScoredCandidate> {
    candidates
        .iter()
        .filter(|c| c.score > 0)
        .fold(None, |best: Option<&ScoredCandidate>, c| match best {
            Some(b) if b.score >= c.score => Some(b),
            _ => Some(c),
        })
}

/// One or two sentences on why this window was picked.
pub fn explain(candidate: &ScoredCandidate, preferences: &Preferences) -> String {
    let hour = candidate.interval.start_hour();
    let preferred = preferences.preferred_time;

    let timing = if preferred.contains_hour(hour) {
        format!("aligns with your {preferred} preference")
    } else {
        format!("is available during the {}", PreferredTime::period_of(hour))
    };

    let buffer = preferences.buffer_minutes;
    let buffer_note = if buffer == 0 {
        "No buffer was requested around your existing commitments.".to_string()
    } else if candidate.buffered {
        format!("It keeps a {buffer}-minute buffer from your other commitments.")
    } else {
        format!("The surrounding gap is too tight to keep the full {buffer}-minute buffer.")
    };

    format!(
        "This {}-minute window {timing}. {buffer_note}",
        candidate.duration_minutes
    )
}

/// Pick the best candidate and attach its reasoning.
pub fn select_and_explain(candidates: &[ScoredCandidate], preferences: &Preferences) -> Option<FocusWindowResult> {
    let best = select_best(candidates)?;
    Some(FocusWindowResult {
        start_time: best.interval.start,
        end_time: best.interval.end,
        duration_minutes: best.duration_minutes,
        score: best.score,
        reasoning: explain(best, preferences),
    })
}
