//! The focus-window pipeline.
//!
//! Wires the stages together: normalize, expand all-day entries, merge busy
//! blocks, find gaps, buffer and filter, carve anchored windows, score and
//! select. Every call works on its own data; [`FocusWindowFinder`] only holds
//! immutable configuration and can be shared freely between threads.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{normalize, NormalizedInput};
use crate::preferences::Preferences;
use crate::scoring::{CandidateScorer, ScoredCandidate, ScoringWeights};
use crate::selector::{select_and_explain, FocusWindowResult};
use crate::timeline::{
    apply_buffer, carve_windows, expand_events, find_gaps, merge_intervals, CarveRules, DayWindow, TimeInterval,
    WorkingHours,
};

/// Tunable constants of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// First local hour of the searched day window.
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    /// Local hour the searched day window ends at.
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,
    /// Working hours blocked by an all-day entry.
    #[serde(default = "default_work_start_hour")]
    pub work_start_hour: u32,
    #[serde(default = "default_work_end_hour")]
    pub work_end_hour: u32,
    /// Windows starting at or after this hour are never proposed.
    #[serde(default = "default_latest_start_hour")]
    pub latest_start_hour: u32,
    #[serde(default = "default_carve_threshold_minutes")]
    pub carve_threshold_minutes: i64,
    #[serde(default = "default_carve_window_minutes")]
    pub carve_window_minutes: i64,
    #[serde(default = "default_optimal_duration_minutes")]
    pub optimal_duration_minutes: i64,
    #[serde(default = "default_duration_tolerance_minutes")]
    pub duration_tolerance_minutes: i64,
    /// Local offset from UTC used for every hour-of-day decision.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub weights: ScoringWeights,
}

fn default_day_start_hour() -> u32 {
    8
}
fn default_day_end_hour() -> u32 {
    21
}
fn default_work_start_hour() -> u32 {
    9
}
fn default_work_end_hour() -> u32 {
    17
}
fn default_latest_start_hour() -> u32 {
    21
}
fn default_carve_threshold_minutes() -> i64 {
    180
}
fn default_carve_window_minutes() -> i64 {
    90
}
fn default_optimal_duration_minutes() -> i64 {
    105
}
fn default_duration_tolerance_minutes() -> i64 {
    120
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
            work_start_hour: default_work_start_hour(),
            work_end_hour: default_work_end_hour(),
            latest_start_hour: default_latest_start_hour(),
            carve_threshold_minutes: default_carve_threshold_minutes(),
            carve_window_minutes: default_carve_window_minutes(),
            optimal_duration_minutes: default_optimal_duration_minutes(),
            duration_tolerance_minutes: default_duration_tolerance_minutes(),
            utc_offset_minutes: 0,
            weights: ScoringWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Local offset; out-of-range values fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn day_window(&self) -> DayWindow {
        DayWindow {
            start_hour: self.day_start_hour,
            end_hour: self.day_end_hour,
        }
    }

    pub fn working_hours(&self) -> WorkingHours {
        WorkingHours {
            start_hour: self.work_start_hour,
            end_hour: self.work_end_hour,
        }
    }

    pub fn carve_rules(&self) -> CarveRules {
        CarveRules {
            threshold_minutes: self.carve_threshold_minutes,
            window_minutes: self.carve_window_minutes,
            latest_start_hour: self.latest_start_hour,
        }
    }
}

/// Finds the single best focus window for a day.
#[derive(Debug, Clone)]
pub struct FocusWindowFinder {
    config: EngineConfig,
    defaults: Preferences,
    scorer: CandidateScorer,
}

impl Default for FocusWindowFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusWindowFinder {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let scorer = CandidateScorer::new()
            .with_weights(config.weights)
            .with_duration_curve(config.optimal_duration_minutes, config.duration_tolerance_minutes)
            .with_latest_start_hour(config.latest_start_hour);
        Self {
            config,
            defaults: Preferences::default(),
            scorer,
        }
    }

    /// Preferences used for fields a request leaves out.
    pub fn with_default_preferences(mut self, defaults: Preferences) -> Self {
        self.defaults = defaults.clamped();
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sanitize raw input with this finder's offset and default preferences.
    pub fn normalize(&self, events: &Value, preferences: &Value) -> NormalizedInput {
        normalize(events, preferences, self.config.offset(), self.defaults)
    }

    /// Best window for raw input, or `None` if nothing qualifies.
    ///
    /// `today` is the day searched when there are no events.
    pub fn find(&self, events: &Value, preferences: &Value, today: NaiveDate) -> Option<FocusWindowResult> {
        self.find_normalized(&self.normalize(events, preferences), today)
    }

    pub fn find_normalized(&self, input: &NormalizedInput, today: NaiveDate) -> Option<FocusWindowResult> {
        let candidates = self.score_candidates(input, today);
        let result = select_and_explain(&candidates, &input.preferences);
        match &result {
            Some(window) => tracing::info!(
                start = %window.start_time,
                end = %window.end_time,
                score = window.score,
                "selected focus window"
            ),
            None => tracing::info!("no focus window qualifies"),
        }
        result
    }

    /// Every scored candidate, best first; equal scores keep pipeline order.
    pub fn rank(&self, events: &Value, preferences: &Value, today: NaiveDate) -> Vec<ScoredCandidate> {
        let mut candidates = self.score_candidates(&self.normalize(events, preferences), today);
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }

    /// Merged, disjoint busy blocks for a set of normalized events.
    pub fn busy_blocks(&self, input: &NormalizedInput) -> Vec<TimeInterval> {
        let expanded = expand_events(&input.events, self.config.working_hours(), self.config.offset());
        merge_intervals(&expanded)
    }

    fn score_candidates(&self, input: &NormalizedInput, today: NaiveDate) -> Vec<ScoredCandidate> {
        let prefs = &input.preferences;
        let busy = self.busy_blocks(input);
        tracing::debug!(events = input.events.len(), blocks = busy.len(), "merged busy blocks");

        let date = busy.first().map_or(today, TimeInterval::date);
        let Some(window) = self.config.day_window().on(date, self.config.offset()) else {
            tracing::warn!(
                start = self.config.day_start_hour,
                end = self.config.day_end_hour,
                "day window hours do not form a range"
            );
            return Vec::new();
        };

        let gaps = find_gaps(&busy, window);
        let usable = apply_buffer(&gaps, prefs, self.config.latest_start_hour);
        let candidates = carve_windows(&usable, prefs, self.config.carve_rules());
        tracing::debug!(
            %date,
            gaps = gaps.len(),
            usable = usable.len(),
            candidates = candidates.len(),
            "computed candidates"
        );

        candidates.iter().map(|c| self.scorer.score(c, prefs)).collect()
    }
}

/// Run the pipeline with default configuration, searching today (UTC) when
/// there are no events.
pub fn find_focus_window(events: &Value, preferences: &Value) -> Option<FocusWindowResult> {
    FocusWindowFinder::new().find(events, preferences, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 3).unwrap()
    }

    fn event(start: &str, end: &str) -> Value {
        json!({"startTime": format!("2025-10-03T{start}:00Z"), "endTime": format!("2025-10-03T{end}:00Z"), "title": "Busy"})
    }

    #[test]
    fn test_empty_calendar_prefers_morning_peak() {
        let result = FocusWindowFinder::new().find(&json!([]), &json!({}), today()).unwrap();
        assert_eq!(result.start_time.hour(), 10);
        assert_eq!(result.duration_minutes, 90);
        assert_eq!(result.score, 76);
        assert_eq!(result.start_time.date_naive(), today());
    }

    #[test]
    fn test_two_meetings_with_afternoon_preference() {
        let events = json!([event("09:00", "10:00"), event("14:00", "15:00")]);
        let prefs = json!({"preferredTime": "afternoon", "minimumDuration": 75, "bufferTime": 15});
        let finder = FocusWindowFinder::new();

        let ranked = finder.rank(&events, &prefs, today());
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].score, 58);
        assert_eq!(ranked[1].score, 42);

        let result = finder.find(&events, &prefs, today()).unwrap();
        assert_eq!((result.start_time.hour(), result.start_time.minute()), (15, 15));
        assert_eq!(result.duration_minutes, 330);
        assert!(result.reasoning.contains("afternoon preference"));
    }

    #[test]
    fn test_day_follows_first_event() {
        let events = json!([{"startTime": "2025-11-20T12:00:00Z", "endTime": "2025-11-20T13:00:00Z"}]);
        let result = FocusWindowFinder::new().find(&events, &json!(null), today()).unwrap();
        assert_eq!(result.start_time.date_naive(), NaiveDate::from_ymd_opt(2025, 11, 20).unwrap());
    }

    #[test]
    fn test_offset_shifts_local_hours() {
        let config = EngineConfig {
            utc_offset_minutes: 9 * 60,
            ..EngineConfig::default()
        };
        // 00:00-12:00 UTC is 09:00-21:00 in +09:00, leaving 08:00-09:00 only.
        let events = json!([{"startTime": "2025-10-03T00:00:00Z", "endTime": "2025-10-03T12:00:00Z"}]);
        assert!(FocusWindowFinder::with_config(config).find(&events, &json!({}), today()).is_none());
    }

    #[test]
    fn test_latest_start_bounds_anchored_windows() {
        let config = EngineConfig {
            latest_start_hour: 17,
            ..EngineConfig::default()
        };
        let finder = FocusWindowFinder::with_config(config);
        let prefs = json!({"preferredTime": "evening"});

        let result = finder.find(&json!([]), &prefs, today()).unwrap();
        assert!(result.start_time.hour() < 17);
        assert!(finder
            .rank(&json!([]), &prefs, today())
            .iter()
            .all(|c| c.interval.start_hour() < 17));
    }

    #[test]
    fn test_day_end_at_calendar_limit_yields_nothing() {
        let config = EngineConfig {
            day_end_hour: 24,
            ..EngineConfig::default()
        };
        let finder = FocusWindowFinder::with_config(config);
        assert!(finder.find(&json!([]), &json!({}), NaiveDate::MAX).is_none());
    }

    #[test]
    fn test_inverted_day_window_yields_nothing() {
        let config = EngineConfig {
            day_start_hour: 20,
            day_end_hour: 8,
            ..EngineConfig::default()
        };
        assert!(FocusWindowFinder::with_config(config).find(&json!([]), &json!({}), today()).is_none());
    }

    #[test]
    fn test_default_preferences_fill_missing_fields() {
        let finder = FocusWindowFinder::new()
            .with_default_preferences(Preferences::new(crate::PreferredTime::Evening, 60, 0));
        let input = finder.normalize(&json!([]), &json!({}));
        assert_eq!(input.preferences.preferred_time, crate::PreferredTime::Evening);
        let result = finder.find_normalized(&input, today()).unwrap();
        assert_eq!(result.start_time.hour(), 18);
    }

    #[test]
    fn test_finder_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FocusWindowFinder>();
    }
}
