//! Weighted candidate scoring.
//!
//! Each candidate window gets a 0-100 score from four weighted objective
//! terms. The per-term breakdown is kept alongside the score so the result
//! can be explained.
//!
//! ```text
//! score = round(100 * (w_d * duration + w_p * preference + w_b * buffer + w_t * time_of_day))
//! ```
//!
//! | Term            | Default weight | Range |
//! |-----------------|----------------|-------|
//! | duration        | 0.3            | 0..1  |
//! | time_preference | 0.4            | 0..1  |
//! | buffer          | 0.2            | 1     |
//! | time_of_day     | 0.1            | 0..1  |
//!
//! A time-of-day score of zero vetoes the candidate entirely. Starts at or
//! after the configured latest start hour score zero there as well.

use serde::{Deserialize, Serialize};

use crate::preferences::{PreferredTime, Preferences};
use crate::timeline::{Candidate, TimeInterval};

/// Individual objective term with weight and score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTerm {
    /// Term name
    pub name: String,
    /// Weight for this term (0.0 to 1.0)
    pub weight: f64,
    /// Raw score (0.0 to 1.0, higher is better)
    pub score: f64,
    /// Weighted contribution
    pub contribution: f64,
}

impl ObjectiveTerm {
    pub fn new(name: impl Into<String>, weight: f64, score: f64) -> Self {
        let weight = weight.clamp(0.0, 1.0);
        let score = score.clamp(0.0, 1.0);
        Self {
            name: name.into(),
            weight,
            score,
            contribution: weight * score,
        }
    }
}

/// Complete scoring breakdown for explainability
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Individual objective terms
    pub terms: Vec<ObjectiveTerm>,
    /// Total weighted score (0.0 to 1.0)
    pub total_score: f64,
}

impl ScoreBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_term(&mut self, term: ObjectiveTerm) {
        self.total_score += term.contribution;
        self.terms.push(term);
    }

    pub fn term(&self, name: &str) -> Option<&ObjectiveTerm> {
        self.terms.iter().find(|t| t.name == name)
    }
}

/// Weights for each objective term
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_duration_weight")]
    pub duration: f64,
    #[serde(default = "default_time_preference_weight")]
    pub time_preference: f64,
    #[serde(default = "default_buffer_weight")]
    pub buffer: f64,
    #[serde(default = "default_time_of_day_weight")]
    pub time_of_day: f64,
}

fn default_duration_weight() -> f64 {
    0.3
}
fn default_time_preference_weight() -> f64 {
    0.4
}
fn default_buffer_weight() -> f64 {
    0.2
}
fn default_time_of_day_weight() -> f64 {
    0.1
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            duration: default_duration_weight(),
            time_preference: default_time_preference_weight(),
            buffer: default_buffer_weight(),
            time_of_day: default_time_of_day_weight(),
        }
    }
}

impl ScoringWeights {
    /// Validate that all weights are in [0.0, 1.0]
    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("duration", self.duration),
            ("time_preference", self.time_preference),
            ("buffer", self.buffer),
            ("time_of_day", self.time_of_day),
        ];
        for (name, weight) in weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(format!("Weight '{name}' must be in [0.0, 1.0], got {weight}"));
            }
        }
        Ok(())
    }
}

/// A candidate window with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub interval: TimeInterval,
    pub duration_minutes: i64,
    /// 0 to 100
    pub score: u8,
    pub buffered: bool,
    pub carved: bool,
    pub breakdown: ScoreBreakdown,
}

/// Scores candidate windows against the user's preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScorer {
    weights: ScoringWeights,
    optimal_duration_minutes: f64,
    duration_tolerance_minutes: f64,
    latest_start_hour: u32,
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateScorer {
    /// Default weights, optimum 105 minutes with 120 minutes of tolerance.
    pub fn new() -> Self {
        Self {
            weights: ScoringWeights::default(),
            optimal_duration_minutes: 105.0,
            duration_tolerance_minutes: 120.0,
            latest_start_hour: 21,
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_duration_curve(mut self, optimal_minutes: i64, tolerance_minutes: i64) -> Self {
        self.optimal_duration_minutes = optimal_minutes as f64;
        self.duration_tolerance_minutes = tolerance_minutes.max(1) as f64;
        self
    }

    /// Candidates starting at or after `hour` get a time-of-day score of zero.
    pub fn with_latest_start_hour(mut self, hour: u32) -> Self {
        self.latest_start_hour = hour;
        self
    }

    pub fn score(&self, candidate: &Candidate, preferences: &Preferences) -> ScoredCandidate {
        let interval = candidate.interval;
        let duration_minutes = interval.duration_minutes();
        let time_of_day = if interval.start_hour() >= self.latest_start_hour {
            0.0
        } else {
            time_of_day_score(interval.start_hour())
        };

        let mut breakdown = ScoreBreakdown::new();
        breakdown.add_term(ObjectiveTerm::new(
            "duration",
            self.weights.duration,
            self.duration_score(duration_minutes, preferences.minimum_duration_minutes),
        ));
        breakdown.add_term(ObjectiveTerm::new(
            "time_preference",
            self.weights.time_preference,
            time_preference_score(&interval, preferences.preferred_time),
        ));
        breakdown.add_term(ObjectiveTerm::new("buffer", self.weights.buffer, buffer_score()));
        breakdown.add_term(ObjectiveTerm::new("time_of_day", self.weights.time_of_day, time_of_day));

        let score = if time_of_day == 0.0 {
            0
        } else {
            (breakdown.total_score * 100.0).round().clamp(0.0, 100.0) as u8
        };

        ScoredCandidate {
            interval,
            duration_minutes,
            score,
            buffered: candidate.buffered,
            carved: candidate.carved,
            breakdown,
        }
    }

    /// Peaks at the optimal duration and falls off linearly either side.
    pub fn duration_score(&self, minutes: i64, minimum: i64) -> f64 {
        if minutes < minimum {
            return 0.0;
        }
        let distance = (minutes as f64 - self.optimal_duration_minutes).abs();
        (1.0 - distance / self.duration_tolerance_minutes).max(0.0)
    }
}

/// Neutral without a preference; inside the band, closer to the peak is
/// better with a floor of 0.5; outside the band a flat 0.2.
pub fn time_preference_score(interval: &TimeInterval, preferred: PreferredTime) -> f64 {
    if !preferred.is_set() {
        return 0.5;
    }
    if !preferred.contains_hour(interval.start_hour()) {
        return 0.2;
    }
    let distance = (interval.start_hours() - f64::from(preferred.peak_hour())).abs();
    (1.0 - distance / 4.0).max(0.5)
}

/// Buffers are enforced upstream, so every surviving candidate complies.
pub fn buffer_score() -> f64 {
    1.0
}

pub fn time_of_day_score(hour: u32) -> f64 {
    match hour {
        21.. => 0.0,
        8..=17 => 1.0,
        18..=20 => 0.5,
        _ => 0.3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::test_support::*;

    fn candidate(from: (u32, u32), to: (u32, u32)) -> Candidate {
        Candidate {
            interval: span(from, to),
            buffered: true,
            carved: false,
        }
    }

    fn prefs(preferred: PreferredTime) -> Preferences {
        Preferences::new(preferred, 75, 15)
    }

    #[test]
    fn test_objective_term_creation() {
        let term = ObjectiveTerm::new("test", 0.5, 0.8);
        assert_eq!(term.name, "test");
        assert!((term.contribution - 0.4).abs() < 1e-9);

        let clamped = ObjectiveTerm::new("over", 1.5, 2.0);
        assert!((clamped.contribution - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_breakdown_calculation() {
        let mut breakdown = ScoreBreakdown::new();
        breakdown.add_term(ObjectiveTerm::new("term1", 0.5, 0.8));
        breakdown.add_term(ObjectiveTerm::new("term2", 0.5, 0.6));
        assert!((breakdown.total_score - 0.7).abs() < 0.01);
        assert_eq!(breakdown.term("term2").map(|t| t.score), Some(0.6));
    }

    #[test]
    fn test_duration_score_curve() {
        let scorer = CandidateScorer::new();
        assert_eq!(scorer.duration_score(60, 75), 0.0);
        assert!((scorer.duration_score(105, 75) - 1.0).abs() < 1e-9);
        assert!((scorer.duration_score(90, 75) - 0.875).abs() < 1e-9);
        assert!((scorer.duration_score(165, 75) - 0.5).abs() < 1e-9);
        assert_eq!(scorer.duration_score(400, 75), 0.0);
    }

    #[test]
    fn test_time_preference_score() {
        let morning = span((10, 0), (11, 30));
        assert_eq!(time_preference_score(&morning, PreferredTime::None), 0.5);
        assert!((time_preference_score(&morning, PreferredTime::Morning) - 1.0).abs() < 1e-9);
        assert_eq!(time_preference_score(&morning, PreferredTime::Evening), 0.2);

        let afternoon = span((15, 15), (16, 45));
        assert!((time_preference_score(&afternoon, PreferredTime::Afternoon) - 0.6875).abs() < 1e-9);

        // Far edge of the band is floored at 0.5
        let late_morning = span((8, 0), (9, 30));
        assert!((time_preference_score(&late_morning, PreferredTime::Morning) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_time_of_day_score() {
        assert_eq!(time_of_day_score(7), 0.3);
        assert_eq!(time_of_day_score(8), 1.0);
        assert_eq!(time_of_day_score(17), 1.0);
        assert_eq!(time_of_day_score(18), 0.5);
        assert_eq!(time_of_day_score(20), 0.5);
        assert_eq!(time_of_day_score(21), 0.0);
        assert_eq!(time_of_day_score(23), 0.0);
    }

    #[test]
    fn test_total_score() {
        let scorer = CandidateScorer::new();

        // 0.3 * 0.875 + 0.4 * 1.0 + 0.2 + 0.1 = 0.9625
        let scored = scorer.score(&candidate((10, 0), (11, 30)), &prefs(PreferredTime::Morning));
        assert_eq!(scored.score, 96);
        assert_eq!(scored.duration_minutes, 90);
        assert_eq!(scored.breakdown.terms.len(), 4);

        // 0.3 * 0.125 + 0.4 * 0.2 + 0.2 + 0.1 = 0.4175
        let scored = scorer.score(&candidate((10, 15), (13, 45)), &prefs(PreferredTime::Afternoon));
        assert_eq!(scored.score, 42);
    }

    #[test]
    fn test_late_start_is_vetoed() {
        let scorer = CandidateScorer::new();
        let scored = scorer.score(&candidate((21, 0), (22, 45)), &prefs(PreferredTime::Evening));
        assert_eq!(scored.score, 0);
    }

    #[test]
    fn test_configured_cutoff_vetoes() {
        let scorer = CandidateScorer::new().with_latest_start_hour(17);
        let scored = scorer.score(&candidate((18, 0), (19, 30)), &prefs(PreferredTime::Evening));
        assert_eq!(scored.score, 0);
        assert_eq!(scored.breakdown.term("time_of_day").map(|t| t.score), Some(0.0));

        let scored = scorer.score(&candidate((16, 0), (17, 30)), &prefs(PreferredTime::Afternoon));
        assert!(scored.score > 0);
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            duration: 1.0,
            time_preference: 0.0,
            buffer: 0.0,
            time_of_day: 0.0,
        };
        assert!(weights.validate().is_ok());
        let scorer = CandidateScorer::new().with_weights(weights);
        let scored = scorer.score(&candidate((9, 0), (10, 45)), &prefs(PreferredTime::None));
        assert_eq!(scored.score, 100);

        let bad = ScoringWeights { duration: 1.5, ..ScoringWeights::default() };
        assert!(bad.validate().is_err());
    }
}
