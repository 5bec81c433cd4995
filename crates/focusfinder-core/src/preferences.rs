//! User scheduling preferences.
//!
//! Preferences are never rejected: out-of-range numbers are clamped and
//! unrecognized values fall back to defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_DURATION_RANGE: (i64, i64) = (15, 480);
pub const BUFFER_RANGE: (i64, i64) = (0, 60);

pub const DEFAULT_MINIMUM_DURATION: i64 = 75;
pub const DEFAULT_BUFFER: i64 = 15;

/// Preferred time of day for focused work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreferredTime {
    Morning,
    Afternoon,
    Evening,
    #[default]
    None,
}

impl PreferredTime {
    /// Lenient parse; anything unrecognized is `None`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "morning" => Self::Morning,
            "afternoon" => Self::Afternoon,
            "evening" => Self::Evening,
            _ => Self::None,
        }
    }

    /// Start-hour band `[from, to)` this preference covers.
    pub fn band(&self) -> Option<(u32, u32)> {
        match self {
            Self::Morning => Some((8, 12)),
            Self::Afternoon => Some((12, 17)),
            Self::Evening => Some((17, 21)),
            Self::None => None,
        }
    }

    /// Most desirable hour within the band. No preference uses the morning peak.
    pub fn peak_hour(&self) -> u32 {
        match self {
            Self::Morning | Self::None => 10,
            Self::Afternoon => 14,
            Self::Evening => 18,
        }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        self.band().is_some_and(|(from, to)| hour >= from && hour < to)
    }

    /// Coarse part of day an hour falls in, for describing a window.
    pub fn period_of(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 17 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    pub fn is_set(&self) -> bool {
        *self != Self::None
    }
}

impl std::fmt::Display for PreferredTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Morning => write!(f, "morning"),
            Self::Afternoon => write!(f, "afternoon"),
            Self::Evening => write!(f, "evening"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Normalized preferences. Construct through [`Preferences::new`] or
/// [`Preferences::from_value`] to get clamped values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub preferred_time: PreferredTime,
    #[serde(default = "default_minimum_duration")]
    pub minimum_duration_minutes: i64,
    #[serde(default = "default_buffer")]
    pub buffer_minutes: i64,
}

fn default_minimum_duration() -> i64 {
    DEFAULT_MINIMUM_DURATION
}
fn default_buffer() -> i64 {
    DEFAULT_BUFFER
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            preferred_time: PreferredTime::None,
            minimum_duration_minutes: DEFAULT_MINIMUM_DURATION,
            buffer_minutes: DEFAULT_BUFFER,
        }
    }
}

impl Preferences {
    pub fn new(preferred_time: PreferredTime, minimum_duration_minutes: i64, buffer_minutes: i64) -> Self {
        Self {
            preferred_time,
            minimum_duration_minutes: minimum_duration_minutes.clamp(MIN_DURATION_RANGE.0, MIN_DURATION_RANGE.1),
            buffer_minutes: buffer_minutes.clamp(BUFFER_RANGE.0, BUFFER_RANGE.1),
        }
    }

    /// Re-apply range clamping (e.g. after loading from a config file).
    pub fn clamped(self) -> Self {
        Self::new(self.preferred_time, self.minimum_duration_minutes, self.buffer_minutes)
    }

    /// Sanitize an untyped preferences value, using built-in defaults.
    pub fn from_value(value: &Value) -> Self {
        Self::from_value_or(value, Self::default())
    }

    /// Sanitize an untyped preferences value; missing or unusable fields
    /// take their value from `defaults`.
    pub fn from_value_or(value: &Value, defaults: Preferences) -> Self {
        let defaults = defaults.clamped();
        let Some(obj) = value.as_object() else {
            return defaults;
        };
        let field = |keys: &[&str]| keys.iter().find_map(|k| obj.get(*k).filter(|v| !v.is_null()));

        let preferred_time = match field(&["preferredTime", "preferred_time"]) {
            Some(Value::String(raw)) => PreferredTime::parse(raw),
            Some(_) => PreferredTime::None,
            None => defaults.preferred_time,
        };
        let minimum = field(&["minimumDuration", "minimumDurationMinutes", "minimum_duration", "minimum_duration_minutes"])
            .and_then(coerce_minutes)
            .unwrap_or(defaults.minimum_duration_minutes);
        let buffer = field(&["bufferTime", "bufferMinutes", "buffer_time", "buffer_minutes"])
            .and_then(coerce_minutes)
            .unwrap_or(defaults.buffer_minutes);

        Self::new(preferred_time, minimum, buffer)
    }
}

/// Whole minutes from a JSON number or numeric string.
fn coerce_minutes(value: &Value) -> Option<i64> {
    let as_float = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            n.as_f64()?
        }
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    // `as` saturates at the i64 bounds; clamping happens afterwards.
    as_float.is_finite().then(|| as_float.round() as i64)
}
