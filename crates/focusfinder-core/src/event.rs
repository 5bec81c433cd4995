//! Calendar events as the engine sees them after normalization.
//!
//! Timestamps arrive in whatever shape the host's calendar export produced.
//! [`EventTime::parse`] accepts the common encodings and converts every
//! instant into the engine's local offset, so downstream stages can read
//! local hours straight off the value.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Offset-less layouts interpreted in the engine's local offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Offset layouts that RFC 3339 parsing rejects (e.g. `+0900`).
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// One end of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum EventTime {
    /// A concrete instant.
    At(DateTime<FixedOffset>),
    /// A calendar date with no time of day (all-day entries).
    Date(NaiveDate),
}

impl EventTime {
    /// Parse a JSON value into an event time.
    ///
    /// Accepts RFC 3339 strings, naive date-times (local), date-only strings,
    /// integer epoch milliseconds and Google Calendar style
    /// `{"dateTime": ..}` / `{"date": ..}` objects. Anything else is `None`.
    pub fn parse(value: &Value, offset: FixedOffset) -> Option<Self> {
        match value {
            Value::String(raw) => Self::parse_str(raw, offset),
            Value::Number(n) => {
                let millis = n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))?;
                DateTime::from_timestamp_millis(millis).map(|dt| EventTime::At(dt.with_timezone(&offset)))
            }
            Value::Object(obj) => obj
                .get("dateTime")
                .or_else(|| obj.get("date_time"))
                .filter(|v| !v.is_null())
                .and_then(|v| Self::parse(v, offset))
                .or_else(|| match obj.get("date") {
                    Some(Value::String(raw)) => {
                        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok().map(EventTime::Date)
                    }
                    _ => None,
                }),
            _ => None,
        }
    }

    fn parse_str(raw: &str, offset: FixedOffset) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(EventTime::At(dt.with_timezone(&offset)));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(EventTime::Date(date));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
                return Some(EventTime::At(dt.with_timezone(&offset)));
            }
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .and_then(|naive| offset.from_local_datetime(&naive).single())
            .map(EventTime::At)
    }

    /// The instant this time denotes; dates resolve to local midnight.
    pub fn instant(&self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        match self {
            EventTime::At(dt) => Some(*dt),
            EventTime::Date(date) => offset.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single(),
        }
    }

    pub fn is_date_only(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Local calendar date of this time.
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::At(dt) => dt.date_naive(),
            EventTime::Date(date) => *date,
        }
    }
}

/// A validated calendar event. `end_time` is always after `start_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start_time: EventTime,
    pub end_time: EventTime,
}

impl CalendarEvent {
    /// Build an event, or `None` unless it ends after it starts.
    pub fn new(title: impl Into<String>, start_time: EventTime, end_time: EventTime, offset: FixedOffset) -> Option<Self> {
        let start = start_time.instant(offset)?;
        let end = end_time.instant(offset)?;
        (end > start).then(|| Self {
            title: title.into(),
            start_time,
            end_time,
        })
    }

    /// Entries with a date-only start occupy the working day.
    pub fn is_all_day(&self) -> bool {
        self.start_time.is_date_only()
    }
}
