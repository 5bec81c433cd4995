//! Input normalization.
//!
//! Turns untyped host input into typed, invariant-respecting values. Nothing
//! here returns an error: unusable events are dropped, preferences clamped.

use chrono::FixedOffset;
use serde_json::{Map, Value};

use crate::event::{CalendarEvent, EventTime};
use crate::preferences::Preferences;

const START_KEYS: &[&str] = &["startTime", "start_time", "start"];
const END_KEYS: &[&str] = &["endTime", "end_time", "end"];
const TITLE_KEYS: &[&str] = &["title", "summary"];

/// Sanitized engine input.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    pub events: Vec<CalendarEvent>,
    pub preferences: Preferences,
}

/// Normalize both halves of a request.
pub fn normalize(
    raw_events: &Value,
    raw_preferences: &Value,
    offset: FixedOffset,
    defaults: Preferences,
) -> NormalizedInput {
    NormalizedInput {
        events: normalize_events(raw_events, offset),
        preferences: Preferences::from_value_or(raw_preferences, defaults),
    }
}

/// Keep every element that is a well-formed event; non-arrays are empty.
pub fn normalize_events(raw: &Value, offset: FixedOffset) -> Vec<CalendarEvent> {
    let Some(items) = raw.as_array() else {
        if !raw.is_null() {
            tracing::trace!("event list is not an array, treating as empty");
        }
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let event = item.as_object().and_then(|obj| parse_event(obj, offset));
            if event.is_none() {
                tracing::trace!(index, "dropping malformed event");
            }
            event
        })
        .collect()
}

fn parse_event(obj: &Map<String, Value>, offset: FixedOffset) -> Option<CalendarEvent> {
    let start = EventTime::parse(first_present(obj, START_KEYS)?, offset)?;
    let end = EventTime::parse(first_present(obj, END_KEYS)?, offset)?;
    let title = first_present(obj, TITLE_KEYS)
        .and_then(Value::as_str)
        .unwrap_or_default();
    CalendarEvent::new(title, start, end, offset)
}

fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
}
