//! Host request/response boundary.
//!
//! A hosting service hands the engine a JSON body and gets back either a
//! window or `null`. Only a structurally broken body is an error; everything
//! inside it is left to the tolerant normalizer.

use chrono::{NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::FocusWindowFinder;
use crate::error::{json_kind, ValidationError};
use crate::selector::FocusWindowResult;

/// Incoming request: untyped events and preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusWindowRequest {
    #[serde(default)]
    pub events: Value,
    #[serde(default)]
    pub preferences: Value,
}

impl FocusWindowRequest {
    pub fn new(events: Value, preferences: Value) -> Self {
        Self { events, preferences }
    }

    /// Parse and structurally validate a request body.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the body is not JSON, not an object,
    /// or carries a `preferences` value that is neither an object nor null.
    pub fn from_json(body: &str) -> Result<Self, ValidationError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| ValidationError::MalformedBody(e.to_string()))?;
        Self::from_value(value)
    }

    /// Validate an already parsed body.
    ///
    /// # Errors
    ///
    /// See [`FocusWindowRequest::from_json`].
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut body) = value else {
            return Err(ValidationError::NotAnObject { found: json_kind(&value) });
        };

        let preferences = body.remove("preferences").unwrap_or(Value::Null);
        if !(preferences.is_object() || preferences.is_null()) {
            return Err(ValidationError::InvalidValue {
                field: "preferences".into(),
                message: format!("expected an object, got {}", json_kind(&preferences)),
            });
        }

        Ok(Self {
            events: body.remove("events").unwrap_or(Value::Null),
            preferences,
        })
    }
}

/// Wire shape of a found window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusWindowResponse {
    pub start_time: String,
    pub end_time: String,
    /// Minutes
    pub duration: i64,
    pub score: u8,
    pub reasoning: String,
}

impl From<FocusWindowResult> for FocusWindowResponse {
    fn from(result: FocusWindowResult) -> Self {
        Self {
            start_time: result.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            end_time: result.end_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            duration: result.duration_minutes,
            score: result.score,
            reasoning: result.reasoning,
        }
    }
}

/// Run a validated request. `None` means no window qualifies, which a host
/// reports as a successful empty payload.
pub fn respond(finder: &FocusWindowFinder, request: &FocusWindowRequest, today: NaiveDate) -> Option<FocusWindowResponse> {
    finder
        .find(&request.events, &request.preferences, today)
        .map(FocusWindowResponse::from)
}
