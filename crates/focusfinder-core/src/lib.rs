//! # Focus Finder Core Library
//!
//! Finds the single best block of free calendar time for focused work. The
//! engine is a pure function from (events, preferences) to an optional
//! window; the CLI and any hosting service are thin layers over it.
//!
//! ## Architecture
//!
//! - **Normalization**: tolerant parsing of untyped calendar data into
//!   [`CalendarEvent`] and [`Preferences`]
//! - **Timeline**: all-day expansion, busy-block merging, gap detection,
//!   buffering and preference-anchored carving
//! - **Scoring**: weighted 0-100 score with a per-term breakdown
//! - **Selection**: best candidate plus a short justification
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FocusWindowFinder`]: the pipeline
//! - [`FocusWindowRequest`] / [`FocusWindowResponse`]: host boundary
//! - [`Config`]: application configuration management

pub mod api;
pub mod engine;
pub mod error;
pub mod event;
pub mod normalize;
pub mod preferences;
pub mod scoring;
pub mod selector;
pub mod storage;
pub mod timeline;

pub use api::{respond, FocusWindowRequest, FocusWindowResponse};
pub use engine::{find_focus_window, EngineConfig, FocusWindowFinder};
pub use error::{ConfigError, CoreError, ValidationError};
pub use event::{CalendarEvent, EventTime};
pub use normalize::NormalizedInput;
pub use preferences::{Preferences, PreferredTime};
pub use scoring::{ScoreBreakdown, ScoredCandidate, ScoringWeights};
pub use selector::FocusWindowResult;
pub use storage::Config;
pub use timeline::TimeInterval;
