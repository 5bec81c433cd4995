//! Focus window search over a calendar export.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use clap::Args;
use serde_json::{Map, Value};

use focusfinder_core::{Config, FocusWindowRequest, FocusWindowResponse, ScoredCandidate, TimeInterval};

#[derive(Args)]
pub struct FindArgs {
    /// Request body file ({"events": [...], "preferences": {...}}), "-" for stdin
    #[arg(long, value_name = "FILE", conflicts_with = "events")]
    request: Option<PathBuf>,
    /// Event list file (JSON array), "-" for stdin
    #[arg(long, value_name = "FILE")]
    events: Option<PathBuf>,
    /// Preferred time of day (morning, afternoon, evening)
    #[arg(long)]
    preferred: Option<String>,
    /// Minimum window length in minutes (clamped to 15..=480)
    #[arg(long = "min", value_name = "MINUTES", allow_negative_numbers = true)]
    minimum_duration: Option<i64>,
    /// Buffer kept around commitments in minutes (clamped to 0..=60)
    #[arg(long, value_name = "MINUTES", allow_negative_numbers = true)]
    buffer: Option<i64>,
    /// Day searched when there are no events (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// List every scored candidate instead of only the best one
    #[arg(long)]
    all: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: FindArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let finder = config.finder();
    let today = args
        .date
        .unwrap_or_else(|| Utc::now().with_timezone(&config.engine.offset()).date_naive());

    let mut request = load_request(&args)?;
    request.preferences = apply_overrides(request.preferences, &args);
    tracing::debug!(%today, preferences = %request.preferences, "searching for a focus window");

    if args.all {
        let ranked = finder.rank(&request.events, &request.preferences, today);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        } else if ranked.is_empty() {
            println!("No candidate windows.");
        } else {
            for candidate in &ranked {
                println!("{}", candidate_line(candidate));
            }
        }
        return Ok(());
    }

    let result = finder.find(&request.events, &request.preferences, today);
    if args.json {
        let response = result.map(FocusWindowResponse::from);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    match result {
        Some(window) => {
            let interval = TimeInterval::new(window.start_time, window.end_time)
                .ok_or("selected window has no duration")?;
            println!(
                "Focus window: {} ({} min, score {})",
                interval, window.duration_minutes, window.score
            );
            println!("{}", window.reasoning);
        }
        None => println!("No suitable focus window found."),
    }
    Ok(())
}

/// Score, window, length and the per-term scores behind the total.
fn candidate_line(candidate: &ScoredCandidate) -> String {
    let term = |name: &str| candidate.breakdown.term(name).map_or(0.0, |t| t.score);
    format!(
        "{:>3}  {}  {:>3} min  duration {:.2}  preference {:.2}  time of day {:.2}{}",
        candidate.score,
        candidate.interval,
        candidate.duration_minutes,
        term("duration"),
        term("time_preference"),
        term("time_of_day"),
        if candidate.carved { "  (anchored)" } else { "" }
    )
}

fn load_request(args: &FindArgs) -> Result<FocusWindowRequest, Box<dyn std::error::Error>> {
    if let Some(path) = &args.request {
        return Ok(FocusWindowRequest::from_json(&read_source(path)?)?);
    }
    if let Some(path) = &args.events {
        let events: Value = serde_json::from_str(&read_source(path)?)
            .map_err(|e| format!("{} is not valid JSON: {e}", path.display()))?;
        return Ok(FocusWindowRequest::new(events, Value::Null));
    }
    Ok(FocusWindowRequest::default())
}

fn read_source(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()).into())
}

/// Command-line flags win over preferences carried in the request.
fn apply_overrides(preferences: Value, args: &FindArgs) -> Value {
    let mut obj = match preferences {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Some(preferred) = &args.preferred {
        obj.insert("preferredTime".into(), Value::String(preferred.clone()));
    }
    if let Some(minimum) = args.minimum_duration {
        obj.insert("minimumDuration".into(), minimum.into());
    }
    if let Some(buffer) = args.buffer {
        obj.insert("bufferTime".into(), buffer.into());
    }
    Value::Object(obj)
}
