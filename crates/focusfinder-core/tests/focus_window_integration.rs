//! Integration tests for the focus-window pipeline.

use chrono::{NaiveDate, Timelike};
use focusfinder_core::{
    respond, Config, EngineConfig, FocusWindowFinder, FocusWindowRequest, PreferredTime, TimeInterval,
};
use serde_json::{json, Value};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 3).unwrap()
}

fn event(start: &str, end: &str) -> Value {
    json!({
        "startTime": format!("2025-10-03T{start}:00Z"),
        "endTime": format!("2025-10-03T{end}:00Z"),
        "title": "Meeting",
    })
}

fn hm(t: &chrono::DateTime<chrono::FixedOffset>) -> (u32, u32) {
    (t.hour(), t.minute())
}

#[test]
fn test_empty_calendar_lands_in_default_window() {
    let result = FocusWindowFinder::new().find(&json!([]), &json!({}), today()).unwrap();
    assert!(result.start_time.hour() >= 8);
    assert_eq!(result.end_time.date_naive(), today());
    assert!(hm(&result.end_time) <= (21, 0));
    assert!(result.duration_minutes >= 75);
}

#[test]
fn test_fully_booked_day_has_no_window() {
    let events = json!([event("08:00", "21:00")]);
    assert!(FocusWindowFinder::new().find(&events, &json!({}), today()).is_none());

    // Split across touching meetings, same outcome
    let events = json!([event("08:00", "12:00"), event("12:00", "16:30"), event("16:30", "21:00")]);
    assert!(FocusWindowFinder::new().find(&events, &json!({}), today()).is_none());
}

#[test]
fn test_long_day_of_meetings_leaves_nothing() {
    // Only 20:00-21:00 remains: too short once the minimum applies.
    let events = json!([event("08:00", "20:00")]);
    assert!(FocusWindowFinder::new().find(&events, &json!({}), today()).is_none());
}

#[test]
fn test_two_meetings_afternoon_preference() {
    let events = json!([event("09:00", "10:00"), event("14:00", "15:00")]);
    let prefs = json!({"preferredTime": "afternoon", "minimumDuration": 75, "bufferTime": 15});
    let finder = FocusWindowFinder::new();

    let ranked = finder.rank(&events, &prefs, today());
    let windows: Vec<_> = ranked.iter().map(|c| (hm(&c.interval.start), hm(&c.interval.end))).collect();
    assert!(windows.contains(&((10, 15), (13, 45))));
    assert!(windows.contains(&((15, 15), (20, 45))));

    let result = finder.find(&events, &prefs, today()).unwrap();
    assert!(result.duration_minutes >= 75);
    // Buffers keep the window 15 minutes clear of both meetings.
    let busy = finder.busy_blocks(&finder.normalize(&events, &prefs));
    assert_eq!(busy.len(), 2);
    let chosen = TimeInterval::new(result.start_time, result.end_time).unwrap();
    assert!(busy.iter().all(|b| !b.expand(15).overlaps(&chosen)));
}

#[test]
fn test_all_day_event_blocks_working_hours() {
    let events = json!([{"startTime": "2025-10-03", "endTime": "2025-10-04", "title": "Offsite"}]);
    let result = FocusWindowFinder::new().find(&events, &json!({}), today()).unwrap();
    let hour = result.start_time.hour();
    assert!(hour < 9 || hour >= 17, "window starts at {hour}");
    assert_eq!(hm(&result.start_time), (17, 15));
    assert_eq!(result.score, 54);
}

#[test]
fn test_overlapping_events_merge_into_union() {
    let events = json!([event("09:00", "12:00"), event("11:00", "14:00")]);
    let finder = FocusWindowFinder::new();
    let input = finder.normalize(&events, &json!({}));
    let busy = finder.busy_blocks(&input);
    assert_eq!(busy.len(), 1);
    assert_eq!((hm(&busy[0].start), hm(&busy[0].end)), ((9, 0), (14, 0)));

    // Nothing inside the union is ever proposed.
    let ranked = finder.rank(&events, &json!({"minimumDuration": 15, "bufferTime": 0}), today());
    assert!(ranked.iter().all(|c| !c.interval.overlaps(&busy[0])));
}

#[test]
fn test_malformed_events_are_ignored() {
    let events = json!([
        event("09:00", "10:00"),
        {"startTime": "tomorrow-ish", "endTime": "2025-10-03T12:00:00Z"},
        {"startTime": "2025-10-03T13:00:00Z"},
        {"startTime": "2025-10-03T16:00:00Z", "endTime": "2025-10-03T15:00:00Z"},
        "meeting",
    ]);
    let clean = json!([event("09:00", "10:00")]);
    let finder = FocusWindowFinder::new();
    assert_eq!(
        finder.find(&events, &json!({}), today()),
        finder.find(&clean, &json!({}), today())
    );
}

#[test]
fn test_preference_changes_choice() {
    let finder = FocusWindowFinder::new();
    for (pref, hour) in [("morning", 10), ("afternoon", 14), ("evening", 18)] {
        let result = finder
            .find(&json!([]), &json!({"preferredTime": pref}), today())
            .unwrap();
        assert_eq!(result.start_time.hour(), hour, "preference {pref}");
        assert!(result.reasoning.contains(&format!("{pref} preference")));
    }
}

#[test]
fn test_identical_input_gives_identical_output() {
    let events = json!([event("09:30", "10:15"), event("13:00", "13:30"), event("16:00", "17:45")]);
    let prefs = json!({"preferredTime": "evening", "bufferTime": 10});
    let finder = FocusWindowFinder::new();
    let first = finder.find(&events, &prefs, today());
    for _ in 0..5 {
        assert_eq!(finder.find(&events, &prefs, today()), first);
    }
}

#[test]
fn test_concurrent_calls_agree() {
    let finder = std::sync::Arc::new(FocusWindowFinder::new());
    let events = json!([event("09:00", "10:00"), event("14:00", "15:00")]);
    let expected = finder.find(&events, &json!({}), today());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let finder = finder.clone();
            let events = events.clone();
            std::thread::spawn(move || finder.find(&events, &json!({}), today()))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_config_drives_finder() {
    let mut config = Config::default();
    config.engine = EngineConfig {
        day_start_hour: 6,
        day_end_hour: 12,
        ..EngineConfig::default()
    };
    config.preferences.preferred_time = PreferredTime::Morning;

    let result = config.finder().find(&json!([event("06:00", "07:30")]), &json!({}), today()).unwrap();
    assert!(result.end_time.hour() <= 12);
    assert!(result.reasoning.contains("morning preference"));
}

#[test]
fn test_host_request_end_to_end() {
    let body = r#"{
        "events": [
            {"startTime": "2025-10-03T09:00:00Z", "endTime": "2025-10-03T10:00:00Z", "title": "Standup"},
            {"startTime": "2025-10-03T14:00:00Z", "endTime": "2025-10-03T15:00:00Z", "title": "Review"}
        ],
        "preferences": {"preferredTime": "afternoon", "minimumDuration": 75, "bufferTime": 15}
    }"#;
    let request = FocusWindowRequest::from_json(body).unwrap();
    let response = respond(&FocusWindowFinder::new(), &request, today()).unwrap();
    assert_eq!(response.start_time, "2025-10-03T15:15:00Z");
    assert_eq!(response.end_time, "2025-10-03T20:45:00Z");
    assert_eq!(response.duration, 330);
    assert_eq!(response.score, 58);

    assert!(FocusWindowRequest::from_json(r#"{"preferences": 12}"#).is_err());
}
