//! # Tide Extremum Analysis
//!
//! Turns the raw tide-extremes payload into three derived signals:
//!
//! - a clean, time-sorted list of [`TideExtreme`] values
//! - the tide trend at the anchor instant (rising, falling, unknown),
//!   inferred from the nearest preceding and following extremes
//! - per-UTC-day groupings split into high and low lists
//!
//! Malformed individual events (no time, unparseable time) are dropped
//! locally; they never abort the computation.

use crate::resolve::numeric;
use crate::{parse_time, DayTides, RawTideEvent, TideExtreme, TidePoint, TideTrend};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// Normalize raw tide events: drop events lacking a time, coerce height to
/// a number where possible, pass `type` through unchanged. The result is
/// sorted ascending by the raw time string.
pub fn normalize_extremes(raw: &[RawTideEvent]) -> Vec<TideExtreme> {
    let mut out: Vec<TideExtreme> = raw
        .iter()
        .filter_map(|event| {
            let time = match event.get("time").and_then(Value::as_str) {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => return None,
            };
            Some(TideExtreme {
                time,
                kind: event
                    .get("type")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                height_m: event.get("height").and_then(numeric),
            })
        })
        .collect();
    out.sort_by(|a, b| a.time.cmp(&b.time));
    out
}

/// Infer the tide trend at the anchor instant.
///
/// Events are parsed (unparseable times skipped silently), sorted by time,
/// and scanned once: `prev` is the latest event at or before the anchor,
/// `next` the earliest strictly after it. An event exactly at the anchor
/// counts as `prev`. Low-then-high is rising, high-then-low is falling;
/// every other combination, including a missing neighbor or a same-type
/// pair, is unknown.
pub fn trend_at(extremes: &[TideExtreme], anchor: DateTime<Utc>) -> TideTrend {
    let mut parsed: Vec<(DateTime<Utc>, String)> = extremes
        .iter()
        .filter_map(|e| {
            let t = parse_time(&e.time)?;
            let kind = e.kind.as_deref().unwrap_or_default().to_lowercase();
            Some((t, kind))
        })
        .collect();
    parsed.sort_by_key(|(t, _)| *t);

    let mut prev: Option<&str> = None;
    let mut next: Option<&str> = None;
    for (t, kind) in &parsed {
        if *t <= anchor {
            prev = Some(kind.as_str());
        } else if next.is_none() {
            next = Some(kind.as_str());
        }
    }
    match (prev, next) {
        (Some("low"), Some("high")) => TideTrend::Rising,
        (Some("high"), Some("low")) => TideTrend::Falling,
        _ => TideTrend::Unknown,
    }
}

/// Group extremes by UTC calendar day.
///
/// A bucket is created for every extreme with a parseable time, but only
/// events typed `high` or `low` (case-insensitive) are appended to the
/// lists, in first-seen order. Unrecognized types therefore still appear
/// in the flat extremes list while staying out of the day grouping.
pub fn group_by_day(extremes: &[TideExtreme]) -> BTreeMap<String, DayTides> {
    let mut out: BTreeMap<String, DayTides> = BTreeMap::new();
    for extreme in extremes {
        let Some(t) = parse_time(&extreme.time) else {
            continue;
        };
        let day = t.format("%Y-%m-%d").to_string();
        let bucket = out.entry(day).or_default();
        let kind = extreme
            .kind
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        let point = TidePoint {
            time: extreme.time.clone(),
            height_m: extreme.height_m,
        };
        match kind.as_str() {
            "high" => bucket.high.push(point),
            "low" => bucket.low.push(point),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn raw_events(value: serde_json::Value) -> Vec<RawTideEvent> {
        value
            .as_array()
            .expect("test events are an array")
            .iter()
            .map(|v| v.as_object().expect("event is an object").clone())
            .collect()
    }

    fn extreme(time: &str, kind: &str, height: Option<f64>) -> TideExtreme {
        TideExtreme {
            time: time.to_string(),
            kind: Some(kind.to_string()),
            height_m: height,
        }
    }

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 23, 6, 0, 0).unwrap()
    }

    #[test]
    fn normalization_drops_timeless_events_and_sorts() {
        let raw = raw_events(json!([
            {"time": "2026-08-23T12:10:00Z", "type": "low", "height": -0.2},
            {"type": "high", "height": 1.9},
            {"time": "2026-08-23T06:05:00Z", "type": "high", "height": "1.8"},
            {"time": "2026-08-23T18:20:00Z", "type": "high", "height": "n/a"}
        ]));
        let extremes = normalize_extremes(&raw);
        assert_eq!(extremes.len(), 3);
        assert_eq!(extremes[0].time, "2026-08-23T06:05:00Z");
        assert_eq!(extremes[0].height_m, Some(1.8), "numeric string coerced");
        assert_eq!(extremes[1].height_m, Some(-0.2));
        assert_eq!(extremes[2].height_m, None, "unparseable height is unknown");
    }

    #[test]
    fn type_passes_through_without_case_normalization() {
        let raw = raw_events(json!([
            {"time": "2026-08-23T06:00:00Z", "type": "High"}
        ]));
        let extremes = normalize_extremes(&raw);
        assert_eq!(extremes[0].kind.as_deref(), Some("High"));
    }

    #[test]
    fn trend_rises_between_low_and_high() {
        let extremes = vec![
            extreme("2026-08-23T03:00:00Z", "low", Some(-0.1)),
            extreme("2026-08-23T09:00:00Z", "high", Some(1.8)),
        ];
        assert_eq!(trend_at(&extremes, anchor()), TideTrend::Rising);
    }

    #[test]
    fn trend_falls_between_high_and_low() {
        let extremes = vec![
            extreme("2026-08-23T03:00:00Z", "HIGH", Some(1.8)),
            extreme("2026-08-23T09:00:00Z", "Low", Some(-0.1)),
        ];
        assert_eq!(trend_at(&extremes, anchor()), TideTrend::Falling);
    }

    #[test]
    fn anchor_exactly_on_an_extreme_counts_as_prev() {
        let extremes = vec![
            extreme("2026-08-23T06:00:00Z", "low", None),
            extreme("2026-08-23T12:00:00Z", "high", None),
        ];
        assert_eq!(trend_at(&extremes, anchor()), TideTrend::Rising);
    }

    #[test]
    fn trend_is_unknown_without_both_neighbors() {
        let only_past = vec![extreme("2026-08-23T03:00:00Z", "low", None)];
        let only_future = vec![extreme("2026-08-23T09:00:00Z", "high", None)];
        assert_eq!(trend_at(&only_past, anchor()), TideTrend::Unknown);
        assert_eq!(trend_at(&only_future, anchor()), TideTrend::Unknown);
        assert_eq!(trend_at(&[], anchor()), TideTrend::Unknown);
    }

    #[test]
    fn same_type_neighbors_are_unknown() {
        let extremes = vec![
            extreme("2026-08-23T03:00:00Z", "high", None),
            extreme("2026-08-23T09:00:00Z", "high", None),
        ];
        assert_eq!(trend_at(&extremes, anchor()), TideTrend::Unknown);
    }

    #[test]
    fn trend_scanning_skips_malformed_times() {
        let extremes = vec![
            extreme("garbled", "high", None),
            extreme("2026-08-23T03:00:00Z", "low", None),
            extreme("2026-08-23T09:00:00Z", "high", None),
        ];
        assert_eq!(trend_at(&extremes, anchor()), TideTrend::Rising);
    }

    #[test]
    fn trend_is_well_defined_for_unsorted_input() {
        let extremes = vec![
            extreme("2026-08-23T09:00:00Z", "high", None),
            extreme("2026-08-23T03:00:00Z", "low", None),
        ];
        assert_eq!(trend_at(&extremes, anchor()), TideTrend::Rising);
    }

    #[test]
    fn day_grouping_splits_high_and_low_per_utc_day() {
        let extremes = vec![
            extreme("2026-08-23T06:00:00Z", "high", Some(1.8)),
            extreme("2026-08-23T12:00:00Z", "low", Some(-0.2)),
            extreme("2026-08-24T00:30:00Z", "High", Some(1.9)),
        ];
        let by_day = group_by_day(&extremes);
        assert_eq!(by_day.len(), 2);
        assert_eq!(by_day["2026-08-23"].high.len(), 1);
        assert_eq!(by_day["2026-08-23"].low.len(), 1);
        assert_eq!(by_day["2026-08-24"].high.len(), 1);
        assert!(by_day["2026-08-24"].low.is_empty());
        assert_eq!(by_day["2026-08-23"].high[0].height_m, Some(1.8));
    }

    #[test]
    fn unrecognized_types_get_a_bucket_but_no_entry() {
        let extremes = vec![extreme("2026-08-23T06:00:00Z", "slack", None)];
        let by_day = group_by_day(&extremes);
        let day = &by_day["2026-08-23"];
        assert!(day.high.is_empty() && day.low.is_empty());
    }

    #[test]
    fn day_grouping_skips_unparseable_times() {
        let extremes = vec![extreme("garbled", "high", None)];
        assert!(group_by_day(&extremes).is_empty());
    }
}
