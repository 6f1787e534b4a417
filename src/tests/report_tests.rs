//! # End-to-End Report Shape Tests
//!
//! Cross-module assembly tests run against the mock data path, verifying
//! the serialized report honors the wire contract downstream consumers
//! rely on: fixed top-level keys, the eight always-present metric keys,
//! and the horizon/window relationship. Also covers the binary's own
//! helpers (source parsing, exit-code mapping).

use crate::{exit_code, parse_sources};
use chrono::{TimeZone, Utc};
use surf_report_lib::fallback::mock_report;
use surf_report_lib::{Horizon, InputMode, SurfError};

const NOW_KEYS: [&str; 8] = [
    "waveHeightM",
    "swellHeightM",
    "swellPeriodS",
    "swellDirectionDeg",
    "windSpeedMps",
    "windDirectionDeg",
    "windGustMps",
    "waterTemperatureC",
];

fn mock_json(horizon: Horizon) -> serde_json::Value {
    let anchor = Utc.with_ymd_and_hms(2026, 8, 23, 6, 0, 0).unwrap();
    let report = mock_report(
        anchor,
        horizon,
        InputMode::Coordinates,
        50.735,
        -1.705,
        None,
    )
    .expect("mock report assembles");
    serde_json::to_value(&report).expect("report serializes")
}

#[test]
fn report_has_stable_top_level_shape() {
    let json = mock_json(Horizon::H72);
    let object = json.as_object().unwrap();
    for key in ["meta", "location", "now", "forecast", "tides"] {
        assert!(object.contains_key(key), "missing top-level key {key}");
    }
}

#[test]
fn now_block_always_carries_all_eight_metric_keys() {
    let json = mock_json(Horizon::Now);
    let now = json["now"].as_object().unwrap();
    for key in NOW_KEYS {
        assert!(now.contains_key(key), "missing now.{key}");
    }
    assert!(now.contains_key("time"));
}

#[test]
fn meta_block_records_provenance() {
    let json = mock_json(Horizon::H24);
    assert_eq!(json["meta"]["generatedAt"], "2026-08-23T06:00:00Z");
    assert_eq!(json["meta"]["horizon"], "24h");
    assert_eq!(json["meta"]["inputMode"], "coordinates");
    assert_eq!(json["meta"]["sourcesRequested"], serde_json::json!([]));
    assert!(json["meta"]["warnings"][0]
        .as_str()
        .unwrap()
        .contains("Mock mode"));
}

#[test]
fn windows_mapping_matches_requested_horizon() {
    assert!(mock_json(Horizon::Now)["forecast"]["windows"]
        .as_object()
        .unwrap()
        .is_empty());

    let windows = mock_json(Horizon::H72)["forecast"]["windows"].clone();
    let keys: Vec<&str> = windows
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["24h", "48h", "72h"]);
    for (_, window) in windows.as_object().unwrap() {
        let best = window["bestHours"].as_array().unwrap();
        assert!(best.len() <= 3);
        for hour in best {
            assert!(hour["score"].as_f64().unwrap() >= 0.0);
            assert!(hour.as_object().unwrap().contains_key("waveHeightM"));
        }
    }
}

#[test]
fn tide_block_carries_trend_extremes_and_day_groups() {
    let json = mock_json(Horizon::H72);
    let tides = json["tides"].as_object().unwrap();
    assert!(["rising", "falling", "unknown"]
        .contains(&tides["trendNow"].as_str().unwrap()));
    assert!(!tides["extremes"].as_array().unwrap().is_empty());
    for (_, day) in tides["byDay"].as_object().unwrap() {
        let object = day.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("high") && object.contains_key("low"));
    }
}

#[test]
fn location_block_uses_coordinate_fallback_name() {
    let json = mock_json(Horizon::H24);
    assert_eq!(json["location"]["resolvedName"], "50.735,-1.705");
    assert!(json["location"]["query"].is_null());
    assert!(json["location"]["googlePlaceId"].is_null());
}

#[test]
fn source_list_parsing_trims_and_drops_empties() {
    assert_eq!(parse_sources("sg,icon"), vec!["sg", "icon"]);
    assert_eq!(parse_sources(" sg , ,icon,"), vec!["sg", "icon"]);
    assert!(parse_sources("").is_empty());
    assert!(parse_sources(" , ").is_empty());
}

#[test]
fn exit_codes_follow_the_cli_contract() {
    assert_eq!(exit_code(&SurfError::Config("key".into())), 3);
    assert_eq!(exit_code(&SurfError::Api("boom".into())), 4);
    assert_eq!(exit_code(&SurfError::DataGap("empty".into())), 5);
}
