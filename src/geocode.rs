//! # Location Resolution
//!
//! Resolves a free-text spot name ("Highcliffe Beach") to coordinates.
//! Google Geocoding is used when its API key is configured; otherwise the
//! OpenStreetMap Nominatim service serves as a keyless fallback and a
//! warning is recorded so downstream consumers know which resolver ran.
//! Coordinate mode bypasses this module entirely.

use crate::{LocationInfo, SurfError};
use serde::Deserialize;
use tracing::debug;

/// Google Geocoding API endpoint.
pub const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// OpenStreetMap Nominatim search endpoint.
pub const OSM_GEOCODE_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

// Nominatim usage policy requires an identifying User-Agent.
const OSM_USER_AGENT: &str = "surf-report/0.1 (cron)";

#[derive(Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GoogleResult>,
}

#[derive(Deserialize)]
struct GoogleResult {
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    geometry: Option<GoogleGeometry>,
    #[serde(default)]
    place_id: Option<String>,
}

#[derive(Deserialize)]
struct GoogleGeometry {
    #[serde(default)]
    location: Option<GooglePoint>,
}

#[derive(Deserialize)]
struct GooglePoint {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct OsmResult {
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    lon: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

/// Resolve a location query, dispatching on key availability.
///
/// Returns the resolved location plus any warnings to surface in the
/// report meta (fallback resolver used, multiple matches).
pub async fn resolve_location(
    client: &reqwest::Client,
    query: &str,
    google_key: Option<&str>,
) -> Result<(LocationInfo, Vec<String>), SurfError> {
    match google_key {
        Some(key) => google(client, query, key).await,
        None => nominatim(client, query).await,
    }
}

/// Resolve via Google Geocoding. The top result wins; additional results
/// only add a warning.
pub async fn google(
    client: &reqwest::Client,
    address: &str,
    api_key: &str,
) -> Result<(LocationInfo, Vec<String>), SurfError> {
    let response = client
        .get(GEOCODE_ENDPOINT)
        .query(&[("address", address), ("key", api_key)])
        .send()
        .await?;
    let payload: GoogleResponse = response
        .json()
        .await
        .map_err(|error| SurfError::Api(format!("invalid geocoding response: {error}")))?;

    if payload.status != "OK" {
        let detail = payload.error_message.unwrap_or(payload.status);
        return Err(SurfError::Api(format!("geocoding failed: {detail}")));
    }
    let result_count = payload.results.len();
    let top = payload
        .results
        .into_iter()
        .next()
        .ok_or_else(|| SurfError::Api("geocoding returned no results".to_string()))?;
    let point = top
        .geometry
        .and_then(|g| g.location)
        .ok_or_else(|| SurfError::Api("geocoding response missing coordinates".to_string()))?;

    let mut warnings = Vec::new();
    if result_count > 1 {
        warnings.push("Location query returned multiple matches; top result used.".to_string());
    }
    debug!(lat = point.lat, lon = point.lng, "geocoded via Google");

    let location = LocationInfo {
        query: Some(address.to_string()),
        resolved_name: top.formatted_address.unwrap_or_else(|| address.to_string()),
        lat: point.lat,
        lon: point.lng,
        google_place_id: top.place_id,
    };
    Ok((location, warnings))
}

/// Resolve via OSM Nominatim. Always records the fallback warning so the
/// report shows Google was not consulted.
pub async fn nominatim(
    client: &reqwest::Client,
    address: &str,
) -> Result<(LocationInfo, Vec<String>), SurfError> {
    let response = client
        .get(OSM_GEOCODE_ENDPOINT)
        .header("User-Agent", OSM_USER_AGENT)
        .query(&[
            ("q", address),
            ("format", "jsonv2"),
            ("limit", "5"),
            ("addressdetails", "0"),
        ])
        .send()
        .await?;
    let results: Vec<OsmResult> = response
        .json()
        .await
        .map_err(|error| SurfError::Api(format!("invalid OSM geocoding response: {error}")))?;

    let result_count = results.len();
    let Some(top) = results.into_iter().next() else {
        return Err(SurfError::Api("OSM geocoding returned no results".to_string()));
    };
    let (lat, lon) = match (
        top.lat.as_deref().and_then(|v| v.parse::<f64>().ok()),
        top.lon.as_deref().and_then(|v| v.parse::<f64>().ok()),
    ) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(SurfError::Api(
                "OSM geocoding response missing valid coordinates".to_string(),
            ))
        }
    };

    let mut warnings = vec![
        "GOOGLE_GEOCODING_API_KEY not set; used OpenStreetMap Nominatim fallback geocoding."
            .to_string(),
    ];
    if result_count > 1 {
        warnings.push("Location query returned multiple matches; top result used.".to_string());
    }
    debug!(lat, lon, "geocoded via Nominatim");

    let location = LocationInfo {
        query: Some(address.to_string()),
        resolved_name: top.display_name.unwrap_or_else(|| address.to_string()),
        lat,
        lon,
        google_place_id: None,
    };
    Ok((location, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_response_tolerates_sparse_results() {
        let payload: GoogleResponse = serde_json::from_str(
            r#"{"status": "OK", "results": [{"formatted_address": "Highcliffe, UK"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.status, "OK");
        assert!(payload.results[0].geometry.is_none());
        assert!(payload.results[0].place_id.is_none());
    }

    #[test]
    fn osm_results_carry_stringly_typed_coordinates() {
        let results: Vec<OsmResult> = serde_json::from_str(
            r#"[{"lat": "50.735", "lon": "-1.705", "display_name": "Highcliffe Beach"}]"#,
        )
        .unwrap();
        assert_eq!(results[0].lat.as_deref().unwrap().parse::<f64>().unwrap(), 50.735);
        assert_eq!(results[0].display_name.as_deref(), Some("Highcliffe Beach"));
    }
}
