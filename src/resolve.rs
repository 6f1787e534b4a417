//! # Multi-Source Metric Resolution
//!
//! Stormglass reports each metric either as a bare number or as a mapping of
//! numerical-model identifier to value. This module picks a single number out
//! of such a reading with a deterministic priority order:
//!
//! 1. Sources the caller asked for, in the order given
//! 2. The system default order, minus anything the caller already named
//! 3. Last resort: the first usable value in the mapping's own insertion
//!    order, so a data point is never dropped just because its source was
//!    not on anyone's list
//!
//! Resolution never fails; unresolvable input yields `None` ("unknown").

use serde_json::Value;

/// Default model priority when the caller expresses no preference, or as
/// the tail of the effective order when they do. Fixed configuration, not
/// tunable at runtime.
pub const DEFAULT_SOURCE_ORDER: [&str; 6] = ["sg", "icon", "gfs", "ecmwf", "dwd", "noaa"];

/// Coerce a JSON value to `f64` the way the upstream payloads warrant:
/// numbers directly, numeric strings parsed. Everything else (booleans,
/// arrays, objects, null) is not a reading.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Effective lookup order: the preferred sources first, then every default
/// source not already named, keeping the defaults' fixed relative order.
fn effective_order<'a>(preferred: &'a [String]) -> Vec<&'a str> {
    let mut order: Vec<&str> = preferred.iter().map(String::as_str).collect();
    for source in DEFAULT_SOURCE_ORDER {
        if !order.contains(&source) {
            order.push(source);
        }
    }
    order
}

/// Select one number from a raw metric reading.
///
/// - absent or null input resolves to `None`
/// - a bare number is returned unchanged
/// - a source mapping is scanned in the effective order; null entries and
///   non-numeric entries are skipped, not fatal
/// - if no ordered key matched, the first usable value in insertion order
///   wins
pub fn resolve(raw: Option<&Value>, preferred: &[String]) -> Option<f64> {
    let raw = raw?;
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => {
            for key in effective_order(preferred) {
                if let Some(value) = map.get(key) {
                    if value.is_null() {
                        continue;
                    }
                    if let Some(number) = numeric(value) {
                        return Some(number);
                    }
                }
            }
            map.values()
                .filter(|value| !value.is_null())
                .find_map(numeric)
        }
        _ => None,
    }
}
