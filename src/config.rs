//! # Configuration Management
//!
//! Two configuration surfaces, split by sensitivity:
//!
//! - **Credentials** come from the environment only (`STORMGLASS_API_KEY`,
//!   `GOOGLE_GEOCODING_API_KEY`) so keys never land in files that get
//!   committed or copied between hosts.
//! - **Tunables** (HTTP timeout, default source preference) load from an
//!   optional `surf-config.toml`, falling back to defaults when the file
//!   is missing or invalid. CLI flags override both.

use crate::SurfError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Default config file location, resolved relative to the working directory.
pub const CONFIG_PATH: &str = "surf-config.toml";

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Tunable settings loaded from `surf-config.toml`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// HTTP client settings applied to every outbound request.
    pub http: HttpConfig,
    /// Forecast defaults applied when the CLI does not override them.
    pub forecast: ForecastConfig,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Default Stormglass source preference when `--source` is absent.
    pub sources: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// if the file doesn't exist or is invalid.
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_PATH)
    }

    /// Load configuration from the given path with the same fallback
    /// semantics as [`Config::load`].
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    debug!(path = %path.as_ref().display(), "loaded configuration file");
                    config
                }
                Err(error) => {
                    warn!(%error, "invalid config file format; using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("no config file found; using defaults");
                Self::default()
            }
        }
    }
}

/// The Stormglass API key, required for every live run. An unset or empty
/// variable is a configuration error surfaced before any network call.
pub fn stormglass_api_key() -> Result<String, SurfError> {
    env::var("STORMGLASS_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            SurfError::Config("Missing STORMGLASS_API_KEY environment variable.".to_string())
        })
}

/// The Google Geocoding key, optional: absence selects the OSM fallback
/// geocoder instead of failing.
pub fn google_geocoding_api_key() -> Option<String> {
    env::var("GOOGLE_GEOCODING_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
}
