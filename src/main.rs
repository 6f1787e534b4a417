//! # Surf Report CLI Entry Point
//!
//! Thin wrapper over the core library: argument parsing and validation,
//! configuration, network fetch (or mock generation), and output rendering.
//! Stdout carries only the report (JSON by default) so the binary can sit
//! in a cron/agent pipeline; diagnostics go to stderr via `tracing`.
//!
//! Exit codes:
//! - `0` success
//! - `2` invalid CLI usage
//! - `3` missing configuration/API keys
//! - `4` external API failure
//! - `5` parsing/normalization failure

// Test modules
#[cfg(test)]
mod tests;

use chrono::Duration;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use std::process::ExitCode;
use surf_report_lib::config::{self, Config};
use surf_report_lib::report::{assemble, ReportContext};
use surf_report_lib::stormglass::StormglassClient;
use surf_report_lib::{
    fallback, geocode, now_utc, renderer, Horizon, InputMode, LocationInfo, Report, SurfError,
};
use tracing_subscriber::EnvFilter;

// Mock-mode default coordinates (Highcliffe Beach, UK) used when neither
// --lat nor --lon is supplied.
const MOCK_LAT: f64 = 50.735;
const MOCK_LON: f64 = -1.705;

/// Fetch surf-relevant Stormglass data by location or coordinates.
#[derive(Parser, Debug)]
#[command(name = "surf-report", version)]
pub struct Cli {
    /// Surf spot/place name for geocoding lookup.
    #[arg(long)]
    location: Option<String>,

    /// Latitude for direct coordinate mode.
    #[arg(long)]
    lat: Option<f64>,

    /// Longitude for direct coordinate mode.
    #[arg(long)]
    lon: Option<f64>,

    /// Forecast horizon: now, 24h, 48h or 72h.
    #[arg(long, default_value = "72h", value_parser = parse_horizon)]
    horizon: Horizon,

    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    output: Output,

    /// Optional comma-separated Stormglass source preference.
    #[arg(long)]
    source: Option<String>,

    /// HTTP timeout in seconds (overrides surf-config.toml).
    #[arg(long)]
    timeout: Option<u64>,

    /// Use deterministic offline mock data (no credentials required).
    #[arg(long)]
    mock: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    Json,
    Pretty,
}

fn parse_horizon(value: &str) -> Result<Horizon, String> {
    value.parse()
}

/// Split a comma-separated source list, dropping empty segments.
fn parse_sources(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validated fetch target: a place name to geocode, or raw coordinates.
enum Target {
    Location(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Target {
    fn mode(&self) -> InputMode {
        match self {
            Target::Location(_) => InputMode::Location,
            Target::Coordinates { .. } => InputMode::Coordinates,
        }
    }
}

/// Enforce the location-xor-coordinates contract; usage errors exit 2.
fn validate_mode(cli: &Cli) -> Target {
    let mut cmd = Cli::command();
    match (&cli.location, cli.lat, cli.lon) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => cmd
            .error(
                ErrorKind::ArgumentConflict,
                "use either --location or --lat/--lon, not both",
            )
            .exit(),
        (Some(query), None, None) => Target::Location(query.clone()),
        (None, Some(lat), Some(lon)) => Target::Coordinates { lat, lon },
        (None, None, None) => cmd
            .error(
                ErrorKind::MissingRequiredArgument,
                "provide --location or both --lat and --lon",
            )
            .exit(),
        (None, _, _) => cmd
            .error(
                ErrorKind::MissingRequiredArgument,
                "both --lat and --lon are required for coordinate mode",
            )
            .exit(),
    }
}

/// Map the error taxonomy onto the CLI exit-code contract.
fn exit_code(error: &SurfError) -> u8 {
    match error {
        SurfError::Config(_) => 3,
        SurfError::Api(_) | SurfError::Http(_) => 4,
        SurfError::DataGap(_) | SurfError::Json(_) | SurfError::Io(_) => 5,
    }
}

fn main() -> ExitCode {
    // Diagnostics to stderr only; stdout is the report pipe.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let target = validate_mode(&cli);

    match run(&cli, &target) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("ERROR: {error}");
            ExitCode::from(exit_code(&error))
        }
    }
}

fn run(cli: &Cli, target: &Target) -> Result<String, SurfError> {
    let config = Config::load();
    let timeout = cli.timeout.unwrap_or(config.http.timeout_secs);
    let sources = cli
        .source
        .as_deref()
        .map(parse_sources)
        .unwrap_or(config.forecast.sources);
    let anchor = now_utc();

    let report = if cli.mock {
        let (lat, lon, query) = match target {
            Target::Location(query) => (MOCK_LAT, MOCK_LON, Some(query.clone())),
            Target::Coordinates { lat, lon } => (*lat, *lon, None),
        };
        fallback::mock_report(anchor, cli.horizon, target.mode(), lat, lon, query)?
    } else {
        // Credentials are checked before any network call.
        let api_key = config::stormglass_api_key()?;
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(fetch_live(cli, target, anchor, api_key, timeout, &sources))?
    };

    match cli.output {
        Output::Json => Ok(serde_json::to_string(&report)?),
        Output::Pretty => Ok(renderer::render_pretty(&report)),
    }
}

/// Live path: resolve coordinates, fetch weather and tides, assemble.
async fn fetch_live(
    cli: &Cli,
    target: &Target,
    anchor: chrono::DateTime<chrono::Utc>,
    api_key: String,
    timeout: u64,
    sources: &[String],
) -> Result<Report, SurfError> {
    let mut warnings = Vec::new();
    let location = match target {
        Target::Location(query) => {
            let client = reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(timeout))
                .build()?;
            let google_key = config::google_geocoding_api_key();
            let (location, geo_warnings) =
                geocode::resolve_location(&client, query, google_key.as_deref()).await?;
            warnings.extend(geo_warnings);
            location
        }
        Target::Coordinates { lat, lon } => LocationInfo {
            query: None,
            resolved_name: format!("{lat},{lon}"),
            lat: *lat,
            lon: *lon,
            google_place_id: None,
        },
    };

    let stormglass = StormglassClient::new(api_key, timeout)?;
    let end = anchor + Duration::hours(cli.horizon.hours());
    let hours = stormglass
        .fetch_weather_hours(location.lat, location.lon, anchor, end, sources)
        .await?;
    // Tides extend one day past the weather window so day grouping covers
    // the full final forecast day.
    let tides = stormglass
        .fetch_tide_extremes(location.lat, location.lon, anchor, end + Duration::days(1))
        .await?;

    assemble(
        &hours,
        &tides,
        anchor,
        cli.horizon,
        ReportContext {
            input_mode: target.mode(),
            sources: sources.to_vec(),
            warnings,
            location,
        },
    )
}
