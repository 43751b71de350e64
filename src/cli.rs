//! Command-line interface parsing for weatherhub
//!
//! Every option has a default or an environment variable fallback so the
//! services can be started with no arguments once the API key is exported.

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::data::http::DEFAULT_TIMEOUT_SECS;
use crate::services::ServiceKind;

/// Default port of the first service; the others follow consecutively
pub const DEFAULT_BASE_PORT: u16 = 5001;

/// weatherhub - caching proxy services for geocoding, weather and forecasts
#[derive(Parser, Debug)]
#[command(name = "weatherhub")]
#[command(about = "Caching proxy services for geocoding, weather and forecasts")]
#[command(version)]
pub struct Cli {
    /// Service to start; repeat to start several (default: all)
    ///
    /// Examples:
    ///   weatherhub                                  # start every service
    ///   weatherhub --service forecast --service coordinates
    #[arg(long = "service", value_enum, value_name = "SERVICE")]
    pub services: Vec<ServiceKind>,

    /// Address every service listens on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port of the conditions service; the others use the following ports
    #[arg(long, default_value_t = DEFAULT_BASE_PORT)]
    pub base_port: u16,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub openweather_key: Option<String>,

    /// Google Maps API key served to map clients and used for geocoding
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    pub google_maps_key: Option<String>,

    /// Directory holding recent searches and settings
    #[arg(long, env = "WEATHERHUB_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Full URL of the coordinates endpoint used by the forecast service
    #[arg(long, env = "WEATHERHUB_COORDINATES_URL", value_name = "URL")]
    pub coordinates_url: Option<String>,

    /// Timeout for outbound requests, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["weatherhub"]);
        assert!(cli.services.is_empty());
        assert_eq!(cli.base_port, DEFAULT_BASE_PORT);
        assert_eq!(cli.host.to_string(), "127.0.0.1");
        assert_eq!(cli.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_cli_parse_repeated_services() {
        let cli = Cli::parse_from([
            "weatherhub",
            "--service",
            "forecast",
            "--service",
            "city-name",
        ]);
        assert_eq!(
            cli.services,
            vec![ServiceKind::Forecast, ServiceKind::CityName]
        );
    }

    #[test]
    fn test_cli_parse_invalid_service() {
        let result = Cli::try_parse_from(["weatherhub", "--service", "tides"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_keys_and_paths() {
        let cli = Cli::parse_from([
            "weatherhub",
            "--openweather-key",
            "ow-key",
            "--google-maps-key",
            "gm-key",
            "--data-dir",
            "/tmp/weatherhub",
            "--coordinates-url",
            "http://10.0.0.2:5004/coordinates",
        ]);
        assert_eq!(cli.openweather_key.as_deref(), Some("ow-key"));
        assert_eq!(cli.google_maps_key.as_deref(), Some("gm-key"));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/weatherhub")));
        assert_eq!(
            cli.coordinates_url.as_deref(),
            Some("http://10.0.0.2:5004/coordinates")
        );
    }

    #[test]
    fn test_cli_parse_host_and_port() {
        let cli = Cli::parse_from(["weatherhub", "--host", "0.0.0.0", "--base-port", "6000"]);
        assert_eq!(cli.host.to_string(), "0.0.0.0");
        assert_eq!(cli.base_port, 6000);
    }
}
