//! Runtime configuration derived from CLI arguments

use directories::ProjectDirs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::cli::Cli;
use crate::data::backend::COORDINATES_ENDPOINT;
use crate::data::google::GOOGLE_GEOCODE_URL;
use crate::data::openweather::OPENWEATHER_BASE_URL;
use crate::services::ServiceKind;
use crate::store::{RECENT_SEARCHES_FILE, SETTINGS_FILE};

/// Errors that prevent the services from starting
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A selected service needs the OpenWeatherMap key but none was given
    #[error("The {0} service requires an OpenWeatherMap API key (--openweather-key or OPENWEATHER_API_KEY)")]
    MissingOpenWeatherKey(&'static str),

    /// The base port leaves no room for every service
    #[error("Base port {0} is too high to fit all services")]
    PortOutOfRange(u16),
}

/// Everything the services need to start
#[derive(Debug, Clone)]
pub struct Config {
    /// Services to start, in port order
    pub services: Vec<ServiceKind>,
    pub host: IpAddr,
    pub base_port: u16,
    /// Empty when only services that don't need it are selected
    pub openweather_key: String,
    pub google_maps_key: Option<String>,
    pub openweather_base_url: String,
    pub google_geocode_url: String,
    /// Full URL of the sibling coordinates endpoint
    pub coordinates_url: String,
    pub data_dir: PathBuf,
    pub timeout: Duration,
}

impl Config {
    /// Builds and validates a configuration from parsed CLI arguments
    ///
    /// # Returns
    /// * `Ok(Config)` with defaults filled in
    /// * `Err(ConfigError)` if a selected service is missing its API key
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let services = if cli.services.is_empty() {
            ServiceKind::ALL.to_vec()
        } else {
            let mut selected = cli.services.clone();
            selected.sort_by_key(|s| s.port_offset());
            selected.dedup();
            selected
        };

        let last_offset = ServiceKind::ALL.len() as u16 - 1;
        if cli.base_port.checked_add(last_offset).is_none() {
            return Err(ConfigError::PortOutOfRange(cli.base_port));
        }

        let openweather_key = cli
            .openweather_key
            .clone()
            .filter(|k| !k.trim().is_empty());
        if openweather_key.is_none() {
            if let Some(service) = services.iter().find(|s| s.needs_openweather_key()) {
                return Err(ConfigError::MissingOpenWeatherKey(service.name()));
            }
        }

        let coordinates_url = cli.coordinates_url.clone().unwrap_or_else(|| {
            let port = cli.base_port + ServiceKind::Coordinates.port_offset();
            format!(
                "http://{}{}",
                SocketAddr::new(loopback_for(cli.host), port),
                COORDINATES_ENDPOINT
            )
        });

        Ok(Config {
            services,
            host: cli.host,
            base_port: cli.base_port,
            openweather_key: openweather_key.unwrap_or_default(),
            google_maps_key: cli
                .google_maps_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            openweather_base_url: OPENWEATHER_BASE_URL.to_string(),
            google_geocode_url: GOOGLE_GEOCODE_URL.to_string(),
            coordinates_url,
            data_dir: cli.data_dir.clone().unwrap_or_else(default_data_dir),
            timeout: Duration::from_secs(cli.timeout_secs),
        })
    }

    /// Address a given service listens on
    pub fn addr_for(&self, service: ServiceKind) -> SocketAddr {
        SocketAddr::new(self.host, self.base_port + service.port_offset())
    }

    pub fn recent_searches_path(&self) -> PathBuf {
        self.data_dir.join(RECENT_SEARCHES_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }
}

/// XDG data directory (`~/.local/share/weatherhub` on Linux), or the current
/// directory when no home directory can be determined
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "weatherhub")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| Path::new(".").to_path_buf())
}

/// Services bound to an unspecified address are still reached over loopback
fn loopback_for(host: IpAddr) -> IpAddr {
    match host {
        IpAddr::V4(v4) if v4.is_unspecified() => Ipv4Addr::LOCALHOST.into(),
        IpAddr::V6(v6) if v6.is_unspecified() => Ipv6Addr::LOCALHOST.into(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["weatherhub"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn test_all_services_by_default() {
        let config = Config::from_cli(&parse(&["--openweather-key", "k"])).unwrap();
        assert_eq!(config.services, ServiceKind::ALL.to_vec());
    }

    #[test]
    fn test_missing_key_rejected_for_weather_services() {
        let cli = Cli {
            openweather_key: None,
            ..parse(&["--service", "forecast"])
        };
        let err = Config::from_cli(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOpenWeatherKey("forecast")));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let cli = Cli {
            openweather_key: Some("  ".to_string()),
            ..parse(&["--service", "coordinates"])
        };
        assert!(Config::from_cli(&cli).is_err());
    }

    #[test]
    fn test_maps_service_runs_without_openweather_key() {
        let cli = Cli {
            openweather_key: None,
            ..parse(&["--service", "maps"])
        };
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.services, vec![ServiceKind::Maps]);
        assert!(config.openweather_key.is_empty());
    }

    #[test]
    fn test_ports_follow_base_port() {
        let config = Config::from_cli(&parse(&["--openweather-key", "k"])).unwrap();

        assert_eq!(config.addr_for(ServiceKind::Conditions).port(), 5001);
        assert_eq!(config.addr_for(ServiceKind::Forecast).port(), 5002);
        assert_eq!(config.addr_for(ServiceKind::CityName).port(), 5003);
        assert_eq!(config.addr_for(ServiceKind::Coordinates).port(), 5004);
        assert_eq!(config.addr_for(ServiceKind::Maps).port(), 5005);
        assert_eq!(config.addr_for(ServiceKind::Searches).port(), 5006);
    }

    #[test]
    fn test_port_overflow_rejected() {
        let cli = parse(&["--openweather-key", "k", "--base-port", "65534"]);
        assert!(matches!(
            Config::from_cli(&cli),
            Err(ConfigError::PortOutOfRange(65534))
        ));
    }

    #[test]
    fn test_default_coordinates_url_uses_loopback() {
        let cli = Cli {
            coordinates_url: None,
            ..parse(&["--openweather-key", "k", "--host", "0.0.0.0", "--base-port", "7000"])
        };
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.coordinates_url, "http://127.0.0.1:7003/coordinates");
    }

    #[test]
    fn test_services_are_sorted_and_deduplicated() {
        let config = Config::from_cli(&parse(&[
            "--openweather-key",
            "k",
            "--service",
            "searches",
            "--service",
            "conditions",
            "--service",
            "searches",
        ]))
        .unwrap();
        assert_eq!(
            config.services,
            vec![ServiceKind::Conditions, ServiceKind::Searches]
        );
    }

    #[test]
    fn test_data_files_live_in_data_dir() {
        let config =
            Config::from_cli(&parse(&["--openweather-key", "k", "--data-dir", "/srv/wh"])).unwrap();
        assert_eq!(
            config.recent_searches_path(),
            PathBuf::from("/srv/wh/recent_searches.json")
        );
        assert_eq!(
            config.settings_path(),
            PathBuf::from("/srv/wh/user_settings.json")
        );
    }
}
