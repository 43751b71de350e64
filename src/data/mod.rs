//! Provider clients and response schemas
//!
//! This module contains the outbound side of the services: the generic
//! [`UpstreamClient`], the OpenWeatherMap and Google geocoding clients, the
//! client for the sibling coordinates service, and the typed views of the
//! provider responses that the services reshape.

pub mod backend;
pub mod cities;
pub mod google;
pub mod http;
pub mod openweather;

pub use backend::CoordinateServiceClient;
pub use cities::{default_suggestions, filter_common_cities, COMMON_CITIES, MAX_SUGGESTIONS};
pub use google::GoogleGeocoder;
pub use http::{UpstreamClient, UpstreamError};
pub use openweather::OpenWeatherClient;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair as returned by the coordinates service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One row of an OpenWeatherMap direct geocoding response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeMatch {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

impl GeocodeMatch {
    /// Formats the match as "City, State, Country", or "City, Country" when
    /// the provider has no state for it
    pub fn label(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, state, self.country)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}

/// Current conditions as returned by the OpenWeatherMap weather endpoint
///
/// Every block defaults when absent: numbers to zero, text to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weather: Vec<ConditionSummary>,
    #[serde(default)]
    pub main: MainReadings,
    #[serde(default)]
    pub wind: WindReadings,
    #[serde(default)]
    pub sys: SunTimes,
    /// Offset from UTC in seconds for the reported location
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConditionSummary {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainReadings {
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub humidity: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindReadings {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
    #[serde(default)]
    pub gust: Option<f64>,
}

/// Sunrise and sunset as unix timestamps
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SunTimes {
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

impl CurrentConditions {
    /// Main condition of the first weather block, or "Unknown"
    pub fn condition(&self) -> &str {
        self.weather
            .first()
            .map(|w| w.main.as_str())
            .filter(|m| !m.is_empty())
            .unwrap_or("Unknown")
    }

    /// Sunset formatted as "hh:mm AM/PM" in the location's own UTC offset
    pub fn sunset_local(&self) -> Option<String> {
        let offset = FixedOffset::east_opt(self.timezone)?;
        let sunset = DateTime::from_timestamp(self.sys.sunset, 0)?;
        Some(sunset.with_timezone(&offset).format("%I:%M %p").to_string())
    }
}

/// One side of a two-city comparison, in imperial units
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityComparison {
    pub city: String,
    pub temp: String,
    pub feels_like: String,
    pub condition: String,
    pub wind_direction: String,
    pub wind_speed: String,
    pub sunset: String,
}

impl From<&CurrentConditions> for CityComparison {
    fn from(conditions: &CurrentConditions) -> Self {
        Self {
            city: conditions.name.clone(),
            temp: format!("{}°F", conditions.main.temp),
            feels_like: format!("{}°F", conditions.main.feels_like),
            condition: conditions.condition().to_string(),
            wind_direction: wind_direction(conditions.wind.deg).to_string(),
            wind_speed: format!("{} mph", conditions.wind.speed),
            sunset: conditions.sunset_local().unwrap_or_default(),
        }
    }
}

/// Maps a wind bearing in degrees to an 8-point compass direction
pub fn wind_direction(degrees: f64) -> &'static str {
    const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let index = (degrees / 45.0).round().rem_euclid(8.0) as usize;
    DIRECTIONS[index % 8]
}
