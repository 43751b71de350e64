//! In-memory response caches
//!
//! Two addressing modes share the same expiry rules: [`ExactCache`] looks entries
//! up by string identity (city names, search queries) with an optional
//! discriminator such as the unit system, and [`GeoCache`] looks entries up by
//! proximity to a previously requested coordinate pair.
//!
//! Caches live for the lifetime of the service that owns them. Expired entries
//! are removed lazily when a lookup touches them.

mod exact;
mod geo;

pub use exact::ExactCache;
pub use geo::{GeoCache, GEO_TOLERANCE_DEGREES};

use chrono::{DateTime, Duration, Utc};

/// Time-to-live in hours for geocoding-derived data (names, coordinates, suggestions)
pub const GEOCODE_TTL_HOURS: i64 = 24;

/// Time-to-live in minutes for live weather and forecast data
pub const LIVE_WEATHER_TTL_MINUTES: i64 = 30;

/// TTL used by caches holding geocoding-derived data
pub fn geocode_ttl() -> Duration {
    Duration::hours(GEOCODE_TTL_HOURS)
}

/// TTL used by caches holding current conditions and forecasts
pub fn live_weather_ttl() -> Duration {
    Duration::minutes(LIVE_WEATHER_TTL_MINUTES)
}

/// Returns true once more than `ttl` has elapsed since `cached_at`
fn is_expired(cached_at: DateTime<Utc>, ttl: Duration, now: DateTime<Utc>) -> bool {
    now - cached_at > ttl
}
