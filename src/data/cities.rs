//! Built-in list of well-known cities
//!
//! Served as the initial suggestions for short queries and as the fallback
//! when the geocoding provider is unavailable.

/// Maximum number of suggestions returned for any query
pub const MAX_SUGGESTIONS: usize = 10;

/// Cities offered when no provider results are available
pub static COMMON_CITIES: [&str; 22] = [
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
    "London",
    "Tokyo",
    "Paris",
    "Berlin",
    "Sydney",
    "Beijing",
    "Moscow",
    "Cairo",
    "Rome",
    "Toronto",
    "Madrid",
    "Mumbai",
];

/// The first [`MAX_SUGGESTIONS`] built-in cities
pub fn default_suggestions() -> Vec<String> {
    COMMON_CITIES
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|c| c.to_string())
        .collect()
}

/// Built-in cities containing `query`, ignoring case, capped at [`MAX_SUGGESTIONS`]
pub fn filter_common_cities(query: &str) -> Vec<String> {
    let needle = query.to_lowercase();
    COMMON_CITIES
        .iter()
        .filter(|city| city.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .map(|c| c.to_string())
        .collect()
}
