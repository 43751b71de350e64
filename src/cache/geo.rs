//! Proximity-addressed cache for coordinate lookups
//!
//! Entries are scanned in insertion order and the first one whose latitude and
//! longitude are both within [`GEO_TOLERANCE_DEGREES`] of the request is a hit.
//! There is no ranking by distance, so a slightly farther entry inserted
//! earlier wins over a closer one inserted later. The scan is O(n) and is only
//! meant for caches that stay small.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use super::is_expired;

/// Maximum per-axis difference in degrees for a hit (roughly 10 miles)
pub const GEO_TOLERANCE_DEGREES: f64 = 0.15;

#[derive(Debug, Clone)]
struct GeoEntry<V> {
    lat: f64,
    lon: f64,
    value: V,
    cached_at: DateTime<Utc>,
}

impl<V> GeoEntry<V> {
    fn is_near(&self, lat: f64, lon: f64, tolerance: f64) -> bool {
        (self.lat - lat).abs() < tolerance && (self.lon - lon).abs() < tolerance
    }
}

/// Time-expiring cache keyed by latitude/longitude with a tolerance window
#[derive(Debug)]
pub struct GeoCache<V> {
    entries: Mutex<Vec<GeoEntry<V>>>,
    ttl: Duration,
    tolerance: f64,
}

impl<V: Clone> GeoCache<V> {
    /// Creates an empty cache using the default tolerance
    pub fn new(ttl: Duration) -> Self {
        Self::with_tolerance(ttl, GEO_TOLERANCE_DEGREES)
    }

    /// Creates an empty cache with a custom tolerance in degrees
    pub fn with_tolerance(ttl: Duration, tolerance: f64) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            ttl,
            tolerance,
        }
    }

    /// Returns the payload of the first fresh entry near `(lat, lon)`
    ///
    /// Expired entries encountered before the match are removed in the same
    /// pass, under a single lock acquisition.
    pub fn get(&self, lat: f64, lon: f64) -> Option<V> {
        let now = Utc::now();
        let mut entries = self.entries.lock();

        let mut i = 0;
        while i < entries.len() {
            if is_expired(entries[i].cached_at, self.ttl, now) {
                entries.remove(i);
                continue;
            }
            if entries[i].is_near(lat, lon, self.tolerance) {
                return Some(entries[i].value.clone());
            }
            i += 1;
        }

        None
    }

    /// Records `value` for the exact pair `(lat, lon)`
    ///
    /// Nearby pairs are not merged; only an entry with the identical pair is
    /// replaced (keeping its position in the scan order).
    pub fn put(&self, lat: f64, lon: f64, value: V) {
        let entry = GeoEntry {
            lat,
            lon,
            value,
            cached_at: Utc::now(),
        };

        let mut entries = self.entries.lock();
        match entries.iter_mut().find(|e| e.lat == lat && e.lon == lon) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// Number of stored entries, expired or not
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
