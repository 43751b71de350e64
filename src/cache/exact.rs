//! Exact-key cache with optional discriminator matching

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

use super::is_expired;

/// A cached value along with the metadata needed to validate a hit
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    cached_at: DateTime<Utc>,
    /// Secondary attribute that must match on lookup (e.g. "imperial")
    discriminator: Option<String>,
}

/// Time-expiring cache addressed by a case-sensitive string key
///
/// At most one entry exists per key. A lookup is a hit only when the entry is
/// fresh and its discriminator equals the requested one; a fresh entry with a
/// different discriminator is a miss but stays in place until the next `put`.
#[derive(Debug)]
pub struct ExactCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> ExactCache<V> {
    /// Creates an empty cache whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Looks up `key`, evicting it if it has expired
    ///
    /// # Returns
    /// * `Some(V)` if a fresh entry exists with a matching discriminator
    /// * `None` otherwise
    pub fn get(&self, key: &str, discriminator: Option<&str>) -> Option<V> {
        let now = Utc::now();
        let mut entries = self.entries.lock();

        match entries.get(key) {
            None => return None,
            Some(entry) if !is_expired(entry.cached_at, self.ttl, now) => {
                if entry.discriminator.as_deref() == discriminator {
                    return Some(entry.value.clone());
                }
                return None;
            }
            Some(_) => {}
        }

        entries.remove(key);
        None
    }

    /// Stores `value` under `key`, replacing any previous entry
    pub fn put(&self, key: impl Into<String>, value: V, discriminator: Option<&str>) {
        let entry = CacheEntry {
            value,
            cached_at: Utc::now(),
            discriminator: discriminator.map(str::to_string),
        };
        self.entries.lock().insert(key.into(), entry);
    }

    /// Number of stored entries, expired or not
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
