//! In-memory TTL cache for weather readings.
//!
//! Keyed by coordinates rounded to 4 decimal places, so requests a few
//! metres apart share a slot. Entries are replaced whole under the lock,
//! never patched in place.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::types::WeatherReading;

/// Default freshness window: 15 minutes.
pub const DEFAULT_TTL_SECS: i64 = 900;

#[derive(Debug, Clone)]
struct CacheEntry {
    reading: WeatherReading,
    cached_at: DateTime<Utc>,
}

/// Process-wide weather cache owned by the provider.
#[derive(Debug)]
pub struct WeatherCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl WeatherCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Composite key from coordinates rounded to 4 decimals.
    pub fn key(lat: f64, lon: f64) -> String {
        format!("{lat:.4}_{lon:.4}")
    }

    /// Fresh reading for the coordinate, if any.
    pub fn get(&self, lat: f64, lon: f64) -> Option<WeatherReading> {
        self.get_at(lat, lon, Utc::now())
    }

    /// Lookup against an explicit clock.
    pub fn get_at(&self, lat: f64, lon: f64, now: DateTime<Utc>) -> Option<WeatherReading> {
        let key = Self::key(lat, lon);
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(&key).and_then(|entry| {
            if now - entry.cached_at < self.ttl {
                debug!(cache_key = %key, "Weather cache hit");
                Some(entry.reading.clone())
            } else {
                None
            }
        })
    }

    pub fn put(&self, lat: f64, lon: f64, reading: WeatherReading) {
        self.put_at(lat, lon, reading, Utc::now());
    }

    /// Insert or overwrite, sweeping entries that have gone stale.
    pub fn put_at(&self, lat: f64, lon: f64, reading: WeatherReading, now: DateTime<Utc>) {
        let key = Self::key(lat, lon);
        let ttl = self.ttl;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, entry| now - entry.cached_at < ttl);
        entries.insert(key, CacheEntry { reading, cached_at: now });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
