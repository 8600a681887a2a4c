//! Coordinates, great-circle distance, and the device-location cache.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Earth radius in miles.
const EARTH_RADIUS_MI: f64 = 3958.761;

/// Cached device locations go stale after this many minutes.
pub const LOCATION_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Parse a "lat,lng" pair like "37.781,-122.41".
    pub fn parse(s: &str) -> Result<Self> {
        let mut it = s.split(',');
        let lat = it.next().map(str::trim).unwrap_or_default();
        let lng = it.next().map(str::trim).unwrap_or_default();
        if lng.is_empty() || it.next().is_some() {
            anyhow::bail!("expected LAT,LNG, got '{s}'");
        }
        let lat: f64 = lat
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid latitude '{lat}'"))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid longitude '{lng}'"))?;
        Ok(Self { lat, lng })
    }
}

/// Great-circle distance in miles between two coordinates (haversine).
pub fn haversine_mi(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lng = (d_lng / 2.0).sin();
    let h = sin_d_lat * sin_d_lat + lat1.cos() * lat2.cos() * sin_d_lng * sin_d_lng;
    2.0 * EARTH_RADIUS_MI * h.sqrt().asin()
}

/// A device coordinate plus the moment it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedLocation {
    pub coord: Coordinate,
    pub stored_at: DateTime<Utc>,
}

/// Backing store for [`LocationCache`].
///
/// Implementations swallow their own I/O failures: a missing or corrupt
/// store reads as empty, and a failed save is a silent no-op. Callers must
/// keep working with no cached value.
pub trait CacheStore {
    fn load(&self) -> Option<CachedLocation>;
    fn save(&mut self, cached: &CachedLocation);
}

/// In-memory store; used in tests and as the no-persistence fallback.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore(Option<CachedLocation>);

impl CacheStore for MemoryStore {
    fn load(&self) -> Option<CachedLocation> {
        self.0
    }

    fn save(&mut self, cached: &CachedLocation) {
        self.0 = Some(*cached);
    }
}

/// Device-location cache with a 5 minute freshness window.
///
/// Callers pass `now` explicitly so freshness is testable without a clock.
#[derive(Debug, Clone)]
pub struct LocationCache<S: CacheStore> {
    store: S,
}

impl<S: CacheStore> LocationCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The stored coordinate, only while strictly younger than the TTL.
    pub fn get(&self, now: DateTime<Utc>) -> Option<Coordinate> {
        let cached = self.store.load()?;
        if now - cached.stored_at < Duration::minutes(LOCATION_TTL_MINUTES) {
            Some(cached.coord)
        } else {
            None
        }
    }

    /// Store a coordinate, overwriting any previous value.
    pub fn set(&mut self, coord: Coordinate, now: DateTime<Utc>) {
        self.store.save(&CachedLocation {
            coord,
            stored_at: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sf() -> Coordinate {
        Coordinate::new(37.783, -122.41)
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = sf();
        let b = Coordinate::new(37.776, -122.415);
        assert_eq!(haversine_mi(a, a), 0.0);
        assert!((haversine_mi(a, b) - haversine_mi(b, a)).abs() < 1e-12);
    }

    #[test]
    fn distance_between_nearby_seeds_is_sane() {
        // Mario's Pizzeria -> Green Garden, a few blocks in SF.
        let a = Coordinate::new(37.781, -122.41);
        let b = Coordinate::new(37.786, -122.407);
        let d = haversine_mi(a, b);
        assert!(d > 0.3 && d < 0.5, "got {d}");
    }

    #[test]
    fn parse_coordinate_pair() {
        let c = Coordinate::parse(" 37.781 , -122.41 ").unwrap();
        assert_eq!(c.lat, 37.781);
        assert_eq!(c.lng, -122.41);

        assert!(Coordinate::parse("37.781").is_err());
        assert!(Coordinate::parse("a,b").is_err());
        assert!(Coordinate::parse("1,2,3").is_err());
    }

    #[test]
    fn cache_returns_fresh_value_only() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut cache = LocationCache::new(MemoryStore::default());
        assert_eq!(cache.get(t0), None);

        cache.set(sf(), t0);
        assert_eq!(cache.get(t0 + Duration::minutes(4)), Some(sf()));

        // Exactly at the TTL counts as stale.
        assert_eq!(cache.get(t0 + Duration::minutes(5)), None);
        assert_eq!(cache.get(t0 + Duration::hours(1)), None);
    }

    /// The JSON shape the file-backed store persists.
    #[test]
    fn cached_location_round_trips_through_json() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let cached = CachedLocation {
            coord: sf(),
            stored_at: t0,
        };
        let json = serde_json::to_string(&cached).unwrap();
        let back: CachedLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cached);
    }

    #[test]
    fn cache_overwrites_previous_value() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut cache = LocationCache::new(MemoryStore::default());
        cache.set(sf(), t0);

        let newer = Coordinate::new(40.0, -74.0);
        cache.set(newer, t0 + Duration::minutes(1));
        assert_eq!(cache.get(t0 + Duration::minutes(2)), Some(newer));
    }
}
