//! Device location resolution.
//!
//! Order: fresh cache, then the config override, then an IP geolocation
//! lookup bounded by a timeout. Every failure mode collapses to `None`;
//! callers proceed without a location, never fail.

use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;

use anyhow::Result;
use nosh_core::{Coordinate, LocationCache};

use crate::config::Config;
use crate::state::FileStore;

/// Upper bound on the geolocation lookup.
pub const LOOKUP_TIMEOUT_SECS: u64 = 8;

const GEO_ENDPOINT: &str = "http://ip-api.com/json";

#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Best-effort device coordinate. Successful lookups refresh the cache.
pub async fn resolve(cfg: &Config) -> Option<Coordinate> {
    let now = Utc::now();
    let mut cache = FileStore::at_default_path().ok().map(LocationCache::new);

    if let Some(coord) = cache.as_ref().and_then(|c| c.get(now)) {
        return Some(coord);
    }

    if let (Some(lat), Some(lng)) = (cfg.location.lat, cfg.location.lng) {
        return Some(Coordinate::new(lat, lng));
    }

    let coord = lookup_by_ip().await?;
    if let Some(cache) = cache.as_mut() {
        cache.set(coord, now);
    }
    Some(coord)
}

/// Pin a manual coordinate into the cache (the `locate --set` path).
pub fn pin(coord: Coordinate) -> Result<()> {
    let mut cache = LocationCache::new(FileStore::at_default_path()?);
    cache.set(coord, Utc::now());
    Ok(())
}

async fn lookup_by_ip() -> Option<Coordinate> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
        .build()
        .ok()?;

    let resp = client.get(GEO_ENDPOINT).send().await.ok()?;
    let geo: GeoResponse = resp.json().await.ok()?;
    if geo.status != "success" {
        return None;
    }
    Some(Coordinate::new(geo.lat?, geo.lon?))
}
