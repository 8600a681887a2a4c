//! The ~/.nosh state directory: location cache file and chat transcripts.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use nosh_core::{CacheStore, CachedLocation};

pub fn nosh_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".nosh"))
}

pub fn ensure_nosh_home() -> Result<PathBuf> {
    let dir = nosh_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn location_cache_path() -> Result<PathBuf> {
    Ok(ensure_nosh_home()?.join("location.json"))
}

pub fn chat_dir() -> Result<PathBuf> {
    let dir = ensure_nosh_home()?.join("chat");
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// JSON-file backing store for the core location cache. Read and write
/// problems degrade to an empty cache; the caller just loses the shortcut.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn at_default_path() -> Result<Self> {
        Ok(Self::new(location_cache_path()?))
    }
}

impl CacheStore for FileStore {
    fn load(&self) -> Option<CachedLocation> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save(&mut self, cached: &CachedLocation) {
        if let Ok(json) = serde_json::to_string_pretty(cached) {
            let _ = fs::write(&self.path, json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_cache_file_reads_as_empty() {
        let path = std::env::temp_dir().join("nosh-test-corrupt-location.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(path.clone());
        assert!(store.load().is_none());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_cache_file_reads_as_empty() {
        let store = FileStore::new(PathBuf::from("/nonexistent/nosh/location.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        use chrono::Utc;
        use nosh_core::Coordinate;

        let path = std::env::temp_dir().join("nosh-test-location.json");
        let mut store = FileStore::new(path.clone());
        let cached = CachedLocation {
            coord: Coordinate::new(37.781, -122.41),
            stored_at: Utc::now(),
        };
        store.save(&cached);
        assert_eq!(store.load(), Some(cached));

        let _ = fs::remove_file(path);
    }
}
