//! ~/.nosh/config.toml: collaborator endpoints and chat tuning.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_nosh_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiSection,
    pub auth: AuthSection,
    pub chat: ChatSection,
    #[serde(default)]
    pub location: LocationSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// Chat-completion proxy, e.g. http://localhost:8787
    pub base_url: String,
    /// When false the chat never calls out; replies stay fully deterministic.
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSection {
    /// Account service root, e.g. http://localhost:8000/api
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSection {
    /// Characters revealed per UI tick while a reply types out.
    pub reveal_chars_per_tick: usize,
    /// How many recent turns are forwarded to the completion proxy.
    pub max_turns_context: usize,
}

/// Fixed coordinate override; skips the geolocation lookup entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationSection {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSection {
                base_url: "http://localhost:8787".to_string(),
                enabled: false,
            },
            auth: AuthSection {
                base_url: "http://localhost:8000/api".to_string(),
            },
            chat: ChatSection {
                reveal_chars_per_tick: 3,
                max_turns_context: 12,
            },
            location: LocationSection::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_nosh_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
