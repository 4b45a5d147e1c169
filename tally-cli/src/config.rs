use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_store_path, ensure_tally_home, tally_home};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StoreSection {
    /// Category store document. Defaults to ~/.tally/categories.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogSection {
    /// tracing filter directive; RUST_LOG takes precedence
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySection {
    pub currency: String,
    /// Rows printed by `categorize` when --limit is not given (0 = all)
    pub preview_rows: usize,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency: "$".to_string(),
            preview_rows: 0,
        }
    }
}

impl Config {
    /// Store path: explicit override, then config, then ~/.tally/categories.json
    pub fn store_path(&self, overridden: Option<&Path>) -> Result<PathBuf> {
        match overridden.or(self.store.path.as_deref()) {
            Some(p) => Ok(p.to_path_buf()),
            None => default_store_path(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<PathBuf> {
    ensure_tally_home()?;
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(p);
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(p)
}
