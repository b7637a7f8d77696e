pub mod general;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use toml::Table;

pub use general::{ClusterConfig, GeneralConfig};

const APP_DIR: &str = "kontext";
const FILE_NAME: &str = "config.toml";

pub const DEFAULT_CONFIG: &str = include_str!("defaults.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub cluster: ClusterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded defaults must parse")
    }
}

impl AppConfig {
    /// Embedded defaults overlaid with the user file when there is one. A user
    /// file that cannot be used is reported on stderr and skipped.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            eprintln!("Warning: ignoring config at {}: {e:#}", path.display());
            Self::default()
        })
    }

    /// Like [`AppConfig::load`] for an explicit file, which must exist and parse.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
        Self::layered(&text).with_context(|| format!("invalid config at {}", path.display()))
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR).join(FILE_NAME)
    }

    /// Keys present in `user` win; everything else keeps its default.
    fn layered(user: &str) -> anyhow::Result<Self> {
        let mut base: Table = toml::from_str(DEFAULT_CONFIG)?;
        let user: Table = toml::from_str(user)?;
        overlay(&mut base, user);
        Ok(toml::Value::Table(base).try_into()?)
    }

    pub fn backup_retention(&self) -> usize {
        self.general.backup_retention.max(1)
    }
}

/// Merges nested tables key by key; any other value replaces the base value.
/// Kebab-case keys are folded onto their snake_case defaults.
fn overlay(base: &mut Table, user: Table) {
    for (key, value) in user {
        let key = key.replace('-', "_");
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(inner)), toml::Value::Table(patch)) => overlay(inner, patch),
            (Some(slot), value) => *slot = value,
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests;
