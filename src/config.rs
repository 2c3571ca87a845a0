//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/kintree/kintree.toml`
//! 3. Local config file passed via `--config`
//! 4. Environment variables: `KINTREE_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::Palette;

/// Raw settings for intermediate parsing (fields are Option to detect
/// "not specified", so an absent table keeps the lower layer's value).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub colors: Option<BTreeMap<String, String>>,
    pub default_color: Option<String>,
}

/// Unified configuration for kintree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Source → color mapping used for propagation
    pub colors: BTreeMap<String, String>,
    /// Color for roots without a known source declaration
    pub default_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        let mut colors = BTreeMap::new();
        colors.insert("link".to_string(), "#2196F3".to_string());
        colors.insert("playmarket".to_string(), "#9E9E9E".to_string());

        Self {
            colors,
            default_color: "#9E9E9E".to_string(),
        }
    }
}

/// Get the XDG config directory for kintree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kintree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("kintree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Apply a config layer onto self.
    ///
    /// Scalars override if specified. The colors table REPLACES the lower
    /// layer entirely when specified: the compiled defaults are examples,
    /// a configured palette defines the real mapping.
    fn apply(&self, layer: &RawSettings) -> Self {
        Self {
            colors: layer.colors.clone().unwrap_or_else(|| self.colors.clone()),
            default_color: layer
                .default_color
                .clone()
                .unwrap_or_else(|| self.default_color.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional explicit config file (`--config`); unlike the
    ///   global layer, a missing file here is an error
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults (examples only)
    /// 2. Global config: `$XDG_CONFIG_HOME/kintree/kintree.toml`
    /// 3. Local config file passed via `--config`
    /// 4. Environment variables: `KINTREE_*` prefix (explicit override)
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply(&raw);
            }
        }

        if let Some(local_path) = local {
            let raw = load_raw_settings(local_path)?;
            current = current.apply(&raw);
        }

        current = Self::apply_env_overrides(current)?;

        Ok(current)
    }

    /// Apply KINTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("KINTREE")
                .separator("__")
                .list_separator(","),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("default_color") {
            settings.default_color = val;
        }
        // KINTREE_COLORS__<SOURCE> overrides or adds a single mapping
        if let Ok(table) = config.get_table("colors") {
            for (key, value) in table {
                if let Ok(color) = value.into_string() {
                    settings.colors.insert(key, color);
                }
            }
        }

        Ok(settings)
    }

    /// The palette handed to color propagation.
    pub fn palette(&self) -> Palette {
        Palette::new(self.colors.clone(), self.default_color.clone())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# kintree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/kintree/kintree.toml
#   Local:  any file passed via --config
#   Env:    KINTREE_* environment variables (explicit overrides)
#
# A [colors] table REPLACES the compiled defaults entirely.

# Color for roots without a known source declaration
# default_color = "#9E9E9E"

# [colors]
# link = "#2196F3"
# playmarket = "#9E9E9E"
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
