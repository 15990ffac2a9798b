//! Config persistence and path resolution methods for `Config`.
//!
//! Covers:
//! - `load` / `save` (YAML file I/O with atomic write)
//! - XDG-compliant path helpers (`config_path`, `config_dir`, `store_path`)
//! - Semantic validation of loaded values

use super::config_struct::Config;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest accepted `watch_debounce_ms`; anything longer makes the watcher useless.
const MAX_WATCH_DEBOUNCE_MS: u64 = 60_000;

impl Config {
    /// Load configuration from the default location, creating it if missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`.
    ///
    /// When the file does not exist a default config is written there and returned.
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Config path: {:?}", path);

        if !path.exists() {
            log::info!("Config file not found, creating default at {:?}", path);
            let config = Self::default();
            if let Err(e) = config.save_to(path) {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            log::info!("Default config created successfully");
            return Ok(config);
        }

        log::info!("Loading existing config from {:?}", path);
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let mut config: Config = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml_ng::from_str(&contents)
                .map_err(ConfigError::from)
                .with_context(|| format!("Failed to parse config from {:?}", path))?
        };

        config.validate()?;

        // Merge in any new default keybindings that don't exist in user's config
        config.merge_default_keybindings();

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Check semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch_debounce_ms > MAX_WATCH_DEBOUNCE_MS {
            return Err(ConfigError::Validation(format!(
                "watch_debounce_ms must be at most {MAX_WATCH_DEBOUNCE_MS}, got {}",
                self.watch_debounce_ms
            )));
        }
        if let Some(binding) = self.keybindings.iter().find(|kb| kb.key.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "keybinding for action '{}' has an empty key",
                binding.action
            )));
        }
        if let Some(store) = &self.store_path
            && store.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "store_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the tab store location: the configured override or the default.
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join(crate::defaults::STORE_FILE_NAME))
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("tabtree")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // Use XDG convention on all platforms: ~/.config/tabtree
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("tabtree")
            } else {
                PathBuf::from(".")
            }
        }
    }
}
