//! Settings Persistence
//!
//! Loads and saves the application config at a fixed location, falling back
//! to defaults when no file exists yet.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};

/// Settings persistence layer
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    config: Config,
    path: PathBuf,
}

impl SettingsPersistence {
    /// Create a persistence layer with default config bound to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            config: Config::default(),
            path: path.into(),
        }
    }

    /// Persistence bound to the platform config location
    pub fn at_default_location() -> SettingsResult<Self> {
        Ok(Self::new(Config::default_path()?))
    }

    /// Load settings from `path`, or defaults if the file does not exist
    pub fn load_or_default(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::info!(
                "No settings at {}, using defaults",
                path.display()
            );
            return Ok(Self::new(path));
        }

        let config = Config::load_from_file(&path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;
        Ok(Self { config, path })
    }

    /// Save settings, creating parent directories as needed
    pub fn save(&self) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SettingsError::ConfigDirectory(e.to_string()))?;
            }
        }
        self.config
            .save_to_file(&self.path)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", self.path.display(), e)))
    }

    /// Restore built-in defaults without touching the file
    pub fn reset(&mut self) {
        self.config = Config::default();
    }

    /// Get reference to config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable reference to config
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        self.config.validate()
    }
}
