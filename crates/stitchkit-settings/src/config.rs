//! Configuration and settings management for StitchKit
//!
//! Provides configuration file handling, settings lookup, and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Chart defaults (stitch, cell size, row spacing, new chart shape)
//! - Colors (primary/alternate glyph colors, background)
//! - Editor behaviour (undo depth, drag threshold, paste offset, snapping)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stitchkit_core::constants::*;
use stitchkit_core::defaults::*;
use stitchkit_core::{Color, DefaultsProvider};

use crate::error::{ConfigError, SettingsError, SettingsResult};

const APP_DIR: &str = "stitchkit";
const CONFIG_FILE: &str = "config.toml";

/// Layout of a newly created chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyleSetting {
    /// Straight rows, top to bottom
    #[default]
    Rows,
    /// Concentric rounds around a centre
    Rounds,
    /// No grid, free placement only
    Blank,
}

impl std::fmt::Display for ChartStyleSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rows => write!(f, "rows"),
            Self::Rounds => write!(f, "rounds"),
            Self::Blank => write!(f, "blank"),
        }
    }
}

/// Chart creation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Stitch used for new cells and for unknown stitch lookups
    pub default_stitch: String,
    /// Nominal cell width in scene units
    pub cell_width: f64,
    /// Nominal cell height in scene units
    pub cell_height: f64,
    /// Vertical gap between rows (radial gap between rounds)
    pub row_spacing: f64,
    /// Rows of a new chart
    pub default_rows: usize,
    /// Columns of a new chart
    pub default_columns: usize,
    /// Layout of a new chart
    #[serde(default)]
    pub style: ChartStyleSetting,
    /// Draw the centre marker on rounds charts
    #[serde(default = "default_true")]
    pub show_chart_center: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            default_stitch: DEFAULT_STITCH.to_string(),
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            row_spacing: DEFAULT_ROW_SPACING,
            default_rows: 10,
            default_columns: 10,
            style: ChartStyleSetting::default(),
            show_chart_center: true,
        }
    }
}

/// Stitch color defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorSettings {
    /// Glyph color of new cells
    pub primary: Color,
    /// Glyph color toggled in by re-applying the same stitch
    pub alternate: Color,
    /// Background fill of new cells
    pub background: Color,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            primary: Color::BLACK,
            alternate: Color::rgb(255, 0, 0),
            background: Color::WHITE,
        }
    }
}

/// Editing behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Maximum undo depth
    pub undo_limit: usize,
    /// Pointer travel (scene units) before a press becomes a drag
    pub drag_threshold: f64,
    /// Offset applied to pasted items
    pub paste_offset: f64,
    /// Snap dragged items to the grid pitch
    #[serde(default)]
    pub snap_to_grid: bool,
    /// Number of recent files to track
    pub recent_files_count: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            paste_offset: DEFAULT_PASTE_OFFSET,
            snap_to_grid: false,
            recent_files_count: 10,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chart creation defaults
    #[serde(default)]
    pub chart: ChartSettings,
    /// Stitch colors
    #[serde(default)]
    pub colors: ColorSettings,
    /// Editor behaviour
    #[serde(default)]
    pub editor: EditorSettings,
    /// Recent files list
    #[serde(default)]
    pub recent_files: Vec<PathBuf>,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location, e.g. `~/.config/stitchkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
        })?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.chart.default_stitch.trim().is_empty() {
            return Err(ConfigError::MissingKey("chart.default_stitch".to_string()).into());
        }

        if self.chart.cell_width <= 0.0 || self.chart.cell_height <= 0.0 {
            return Err(SettingsError::invalid("chart.cell_size", "must be > 0"));
        }

        if self.chart.row_spacing < 0.0 {
            return Err(SettingsError::invalid("chart.row_spacing", "must be >= 0"));
        }

        if self.editor.undo_limit == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "editor.undo_limit".to_string(),
                value: self.editor.undo_limit.to_string(),
            }
            .into());
        }

        if self.editor.drag_threshold < 0.0 {
            return Err(SettingsError::invalid("editor.drag_threshold", "must be >= 0"));
        }

        Ok(())
    }

    /// Add file to recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|f| f != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.editor.recent_files_count);
    }

    /// Get setting by key
    pub fn get_setting(&self, key: &str) -> Option<String> {
        let value = match key {
            KEY_DEFAULT_STITCH => self.chart.default_stitch.clone(),
            KEY_PRIMARY_COLOR => self.colors.primary.name(),
            KEY_ALTERNATE_COLOR => self.colors.alternate.name(),
            KEY_BACKGROUND_COLOR => self.colors.background.name(),
            KEY_CELL_WIDTH => self.chart.cell_width.to_string(),
            KEY_CELL_HEIGHT => self.chart.cell_height.to_string(),
            KEY_ROW_SPACING => self.chart.row_spacing.to_string(),
            KEY_DRAG_THRESHOLD => self.editor.drag_threshold.to_string(),
            KEY_UNDO_LIMIT => self.editor.undo_limit.to_string(),
            KEY_PASTE_OFFSET => self.editor.paste_offset.to_string(),
            KEY_SNAP_TO_GRID => self.editor.snap_to_grid.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set setting by key
    pub fn set_setting(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        let number = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| SettingsError::invalid(key, format!("'{}' is not a number", v)))
        };
        let color = |v: &str| {
            v.parse::<Color>()
                .map_err(|e| SettingsError::invalid(key, e.to_string()))
        };

        match key {
            KEY_DEFAULT_STITCH => self.chart.default_stitch = value.to_string(),
            KEY_PRIMARY_COLOR => self.colors.primary = color(value)?,
            KEY_ALTERNATE_COLOR => self.colors.alternate = color(value)?,
            KEY_BACKGROUND_COLOR => self.colors.background = color(value)?,
            KEY_CELL_WIDTH => self.chart.cell_width = number(value)?,
            KEY_CELL_HEIGHT => self.chart.cell_height = number(value)?,
            KEY_ROW_SPACING => self.chart.row_spacing = number(value)?,
            KEY_DRAG_THRESHOLD => self.editor.drag_threshold = number(value)?,
            KEY_PASTE_OFFSET => self.editor.paste_offset = number(value)?,
            KEY_SNAP_TO_GRID => {
                self.editor.snap_to_grid = value
                    .parse()
                    .map_err(|_| SettingsError::invalid(key, "expected true or false"))?
            }
            KEY_UNDO_LIMIT => {
                self.editor.undo_limit = value
                    .parse()
                    .map_err(|_| SettingsError::invalid(key, "expected a whole number"))?
            }
            _ => return Err(ConfigError::MissingKey(key.to_string()).into()),
        }
        Ok(())
    }
}

impl DefaultsProvider for Config {
    fn value(&self, key: &str) -> Option<String> {
        self.get_setting(key)
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
        }
    }
}
