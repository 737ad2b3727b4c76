//! Default-configuration provider contract.
//!
//! The chart engine never reads settings from a global. A provider is
//! injected at construction and queried by key whenever new cells need a
//! stitch or colors, or when editing thresholds are needed.

use std::collections::HashMap;

use crate::color::Color;
use crate::constants::*;

pub const KEY_DEFAULT_STITCH: &str = "default_stitch";
pub const KEY_PRIMARY_COLOR: &str = "stitch_primary_color";
pub const KEY_ALTERNATE_COLOR: &str = "stitch_alternate_color";
pub const KEY_BACKGROUND_COLOR: &str = "stitch_background_color";
pub const KEY_CELL_WIDTH: &str = "cell_width";
pub const KEY_CELL_HEIGHT: &str = "cell_height";
pub const KEY_ROW_SPACING: &str = "row_spacing";
pub const KEY_DRAG_THRESHOLD: &str = "drag_threshold";
pub const KEY_UNDO_LIMIT: &str = "undo_limit";
pub const KEY_PASTE_OFFSET: &str = "paste_offset";
pub const KEY_SNAP_TO_GRID: &str = "snap_to_grid";

/// Named string settings with typed accessors.
///
/// Only [`DefaultsProvider::value`] is required. The typed accessors parse
/// the string value and fall back to the built-in constant when the key is
/// missing or malformed.
pub trait DefaultsProvider: Send + Sync {
    /// Raw setting lookup by key.
    fn value(&self, key: &str) -> Option<String>;

    fn default_stitch(&self) -> String {
        self.value(KEY_DEFAULT_STITCH)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STITCH.to_string())
    }

    fn primary_color(&self) -> Color {
        parse_color(self.value(KEY_PRIMARY_COLOR), DEFAULT_PRIMARY_COLOR)
    }

    fn alternate_color(&self) -> Color {
        parse_color(self.value(KEY_ALTERNATE_COLOR), DEFAULT_ALTERNATE_COLOR)
    }

    fn background_color(&self) -> Color {
        self.value(KEY_BACKGROUND_COLOR)
            .and_then(|v| v.parse().ok())
            .unwrap_or(Color::WHITE)
    }

    fn cell_size(&self) -> (f64, f64) {
        (
            parse_number(self.value(KEY_CELL_WIDTH), DEFAULT_CELL_WIDTH),
            parse_number(self.value(KEY_CELL_HEIGHT), DEFAULT_CELL_HEIGHT),
        )
    }

    fn row_spacing(&self) -> f64 {
        parse_number(self.value(KEY_ROW_SPACING), DEFAULT_ROW_SPACING)
    }

    fn drag_threshold(&self) -> f64 {
        parse_number(self.value(KEY_DRAG_THRESHOLD), DEFAULT_DRAG_THRESHOLD)
    }

    fn undo_limit(&self) -> usize {
        self.value(KEY_UNDO_LIMIT)
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_UNDO_LIMIT)
    }

    fn paste_offset(&self) -> f64 {
        parse_number(self.value(KEY_PASTE_OFFSET), DEFAULT_PASTE_OFFSET)
    }

    /// Whether dragged items move in whole grid steps.
    fn snap_to_grid(&self) -> bool {
        self.value(KEY_SNAP_TO_GRID)
            .and_then(|v| v.parse().ok())
            .unwrap_or(false)
    }
}

fn parse_color(value: Option<String>, fallback: &str) -> Color {
    value
        .and_then(|v| v.parse().ok())
        .or_else(|| fallback.parse().ok())
        .unwrap_or_default()
}

fn parse_number(value: Option<String>, fallback: f64) -> f64 {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n >= 0.0)
        .unwrap_or(fallback)
}

/// In-memory provider, mostly for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticDefaults {
    values: HashMap<String, String>,
}

impl StaticDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }
}

impl DefaultsProvider for StaticDefaults {
    fn value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
