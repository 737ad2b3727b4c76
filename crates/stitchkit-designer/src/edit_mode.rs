//! Edit modes and pointer input types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Point;

/// What a pointer gesture does to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditMode {
    /// Set stitches, move items, create free cells.
    #[default]
    StitchPlacement,
    /// Paint cell backgrounds.
    ColorPlacement,
    /// Select and move whole rows.
    RowEdit,
    RotationAdjust,
    ScaleAdjust,
    /// Create, move and focus indicators.
    IndicatorPlacement,
}

impl EditMode {
    pub const ALL: [EditMode; 6] = [
        EditMode::StitchPlacement,
        EditMode::ColorPlacement,
        EditMode::RowEdit,
        EditMode::RotationAdjust,
        EditMode::ScaleAdjust,
        EditMode::IndicatorPlacement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::StitchPlacement => "stitch",
            EditMode::ColorPlacement => "color",
            EditMode::RowEdit => "row",
            EditMode::RotationAdjust => "rotate",
            EditMode::ScaleAdjust => "scale",
            EditMode::IndicatorPlacement => "indicator",
        }
    }

    /// Modes in which a drag moves the pressed item.
    pub fn drags_items(&self) -> bool {
        matches!(
            self,
            EditMode::StitchPlacement | EditMode::IndicatorPlacement | EditMode::RowEdit
        )
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EditMode::ALL
            .iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown edit mode '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Ctrl or Shift extends the selection instead of replacing it.
    pub fn multi_select(&self) -> bool {
        self.ctrl || self.shift
    }
}

/// A pointer event in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pos: Point,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            pos: Point::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}
