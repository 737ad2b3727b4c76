//! Event type definitions for the event bus.
//!
//! Chart events are the notifications the editing engine sends to its host
//! so side panels can follow stitch, color, row, and focus changes.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Identifier of an item owned by a chart scene.
pub type ItemId = u64;

/// Which color of a cell changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorRole {
    /// Glyph color, part of the rendered shape.
    Foreground,
    /// Fill behind the glyph.
    Background,
}

/// Root event enum for chart notifications
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartEvent {
    /// A cell switched to another stitch.
    StitchChanged {
        cell: ItemId,
        old: String,
        new: String,
    },
    /// A cell color changed. `old` is `None` when the cell had no color yet.
    ColorChanged {
        cell: ItemId,
        role: ColorRole,
        old: Option<Color>,
        new: Color,
    },
    /// A whole row was highlighted.
    RowSelected { row: usize },
    /// An indicator took text input focus.
    IndicatorFocusGained { indicator: ItemId },
    /// An indicator gave up text input focus.
    IndicatorFocusLost { indicator: ItemId },
    /// The set of selected items changed.
    SelectionChanged { count: usize },
    /// The active edit mode changed.
    ModeChanged { mode: String },
    /// Undo/redo availability changed.
    HistoryChanged { can_undo: bool, can_redo: bool },
}

impl ChartEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            ChartEvent::StitchChanged { .. } | ChartEvent::ColorChanged { .. } => {
                EventCategory::Cell
            }
            ChartEvent::RowSelected { .. } => EventCategory::Row,
            ChartEvent::IndicatorFocusGained { .. } | ChartEvent::IndicatorFocusLost { .. } => {
                EventCategory::Indicator
            }
            ChartEvent::SelectionChanged { .. } => EventCategory::Selection,
            ChartEvent::ModeChanged { .. } | ChartEvent::HistoryChanged { .. } => {
                EventCategory::Editor
            }
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            ChartEvent::StitchChanged { cell, old, new } => {
                format!("Cell {} stitch {} -> {}", cell, old, new)
            }
            ChartEvent::ColorChanged {
                cell,
                role,
                old,
                new,
            } => format!(
                "Cell {} {:?} color {} -> {}",
                cell,
                role,
                old.map(|c| c.name()).unwrap_or_default(),
                new
            ),
            ChartEvent::RowSelected { row } => format!("Row {} selected", row),
            ChartEvent::IndicatorFocusGained { indicator } => {
                format!("Indicator {} gained focus", indicator)
            }
            ChartEvent::IndicatorFocusLost { indicator } => {
                format!("Indicator {} lost focus", indicator)
            }
            ChartEvent::SelectionChanged { count } => format!("{} items selected", count),
            ChartEvent::ModeChanged { mode } => format!("Mode: {}", mode),
            ChartEvent::HistoryChanged { can_undo, can_redo } => {
                format!("History undo={} redo={}", can_undo, can_redo)
            }
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Stitch and color changes on cells.
    Cell,
    /// Row highlighting.
    Row,
    /// Indicator focus transfer.
    Indicator,
    /// Selection changes.
    Selection,
    /// Mode and history state.
    Editor,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Cell => write!(f, "Cell"),
            EventCategory::Row => write!(f, "Row"),
            EventCategory::Indicator => write!(f, "Indicator"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Editor => write!(f, "Editor"),
        }
    }
}
