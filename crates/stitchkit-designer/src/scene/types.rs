//! Parameter types for scene transform operations.

use serde::{Deserialize, Serialize};

use crate::model::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalAlignment {
    #[default]
    None,
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// Which edge (or the centre) is spaced evenly when distributing vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalDistribution {
    #[default]
    None,
    Top,
    Center,
    Bottom,
}

/// Which edge (or the centre) is spaced evenly when distributing horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalDistribution {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// Lattice used by grid arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridArrangement {
    /// Minimum number of rows. Used to derive columns when `columns` is 0.
    pub rows: usize,
    /// Items per row before wrapping.
    pub columns: usize,
    pub cell_size: Size,
    /// Horizontal and vertical gap between lattice cells.
    pub spacing: Size,
    /// Top-left of the first lattice cell.
    pub anchor: Point,
    /// Arrange the selection (reading order) instead of every gridded cell.
    pub use_selection: bool,
}

impl Default for GridArrangement {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 0,
            cell_size: Size::new(
                stitchkit_core::constants::DEFAULT_CELL_WIDTH,
                stitchkit_core::constants::DEFAULT_CELL_HEIGHT,
            ),
            spacing: Size::new(0.0, 0.0),
            anchor: Point::default(),
            use_selection: true,
        }
    }
}

impl GridArrangement {
    /// Effective number of columns for `count` items.
    pub fn effective_columns(&self, count: usize) -> usize {
        if self.columns > 0 {
            self.columns
        } else {
            count.div_ceil(self.rows.max(1)).max(1)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorDirection {
    Left,
    Right,
    Up,
    Down,
}

impl MirrorDirection {
    /// Left/Right flip across the vertical axis.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, MirrorDirection::Left | MirrorDirection::Right)
    }
}

/// Per-item translation produced by alignment, distribution and arrangement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDelta {
    pub id: stitchkit_core::ItemId,
    pub dx: f64,
    pub dy: f64,
}
