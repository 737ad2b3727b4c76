//! Shared defaults for chart geometry and editing.

/// Stitch used when a chart or cell names no stitch, or an unknown one.
pub const DEFAULT_STITCH: &str = "ch";

/// Glyph size used when a stitch has no resource behind it.
pub const DEFAULT_CELL_WIDTH: f64 = 32.0;
pub const DEFAULT_CELL_HEIGHT: f64 = 32.0;

/// Gap between consecutive rows (rows charts) or rounds (rounds charts).
pub const DEFAULT_ROW_SPACING: f64 = 8.0;

/// Pointer travel below which a press/release pair counts as a click.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 5.0;

/// Maximum number of undo entries kept.
pub const DEFAULT_UNDO_LIMIT: usize = 200;

/// Offset applied to pasted items so they do not cover their source.
pub const DEFAULT_PASTE_OFFSET: f64 = 16.0;

/// Primary and alternate glyph colors.
pub const DEFAULT_PRIMARY_COLOR: &str = "#000000";
pub const DEFAULT_ALTERNATE_COLOR: &str = "#ff0000";

/// Smallest scale factor a cell can be shrunk to.
pub const MIN_CELL_SCALE: f64 = 0.1;

/// Indicator text metrics used to estimate its bounding box.
pub const INDICATOR_CHAR_WIDTH: f64 = 7.0;
pub const INDICATOR_LINE_HEIGHT: f64 = 14.0;
pub const INDICATOR_PADDING: f64 = 4.0;

/// Hit-test tolerance in scene units.
pub const HIT_TOLERANCE: f64 = 0.5;
