use serde::{Deserialize, Serialize};
use stitchkit_core::constants::{DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH};
use stitchkit_core::{Color, ItemId};

use super::{rotate_point, normalize_degrees, Bounds, ItemTransform, Point, SceneShape, Size};
use crate::renderer::{PaintContext, Painter};

/// One stitch placed on the chart.
///
/// The glyph depends only on `stitch` and `color`; `bg_color` is painted
/// behind it and may be transparent. Grid membership is owned by the
/// scene's grid store, not by the cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: ItemId,
    pub stitch: String,
    pub color: Color,
    pub bg_color: Color,
    pub size: Size,
    pub transform: ItemTransform,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub parent: Option<ItemId>,
}

impl Cell {
    pub fn new(id: ItemId, stitch: impl Into<String>, size: Size) -> Self {
        Self {
            id,
            stitch: stitch.into(),
            color: Color::BLACK,
            bg_color: Color::WHITE,
            size,
            transform: ItemTransform::with_origin(Self::origin_for(size)),
            selected: false,
            highlighted: false,
            parent: None,
        }
    }

    /// Transform origin for a glyph of `size`: bottom centre.
    pub fn origin_for(size: Size) -> Point {
        Point::new(size.width / 2.0, size.height)
    }

    pub fn with_colors(mut self, color: Color, bg_color: Color) -> Self {
        self.color = color;
        self.bg_color = bg_color;
        self
    }

    pub fn at(mut self, pos: Point) -> Self {
        self.transform.pos = pos;
        self
    }

    pub fn pos(&self) -> Point {
        self.transform.pos
    }

    pub fn set_pos(&mut self, pos: Point) {
        self.transform.pos = pos;
    }

    pub fn rotation(&self) -> f64 {
        self.transform.rotation
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.transform.rotation = normalize_degrees(degrees);
    }

    pub fn set_scale(&mut self, sx: f64, sy: f64) {
        self.transform.scale_x = sx;
        self.transform.scale_y = sy;
    }

    /// Switches the stitch, resizing to the new glyph. Returns the old name
    /// when it actually changed.
    pub fn set_stitch(&mut self, stitch: &str, size: Size) -> Option<String> {
        let size = if size.width > 0.0 && size.height > 0.0 {
            size
        } else {
            Size::new(DEFAULT_CELL_WIDTH, DEFAULT_CELL_HEIGHT)
        };
        self.size = size;
        self.transform.origin = Self::origin_for(size);
        if self.stitch == stitch {
            return None;
        }
        Some(std::mem::replace(&mut self.stitch, stitch.to_string()))
    }

    /// Swaps between the primary and alternate glyph colors.
    ///
    /// Only cells currently using one of the two defaults are affected, so
    /// custom colors survive the toggle. Returns the previous color when it
    /// changed.
    pub fn toggle_alternate_color(&mut self, primary: Color, alternate: Color) -> Option<Color> {
        let next = if self.color == primary {
            alternate
        } else if self.color == alternate {
            primary
        } else {
            return None;
        };
        Some(std::mem::replace(&mut self.color, next))
    }

    /// Scene-space corners of the glyph rectangle, clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        let (w, h) = (self.size.width, self.size.height);
        [
            self.transform.map_point(Point::new(0.0, 0.0)),
            self.transform.map_point(Point::new(w, 0.0)),
            self.transform.map_point(Point::new(w, h)),
            self.transform.map_point(Point::new(0.0, h)),
        ]
    }
}

impl SceneShape for Cell {
    fn bounds(&self) -> Bounds {
        self.transform.map_rect(self.size)
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        let Some(local) = self.transform.inverse_map(p) else {
            return false;
        };
        local.x >= -tolerance
            && local.y >= -tolerance
            && local.x <= self.size.width + tolerance
            && local.y <= self.size.height + tolerance
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.pos.x += dx;
        self.transform.pos.y += dy;
    }

    fn rotate(&mut self, degrees: f64, pivot: Point) {
        self.transform.pos = rotate_point(self.transform.pos, pivot, degrees);
        self.set_rotation(self.transform.rotation + degrees);
    }

    fn paint(&self, painter: &mut dyn Painter, ctx: &PaintContext) {
        let corners = self.corners();

        if !self.bg_color.is_transparent() && self.bg_color != Color::WHITE {
            painter.fill_polygon(&corners, self.bg_color);
        }
        if self.highlighted {
            painter.fill_polygon(&corners, ctx.highlight_color);
        }

        let glyph = ctx.resolver.resolve(&self.stitch, self.color);
        glyph.draw(painter, &self.transform);

        if self.selected {
            painter.stroke_polygon(&corners, ctx.selection_color, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_origin_is_bottom_centre() {
        let cell = Cell::new(1, "ch", Size::new(32.0, 16.0)).at(Point::new(50.0, 50.0));
        assert_eq!(cell.transform.origin, Point::new(16.0, 16.0));
        assert_eq!(cell.bounds(), Bounds::new(34.0, 34.0, 66.0, 50.0));
    }

    #[test]
    fn test_rotation_pivots_on_position() {
        let mut cell = Cell::new(1, "ch", Size::new(32.0, 32.0)).at(Point::new(50.0, 50.0));
        cell.set_rotation(90.0);
        assert_eq!(cell.pos(), Point::new(50.0, 50.0));
        // Glyph now extends to the right of the anchor.
        let b = cell.bounds();
        assert!((b.min_x - 50.0).abs() < 1e-9);
        assert!((b.max_x - 82.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_respects_rotation() {
        let mut cell = Cell::new(1, "ch", Size::new(32.0, 8.0)).at(Point::new(0.0, 0.0));
        assert!(cell.contains_point(Point::new(-6.0, -4.0), 0.0));
        cell.set_rotation(90.0);
        assert!(!cell.contains_point(Point::new(-6.0, -4.0), 0.0));
        assert!(cell.contains_point(Point::new(4.0, 0.0), 0.0));
    }

    #[test]
    fn test_toggle_alternate_color_only_for_defaults() {
        let primary = Color::BLACK;
        let alternate = Color::rgb(255, 0, 0);
        let mut cell = Cell::new(1, "dc", Size::new(32.0, 32.0));

        assert_eq!(cell.toggle_alternate_color(primary, alternate), Some(primary));
        assert_eq!(cell.color, alternate);
        cell.toggle_alternate_color(primary, alternate);
        assert_eq!(cell.color, primary);

        cell.color = Color::rgb(0, 0, 255);
        assert_eq!(cell.toggle_alternate_color(primary, alternate), None);
    }

    #[test]
    fn test_set_stitch_reports_change() {
        let mut cell = Cell::new(1, "ch", Size::new(32.0, 32.0));
        assert_eq!(cell.set_stitch("ch", Size::new(32.0, 32.0)), None);
        assert_eq!(
            cell.set_stitch("dc", Size::new(32.0, 64.0)),
            Some("ch".to_string())
        );
        assert_eq!(cell.transform.origin, Point::new(16.0, 64.0));
    }
}
