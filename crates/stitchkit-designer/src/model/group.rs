use serde::{Deserialize, Serialize};
use stitchkit_core::ItemId;

use super::{rotate_point, Bounds, Point, SceneShape};
use crate::renderer::{PaintContext, Painter};

/// Aggregate of items moved, rotated and selected as one.
///
/// Children keep absolute scene positions. `bounds` and `origin` are
/// derived from the children and refreshed by the scene whenever a child
/// changes; the group never owns geometry of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionGroup {
    pub id: ItemId,
    pub children: Vec<ItemId>,
    pub origin: Point,
    pub bounds: Bounds,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub parent: Option<ItemId>,
}

impl SelectionGroup {
    pub fn new(id: ItemId, children: Vec<ItemId>) -> Self {
        Self {
            id,
            children,
            origin: Point::default(),
            bounds: Bounds::new(0.0, 0.0, 0.0, 0.0),
            selected: false,
            parent: None,
        }
    }

    /// Recomputes bounds and origin from the children's bounds.
    pub fn refresh(&mut self, child_bounds: impl IntoIterator<Item = Bounds>) {
        if let Some(bounds) = Bounds::union_all(child_bounds) {
            self.bounds = bounds;
            self.origin = bounds.top_left();
        }
    }
}

impl SceneShape for SelectionGroup {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        Bounds::new(
            self.bounds.min_x - tolerance,
            self.bounds.min_y - tolerance,
            self.bounds.max_x + tolerance,
            self.bounds.max_y + tolerance,
        )
        .contains(p)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.bounds = self.bounds.translated(dx, dy);
        self.origin = self.bounds.top_left();
    }

    // Children rotate individually; the scene refreshes bounds afterwards.
    fn rotate(&mut self, degrees: f64, pivot: Point) {
        self.origin = rotate_point(self.origin, pivot, degrees);
    }

    fn paint(&self, painter: &mut dyn Painter, ctx: &PaintContext) {
        if self.selected {
            let b = self.bounds;
            let corners = [
                Point::new(b.min_x, b.min_y),
                Point::new(b.max_x, b.min_y),
                Point::new(b.max_x, b.max_y),
                Point::new(b.min_x, b.max_y),
            ];
            painter.stroke_polygon(&corners, ctx.selection_color, true);
        }
    }
}
