use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use stitchkit_core::ItemId;

use crate::renderer::{PaintContext, Painter};

mod cell;
mod group;
mod indicator;

pub use cell::Cell;
pub use group::SelectionGroup;
pub use indicator::{Indicator, IndicatorStyle};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Angle of the vector in degrees, clockwise from +x in y-down scene space.
    pub fn angle_degrees(&self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in scene coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Smallest rectangle containing every point; `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut b = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Bounds {
        Bounds {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Union of many bounds; `None` when there are none.
    pub fn union_all(bounds: impl IntoIterator<Item = Bounds>) -> Option<Bounds> {
        bounds.into_iter().reduce(|a, b| a.union(&b))
    }
}

/// Rotates `p` about `pivot` by `degrees` (clockwise on screen, y-down).
pub fn rotate_point(p: Point, pivot: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let v = p - pivot;
    Point::new(
        pivot.x + v.x * cos - v.y * sin,
        pivot.y + v.x * sin + v.y * cos,
    )
}

/// Maps an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Signed smallest angle from `from` to `to` in degrees, in `(-180, 180]`.
pub fn signed_angle_between(from: Point, to: Point) -> f64 {
    let delta = to.angle_degrees() - from.angle_degrees();
    let d = normalize_degrees(delta);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Placement of an item's local geometry in the scene.
///
/// `pos` is where the local `origin` lands. Scale is applied first, then
/// rotation, both about the origin, so rotating or scaling never moves `pos`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemTransform {
    pub pos: Point,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub origin: Point,
}

impl Default for ItemTransform {
    fn default() -> Self {
        Self {
            pos: Point::default(),
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            origin: Point::default(),
        }
    }
}

impl ItemTransform {
    pub fn with_origin(origin: Point) -> Self {
        Self {
            origin,
            ..Default::default()
        }
    }

    /// Local coordinates to scene coordinates.
    pub fn map_point(&self, local: Point) -> Point {
        let scaled = Point::new(
            (local.x - self.origin.x) * self.scale_x,
            (local.y - self.origin.y) * self.scale_y,
        );
        rotate_point(scaled, Point::default(), self.rotation) + self.pos
    }

    /// Scene coordinates to local coordinates. `None` for a degenerate scale.
    pub fn inverse_map(&self, scene: Point) -> Option<Point> {
        if self.scale_x.abs() < f64::EPSILON || self.scale_y.abs() < f64::EPSILON {
            return None;
        }
        let unrotated = rotate_point(scene - self.pos, Point::default(), -self.rotation);
        Some(Point::new(
            unrotated.x / self.scale_x + self.origin.x,
            unrotated.y / self.scale_y + self.origin.y,
        ))
    }

    /// Scene-space bounding box of the local rectangle `(0, 0, size)`.
    pub fn map_rect(&self, size: Size) -> Bounds {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(size.width, 0.0),
            Point::new(size.width, size.height),
            Point::new(0.0, size.height),
        ];
        Bounds::from_points(corners.iter().map(|c| self.map_point(*c)))
            .unwrap_or_else(|| Bounds::new(self.pos.x, self.pos.y, self.pos.x, self.pos.y))
    }
}

/// Geometry and painting shared by everything placed on a chart.
pub trait SceneShape {
    fn bounds(&self) -> Bounds;
    fn contains_point(&self, p: Point, tolerance: f64) -> bool;
    fn translate(&mut self, dx: f64, dy: f64);
    /// Rigid rotation about a scene pivot.
    fn rotate(&mut self, degrees: f64, pivot: Point);
    fn paint(&self, painter: &mut dyn Painter, ctx: &PaintContext);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Cell,
    Indicator,
    Group,
}

/// An item owned by the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneItem {
    Cell(Cell),
    Indicator(Indicator),
    Group(SelectionGroup),
}

impl SceneItem {
    pub fn id(&self) -> ItemId {
        match self {
            SceneItem::Cell(c) => c.id,
            SceneItem::Indicator(i) => i.id,
            SceneItem::Group(g) => g.id,
        }
    }

    pub fn set_id(&mut self, id: ItemId) {
        match self {
            SceneItem::Cell(c) => c.id = id,
            SceneItem::Indicator(i) => i.id = id,
            SceneItem::Group(g) => g.id = id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            SceneItem::Cell(_) => ItemKind::Cell,
            SceneItem::Indicator(_) => ItemKind::Indicator,
            SceneItem::Group(_) => ItemKind::Group,
        }
    }

    pub fn parent(&self) -> Option<ItemId> {
        match self {
            SceneItem::Cell(c) => c.parent,
            SceneItem::Indicator(i) => i.parent,
            SceneItem::Group(g) => g.parent,
        }
    }

    pub fn set_parent(&mut self, parent: Option<ItemId>) {
        match self {
            SceneItem::Cell(c) => c.parent = parent,
            SceneItem::Indicator(i) => i.parent = parent,
            SceneItem::Group(g) => g.parent = parent,
        }
    }

    pub fn is_selected(&self) -> bool {
        match self {
            SceneItem::Cell(c) => c.selected,
            SceneItem::Indicator(i) => i.selected,
            SceneItem::Group(g) => g.selected,
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        match self {
            SceneItem::Cell(c) => c.selected = selected,
            SceneItem::Indicator(i) => i.selected = selected,
            SceneItem::Group(g) => g.selected = selected,
        }
    }

    /// Position anchor of the item (group: origin of its bounds).
    pub fn position(&self) -> Point {
        match self {
            SceneItem::Cell(c) => c.transform.pos,
            SceneItem::Indicator(i) => i.transform.pos,
            SceneItem::Group(g) => g.origin,
        }
    }

    pub fn as_cell(&self) -> Option<&Cell> {
        match self {
            SceneItem::Cell(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cell_mut(&mut self) -> Option<&mut Cell> {
        match self {
            SceneItem::Cell(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_indicator(&self) -> Option<&Indicator> {
        match self {
            SceneItem::Indicator(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_indicator_mut(&mut self) -> Option<&mut Indicator> {
        match self {
            SceneItem::Indicator(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&SelectionGroup> {
        match self {
            SceneItem::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut SelectionGroup> {
        match self {
            SceneItem::Group(g) => Some(g),
            _ => None,
        }
    }
}

impl SceneShape for SceneItem {
    fn bounds(&self) -> Bounds {
        match self {
            SceneItem::Cell(s) => s.bounds(),
            SceneItem::Indicator(s) => s.bounds(),
            SceneItem::Group(s) => s.bounds(),
        }
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        match self {
            SceneItem::Cell(s) => s.contains_point(p, tolerance),
            SceneItem::Indicator(s) => s.contains_point(p, tolerance),
            SceneItem::Group(s) => s.contains_point(p, tolerance),
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            SceneItem::Cell(s) => s.translate(dx, dy),
            SceneItem::Indicator(s) => s.translate(dx, dy),
            SceneItem::Group(s) => s.translate(dx, dy),
        }
    }

    fn rotate(&mut self, degrees: f64, pivot: Point) {
        match self {
            SceneItem::Cell(s) => s.rotate(degrees, pivot),
            SceneItem::Indicator(s) => s.rotate(degrees, pivot),
            SceneItem::Group(s) => s.rotate(degrees, pivot),
        }
    }

    fn paint(&self, painter: &mut dyn Painter, ctx: &PaintContext) {
        match self {
            SceneItem::Cell(s) => s.paint(painter, ctx),
            SceneItem::Indicator(s) => s.paint(painter, ctx),
            SceneItem::Group(s) => s.paint(painter, ctx),
        }
    }
}
