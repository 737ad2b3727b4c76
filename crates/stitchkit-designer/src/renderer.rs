//! Chart renderer.
//!
//! Items paint themselves through the [`Painter`] trait. Two painters are
//! provided: [`DisplayList`] records draw calls (used by tests and by hosts
//! that draw with their own toolkit) and [`PixmapPainter`] rasterizes with
//! tiny-skia into an image buffer.

use image::{Rgb, RgbImage};
use stitchkit_core::Color;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use crate::grid::ChartStyle;
use crate::model::{Bounds, Point, SceneShape};
use crate::scene::Scene;
use crate::stitch_library::StitchResolver;

const VIEW_MARGIN: f64 = 16.0;
const CENTER_MARK: f64 = 8.0;
const TEXT_CHAR_WIDTH: f32 = 6.0;

/// Drawing surface used by scene items.
pub trait Painter {
    fn fill_polygon(&mut self, points: &[Point], color: Color);
    fn stroke_polygon(&mut self, points: &[Point], color: Color, dashed: bool);
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64);
    /// Draws a text run with its baseline starting at `at`.
    fn draw_text(&mut self, text: &str, at: Point, color: Color);

    fn draw_polyline(&mut self, points: &[Point], color: Color, width: f64) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color, width);
        }
    }
}

/// Shared state for one paint pass.
pub struct PaintContext<'a> {
    pub resolver: &'a dyn StitchResolver,
    pub highlight_color: Color,
    pub selection_color: Color,
    /// Highlight every indicator (set while the indicator tool is active).
    pub indicators_highlighted: bool,
}

impl<'a> PaintContext<'a> {
    pub fn new(resolver: &'a dyn StitchResolver) -> Self {
        Self {
            resolver,
            highlight_color: Color::rgba(255, 235, 59, 96),
            selection_color: Color::rgb(52, 152, 219),
            indicators_highlighted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillPolygon {
        points: Vec<Point>,
        color: Color,
    },
    StrokePolygon {
        points: Vec<Point>,
        color: Color,
        dashed: bool,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    Text {
        text: String,
        at: Point,
        color: Color,
    },
}

/// Painter that records draw calls in order.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Painter for DisplayList {
    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polygon(&mut self, points: &[Point], color: Color, dashed: bool) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            color,
            dashed,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn draw_text(&mut self, text: &str, at: Point, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            color,
        });
    }
}

/// Paints the whole scene bottom to top, then the overlays.
pub fn paint_scene(scene: &Scene, painter: &mut dyn Painter, ctx: &PaintContext) {
    for item in scene.items() {
        item.paint(painter, ctx);
    }

    let layout = scene.layout();
    if let Some(row) = scene.highlighted_row() {
        let columns = scene.grid().column_count(row);
        let guide = layout.row_guide(row, columns);
        painter.draw_polyline(&guide, ctx.highlight_color, 2.0);
    }

    if scene.show_chart_center() && layout.style == ChartStyle::Rounds {
        let c = layout.origin;
        painter.draw_line(
            Point::new(c.x - CENTER_MARK, c.y),
            Point::new(c.x + CENTER_MARK, c.y),
            Color::BLACK,
            1.0,
        );
        painter.draw_line(
            Point::new(c.x, c.y - CENTER_MARK),
            Point::new(c.x, c.y + CENTER_MARK),
            Color::BLACK,
            1.0,
        );
    }

    if let Some(band) = scene.rubber_band() {
        painter.stroke_polygon(&rect_points(&band), ctx.selection_color, true);
    }
}

fn rect_points(b: &Bounds) -> [Point; 4] {
    [
        Point::new(b.min_x, b.min_y),
        Point::new(b.max_x, b.min_y),
        Point::new(b.max_x, b.max_y),
        Point::new(b.min_x, b.max_y),
    ]
}

fn skia_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Rasterizing painter backed by a tiny-skia pixmap.
pub struct PixmapPainter {
    pixmap: Pixmap,
    transform: Transform,
}

impl PixmapPainter {
    /// Pixmap of `width` x `height` showing `view` scaled to fit.
    /// `None` when either dimension is zero.
    pub fn new(width: u32, height: u32, view: Bounds, background: Color) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(skia_color(background));

        let view_w = view.width().max(1.0);
        let view_h = view.height().max(1.0);
        let scale = (width as f64 / view_w).min(height as f64 / view_h) as f32;
        let offset_x = (width as f32 - view_w as f32 * scale) / 2.0;
        let offset_y = (height as f32 - view_h as f32 * scale) / 2.0;
        let transform = Transform::from_scale(scale, scale).post_translate(
            offset_x - view.min_x as f32 * scale,
            offset_y - view.min_y as f32 * scale,
        );
        Some(Self { pixmap, transform })
    }

    fn path(points: &[Point], close: bool) -> Option<tiny_skia::Path> {
        let (first, rest) = points.split_first()?;
        let mut pb = PathBuilder::new();
        pb.move_to(first.x as f32, first.y as f32);
        for p in rest {
            pb.line_to(p.x as f32, p.y as f32);
        }
        if close {
            pb.close();
        }
        pb.finish()
    }

    fn paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(skia_color(color));
        paint.anti_alias = true;
        paint
    }

    fn stroke(&mut self, points: &[Point], close: bool, color: Color, width: f32, dashed: bool) {
        let Some(path) = Self::path(points, close) else {
            return;
        };
        let stroke = Stroke {
            width,
            dash: if dashed {
                StrokeDash::new(vec![4.0, 4.0], 0.0)
            } else {
                None
            },
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &Self::paint(color), &stroke, self.transform, None);
    }

    /// Converts to RGB, compositing over the background already filled.
    pub fn into_image(self) -> RgbImage {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let mut img = RgbImage::new(width, height);
        for (i, px) in self.pixmap.pixels().iter().enumerate() {
            let c = px.demultiply();
            let x = i as u32 % width;
            let y = i as u32 / width;
            img.put_pixel(x, y, Rgb([c.red(), c.green(), c.blue()]));
        }
        img
    }
}

impl Painter for PixmapPainter {
    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if let Some(path) = Self::path(points, true) {
            self.pixmap.fill_path(
                &path,
                &Self::paint(color),
                FillRule::Winding,
                self.transform,
                None,
            );
        }
    }

    fn stroke_polygon(&mut self, points: &[Point], color: Color, dashed: bool) {
        self.stroke(points, true, color, 1.0, dashed);
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.stroke(&[from, to], false, color, width as f32, false);
    }

    /// No font rasterizer is linked; text renders as a baseline bar of the
    /// estimated run width.
    fn draw_text(&mut self, text: &str, at: Point, color: Color) {
        let run = text.chars().count() as f32 * TEXT_CHAR_WIDTH;
        if run <= 0.0 {
            return;
        }
        let end = Point::new(at.x + run as f64, at.y);
        self.stroke(&[at, end], false, color, 2.0, false);
    }
}

/// Renders the scene into an RGB image fitted to its contents.
pub fn render_scene(
    scene: &Scene,
    resolver: &dyn StitchResolver,
    width: u32,
    height: u32,
) -> RgbImage {
    let view = scene
        .scene_rect()
        .map(|b| {
            Bounds::new(
                b.min_x - VIEW_MARGIN,
                b.min_y - VIEW_MARGIN,
                b.max_x + VIEW_MARGIN,
                b.max_y + VIEW_MARGIN,
            )
        })
        .unwrap_or_else(|| Bounds::new(0.0, 0.0, width as f64, height as f64));
    let Some(mut painter) = PixmapPainter::new(width, height, view, Color::WHITE) else {
        return RgbImage::new(width, height);
    };
    let ctx = PaintContext::new(resolver);
    paint_scene(scene, &mut painter, &ctx);
    painter.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridLayout;
    use crate::model::Size;
    use crate::stitch_library::StitchLibrary;

    #[test]
    fn test_selected_cell_gets_dashed_outline() {
        let library = StitchLibrary::builtin();
        let mut scene = Scene::new(GridLayout::default());
        let id = scene.add_cell("sc", Size::new(32.0, 32.0), Color::BLACK, Color::WHITE);
        scene.select(id, false);

        let mut list = DisplayList::new();
        paint_scene(&scene, &mut list, &PaintContext::new(&library));
        assert!(matches!(
            list.commands().last(),
            Some(DrawCommand::StrokePolygon { dashed: true, .. })
        ));
        let lines = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_render_scene_draws_glyph() {
        let library = StitchLibrary::builtin();
        let mut scene = Scene::new(GridLayout::default());
        scene.add_cell("sc", Size::new(32.0, 32.0), Color::BLACK, Color::WHITE);
        let img = render_scene(&scene, &library, 64, 64);
        assert_eq!(img.dimensions(), (64, 64));
        assert!(img.pixels().any(|p| p.0[0] < 128));
    }

    #[test]
    fn test_zero_size_render_is_empty() {
        let library = StitchLibrary::builtin();
        let scene = Scene::new(GridLayout::default());
        let img = render_scene(&scene, &library, 0, 0);
        assert_eq!(img.dimensions(), (0, 0));
    }
}
