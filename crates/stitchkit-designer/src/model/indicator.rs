use serde::{Deserialize, Serialize};
use stitchkit_core::constants::{INDICATOR_CHAR_WIDTH, INDICATOR_LINE_HEIGHT, INDICATOR_PADDING};
use stitchkit_core::{Color, ItemId};

use super::{normalize_degrees, rotate_point, Bounds, ItemTransform, Point, SceneShape, Size};
use crate::renderer::{PaintContext, Painter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndicatorStyle {
    /// Text over a filled background.
    #[default]
    #[serde(rename = "default")]
    Default,
    /// Filled background with an outline.
    #[serde(rename = "box")]
    Boxed,
    /// Text only.
    #[serde(rename = "none")]
    Plain,
}

impl std::fmt::Display for IndicatorStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Boxed => write!(f, "box"),
            Self::Plain => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for IndicatorStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "box" => Ok(Self::Boxed),
            "none" => Ok(Self::Plain),
            other => Err(format!("Unknown indicator style '{}'", other)),
        }
    }
}

/// Free-floating text annotation. Not part of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: ItemId,
    pub text: String,
    pub text_color: Color,
    pub bg_color: Color,
    #[serde(default)]
    pub style: IndicatorStyle,
    pub transform: ItemTransform,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub parent: Option<ItemId>,
}

impl Indicator {
    pub fn new(id: ItemId, text: impl Into<String>, pos: Point) -> Self {
        Self {
            id,
            text: text.into(),
            text_color: Color::BLACK,
            bg_color: Color::WHITE,
            style: IndicatorStyle::default(),
            transform: ItemTransform {
                pos,
                ..Default::default()
            },
            selected: false,
            focused: false,
            highlighted: false,
            parent: None,
        }
    }

    /// Layout size estimated from the text: widest line by line count.
    pub fn size(&self) -> Size {
        let lines: Vec<&str> = self.text.lines().collect();
        let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(1);
        let rows = lines.len().max(1);
        Size::new(
            columns as f64 * INDICATOR_CHAR_WIDTH + 2.0 * INDICATOR_PADDING,
            rows as f64 * INDICATOR_LINE_HEIGHT + 2.0 * INDICATOR_PADDING,
        )
    }

    pub fn corners(&self) -> [Point; 4] {
        let size = self.size();
        [
            self.transform.map_point(Point::new(0.0, 0.0)),
            self.transform.map_point(Point::new(size.width, 0.0)),
            self.transform.map_point(Point::new(size.width, size.height)),
            self.transform.map_point(Point::new(0.0, size.height)),
        ]
    }
}

impl SceneShape for Indicator {
    fn bounds(&self) -> Bounds {
        self.transform.map_rect(self.size())
    }

    fn contains_point(&self, p: Point, tolerance: f64) -> bool {
        let size = self.size();
        self.transform.inverse_map(p).is_some_and(|local| {
            local.x >= -tolerance
                && local.y >= -tolerance
                && local.x <= size.width + tolerance
                && local.y <= size.height + tolerance
        })
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.pos.x += dx;
        self.transform.pos.y += dy;
    }

    fn rotate(&mut self, degrees: f64, pivot: Point) {
        self.transform.pos = rotate_point(self.transform.pos, pivot, degrees);
        self.transform.rotation = normalize_degrees(self.transform.rotation + degrees);
    }

    fn paint(&self, painter: &mut dyn Painter, ctx: &PaintContext) {
        let corners = self.corners();
        match self.style {
            IndicatorStyle::Default => painter.fill_polygon(&corners, self.bg_color),
            IndicatorStyle::Boxed => {
                painter.fill_polygon(&corners, self.bg_color);
                painter.stroke_polygon(&corners, self.text_color, false);
            }
            IndicatorStyle::Plain => {}
        }
        if self.highlighted || ctx.indicators_highlighted {
            painter.fill_polygon(&corners, ctx.highlight_color);
        }

        for (i, line) in self.text.lines().enumerate() {
            let baseline = Point::new(
                INDICATOR_PADDING,
                INDICATOR_PADDING + (i + 1) as f64 * INDICATOR_LINE_HEIGHT,
            );
            painter.draw_text(line, self.transform.map_point(baseline), self.text_color);
        }

        if self.selected || self.focused {
            painter.stroke_polygon(&corners, ctx.selection_color, true);
        }
    }
}
