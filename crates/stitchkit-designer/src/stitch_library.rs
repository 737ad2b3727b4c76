//! Stitch catalog and glyph lookup.
//!
//! Stitches live in named sets. The master list maps each stitch name to the
//! set entry currently used for it; lookups go through the master list first.
//! Unknown names resolve to the default stitch so a cell always has a glyph.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stitchkit_core::constants::{DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH, DEFAULT_STITCH};
use stitchkit_core::Color;
use thiserror::Error;

use crate::model::{ItemTransform, Point, Size};
use crate::renderer::Painter;

const BUILTIN_SET: &str = "Built-in";
const GLYPH_STROKE_WIDTH: f64 = 2.0;

/// Drawable glyph with a fixed local size.
pub trait Renderable: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;
    fn size(&self) -> Size;
    /// Draws in local coordinates mapped through `transform`.
    fn draw(&self, painter: &mut dyn Painter, transform: &ItemTransform);
}

/// Maps stitch names to glyphs.
pub trait StitchResolver: Send + Sync {
    /// Glyph for `stitch` drawn in `color`. Never fails: unknown names
    /// resolve to the default stitch.
    fn resolve(&self, stitch: &str, color: Color) -> Arc<dyn Renderable>;

    fn contains(&self, stitch: &str) -> bool;
}

#[derive(Debug, Error, PartialEq)]
pub enum LibraryError {
    #[error("Stitch set '{0}' already exists")]
    DuplicateSet(String),
    #[error("Unknown stitch set '{0}'")]
    UnknownSet(String),
    #[error("Stitch '{stitch}' is not in set '{set}'")]
    UnknownStitch { set: String, stitch: String },
    #[error("The built-in stitch set cannot be removed")]
    BuiltInSet,
}

/// A stitch definition: name, metadata, and a simple vector glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stitch {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_is_svg")]
    pub is_svg: bool,
    /// Line segments in local coordinates.
    #[serde(default)]
    pub strokes: Vec<(Point, Point)>,
}

fn default_is_svg() -> bool {
    true
}

impl Stitch {
    pub fn new(name: impl Into<String>, category: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: category.into(),
            width,
            height,
            is_svg: true,
            strokes: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_strokes(mut self, strokes: Vec<(Point, Point)>) -> Self {
        self.strokes = strokes;
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A stitch bound to a glyph color.
#[derive(Debug, Clone)]
pub struct ColoredStitch {
    stitch: Arc<Stitch>,
    color: Color,
}

impl ColoredStitch {
    pub fn new(stitch: Arc<Stitch>, color: Color) -> Self {
        Self { stitch, color }
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Renderable for ColoredStitch {
    fn name(&self) -> &str {
        &self.stitch.name
    }

    fn size(&self) -> Size {
        self.stitch.size()
    }

    fn draw(&self, painter: &mut dyn Painter, transform: &ItemTransform) {
        if self.stitch.strokes.is_empty() {
            let at = transform.map_point(Point::new(0.0, self.stitch.height / 2.0));
            painter.draw_text(&self.stitch.name, at, self.color);
            return;
        }
        for (from, to) in &self.stitch.strokes {
            painter.draw_line(
                transform.map_point(*from),
                transform.map_point(*to),
                self.color,
                GLYPH_STROKE_WIDTH,
            );
        }
    }
}

/// Named collection of stitches.
#[derive(Debug, Clone, Default)]
pub struct StitchSet {
    pub name: String,
    stitches: Vec<Arc<Stitch>>,
}

impl StitchSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stitches: Vec::new(),
        }
    }

    /// Adds or replaces a stitch by name.
    pub fn add_stitch(&mut self, stitch: Stitch) {
        let stitch = Arc::new(stitch);
        match self.stitches.iter_mut().find(|s| s.name == stitch.name) {
            Some(slot) => *slot = stitch,
            None => self.stitches.push(stitch),
        }
    }

    pub fn find_stitch(&self, name: &str) -> Option<Arc<Stitch>> {
        self.stitches.iter().find(|s| s.name == name).cloned()
    }

    pub fn remove_stitch(&mut self, name: &str) -> Option<Arc<Stitch>> {
        let index = self.stitches.iter().position(|s| s.name == name)?;
        Some(self.stitches.remove(index))
    }

    pub fn stitches(&self) -> impl Iterator<Item = &Arc<Stitch>> {
        self.stitches.iter()
    }

    pub fn len(&self) -> usize {
        self.stitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stitches.is_empty()
    }
}

/// In-memory catalog of stitch sets with a master list.
#[derive(Debug, Clone)]
pub struct StitchLibrary {
    sets: Vec<StitchSet>,
    master: BTreeMap<String, (String, Arc<Stitch>)>,
    default_stitch: String,
}

impl Default for StitchLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StitchLibrary {
    /// Empty library with only the built-in set.
    pub fn new(default_stitch: impl Into<String>) -> Self {
        let mut library = Self {
            sets: vec![StitchSet::new(BUILTIN_SET)],
            master: BTreeMap::new(),
            default_stitch: default_stitch.into(),
        };
        library.reset_master_set();
        library
    }

    /// Library seeded with the common crochet stitches.
    pub fn builtin() -> Self {
        let mut library = Self::new(DEFAULT_STITCH);
        if let Some(set) = library.sets.first_mut() {
            for stitch in builtin_stitches() {
                set.add_stitch(stitch);
            }
        }
        library.reset_master_set();
        library
    }

    pub fn default_stitch(&self) -> &str {
        &self.default_stitch
    }

    pub fn set_default_stitch(&mut self, name: impl Into<String>) {
        self.default_stitch = name.into();
    }

    pub fn builtin_set(&self) -> Option<&StitchSet> {
        self.find_stitch_set(BUILTIN_SET)
    }

    pub fn stitch_sets(&self) -> &[StitchSet] {
        &self.sets
    }

    pub fn find_stitch_set(&self, name: &str) -> Option<&StitchSet> {
        self.sets.iter().find(|s| s.name == name)
    }

    pub fn find_stitch_set_mut(&mut self, name: &str) -> Option<&mut StitchSet> {
        self.sets.iter_mut().find(|s| s.name == name)
    }

    /// Looks a stitch up in the master list, then in every set.
    pub fn find_stitch(&self, name: &str) -> Option<Arc<Stitch>> {
        if let Some((_, stitch)) = self.master.get(name) {
            return Some(stitch.clone());
        }
        self.sets.iter().find_map(|set| set.find_stitch(name))
    }

    pub fn create_stitch_set(&mut self, name: &str) -> Result<&mut StitchSet, LibraryError> {
        if self.find_stitch_set(name).is_some() {
            return Err(LibraryError::DuplicateSet(name.to_string()));
        }
        self.sets.push(StitchSet::new(name));
        let index = self.sets.len() - 1;
        Ok(&mut self.sets[index])
    }

    /// Removes a set. Master entries it provided fall back to the built-in
    /// set, or are dropped when the built-in set lacks them.
    pub fn remove_set(&mut self, name: &str) -> Result<StitchSet, LibraryError> {
        if name == BUILTIN_SET {
            return Err(LibraryError::BuiltInSet);
        }
        let index = self
            .sets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| LibraryError::UnknownSet(name.to_string()))?;
        let removed = self.sets.remove(index);

        let affected: Vec<String> = self
            .master
            .iter()
            .filter(|(_, (set, _))| set == name)
            .map(|(stitch, _)| stitch.clone())
            .collect();
        for stitch in affected {
            match self.builtin_set().and_then(|b| b.find_stitch(&stitch)) {
                Some(builtin) => {
                    self.master
                        .insert(stitch, (BUILTIN_SET.to_string(), builtin));
                }
                None => {
                    self.master.remove(&stitch);
                }
            }
        }
        tracing::debug!("Removed stitch set '{}'", name);
        Ok(removed)
    }

    /// Points the master entry for a stitch at the copy in `set`.
    pub fn add_stitch_to_master(&mut self, set: &str, stitch: &str) -> Result<(), LibraryError> {
        let source = self
            .find_stitch_set(set)
            .ok_or_else(|| LibraryError::UnknownSet(set.to_string()))?;
        let found = source
            .find_stitch(stitch)
            .ok_or_else(|| LibraryError::UnknownStitch {
                set: set.to_string(),
                stitch: stitch.to_string(),
            })?;
        self.master
            .insert(stitch.to_string(), (set.to_string(), found));
        Ok(())
    }

    pub fn remove_stitch_from_master(&mut self, stitch: &str) -> bool {
        self.master.remove(stitch).is_some()
    }

    pub fn master_has_stitch(&self, stitch: &str) -> bool {
        self.master.contains_key(stitch)
    }

    /// Rebuilds the master list from the built-in set.
    pub fn reset_master_set(&mut self) {
        self.master.clear();
        if let Some(builtin) = self.sets.iter().find(|s| s.name == BUILTIN_SET) {
            for stitch in builtin.stitches() {
                self.master.insert(
                    stitch.name.clone(),
                    (BUILTIN_SET.to_string(), stitch.clone()),
                );
            }
        }
    }

    pub fn stitch_set_list(&self) -> Vec<String> {
        self.sets.iter().map(|s| s.name.clone()).collect()
    }

    /// Stitch names in the master list, or in every set, sorted.
    pub fn stitch_list(&self, all_sets: bool) -> Vec<String> {
        let mut names: Vec<String> = if all_sets {
            self.sets
                .iter()
                .flat_map(|s| s.stitches().map(|st| st.name.clone()))
                .collect()
        } else {
            self.master.keys().cloned().collect()
        };
        names.sort();
        names.dedup();
        names
    }

    pub fn category_list(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .sets
            .iter()
            .flat_map(|s| s.stitches().map(|st| st.category.clone()))
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    fn fallback(&self) -> Arc<Stitch> {
        self.find_stitch(&self.default_stitch).unwrap_or_else(|| {
            tracing::warn!(
                "Default stitch '{}' is missing from the library",
                self.default_stitch
            );
            Arc::new(Stitch::new(
                self.default_stitch.clone(),
                "",
                DEFAULT_CELL_WIDTH,
                DEFAULT_CELL_HEIGHT,
            ))
        })
    }
}

impl StitchResolver for StitchLibrary {
    fn resolve(&self, stitch: &str, color: Color) -> Arc<dyn Renderable> {
        let found = self.find_stitch(stitch).unwrap_or_else(|| {
            tracing::debug!("Unknown stitch '{}', using default", stitch);
            self.fallback()
        });
        Arc::new(ColoredStitch::new(found, color))
    }

    fn contains(&self, stitch: &str) -> bool {
        self.find_stitch(stitch).is_some()
    }
}

fn oval(cx: f64, cy: f64, rx: f64, ry: f64, segments: usize) -> Vec<(Point, Point)> {
    let at = |i: usize| {
        let (sin, cos) = (i as f64 * 360.0 / segments as f64).to_radians().sin_cos();
        Point::new(cx + rx * cos, cy + ry * sin)
    };
    (0..segments).map(|i| (at(i), at(i + 1))).collect()
}

fn post(height: f64, slashes: usize) -> Vec<(Point, Point)> {
    let mut strokes = vec![
        (Point::new(16.0, 0.0), Point::new(16.0, height)),
        (Point::new(6.0, 0.0), Point::new(26.0, 0.0)),
    ];
    for i in 0..slashes {
        let y = height / 2.0 - 6.0 + i as f64 * 8.0;
        strokes.push((Point::new(10.0, y), Point::new(22.0, y - 6.0)));
    }
    strokes
}

fn builtin_stitches() -> Vec<Stitch> {
    vec![
        Stitch::new("ch", "Basic", 32.0, 16.0)
            .with_description("chain")
            .with_strokes(oval(16.0, 8.0, 12.0, 6.0, 12)),
        Stitch::new("sl st", "Basic", 16.0, 16.0)
            .with_description("slip stitch")
            .with_strokes(oval(8.0, 8.0, 4.0, 4.0, 8)),
        Stitch::new("sc", "Basic", 32.0, 32.0)
            .with_description("single crochet")
            .with_strokes(vec![
                (Point::new(6.0, 6.0), Point::new(26.0, 26.0)),
                (Point::new(26.0, 6.0), Point::new(6.0, 26.0)),
            ]),
        Stitch::new("hdc", "Basic", 32.0, 48.0)
            .with_description("half double crochet")
            .with_strokes(post(48.0, 0)),
        Stitch::new("dc", "Basic", 32.0, 64.0)
            .with_description("double crochet")
            .with_strokes(post(64.0, 1)),
        Stitch::new("tr", "Basic", 32.0, 80.0)
            .with_description("treble crochet")
            .with_strokes(post(80.0, 2)),
        Stitch::new("blank", "Spacing", 32.0, 32.0).with_description("empty space"),
    ]
}
