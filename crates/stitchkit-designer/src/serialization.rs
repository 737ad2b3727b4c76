//! Chart document snapshot.
//!
//! A `ChartDocument` captures the scene (items in paint order, rows, and
//! layout) as plain serde data. Files are pretty-printed JSON.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stitchkit_core::{Error, ItemId};

use crate::grid::{Grid, GridLayout};
use crate::model::SceneItem;
use crate::scene::Scene;

const FILE_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDocument {
    pub version: String,
    pub metadata: DocumentMetadata,
    pub layout: GridLayout,
    #[serde(default = "default_show_center")]
    pub show_chart_center: bool,
    /// Grid rows of cell ids, top to bottom (inner to outer for rounds).
    #[serde(default)]
    pub rows: Vec<Vec<ItemId>>,
    /// Every item, bottom of the paint order first.
    #[serde(default)]
    pub items: Vec<SceneItem>,
}

fn default_show_center() -> bool {
    true
}

impl ChartDocument {
    pub fn new(name: impl Into<String>, layout: GridLayout) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DocumentMetadata {
                name: name.into(),
                created: now,
                modified: now,
                author: String::new(),
                description: String::new(),
            },
            layout,
            show_chart_center: true,
            rows: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize chart")?;
        std::fs::write(path.as_ref(), json).with_context(|| {
            format!("Failed to write chart file {}", path.as_ref().display())
        })?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read chart file {}", path.as_ref().display())
        })?;
        let doc: ChartDocument =
            serde_json::from_str(&content).context("Failed to parse chart file")?;
        Ok(doc)
    }
}

impl Scene {
    /// Snapshot of the scene. Selection and highlight flags are cleared.
    pub fn to_document(&self, name: impl Into<String>) -> ChartDocument {
        let mut doc = ChartDocument::new(name, *self.layout());
        doc.show_chart_center = self.show_chart_center();
        doc.rows = self.grid().rows().to_vec();
        doc.items = self
            .items()
            .cloned()
            .map(|mut item| {
                item.set_selected(false);
                match &mut item {
                    SceneItem::Cell(cell) => cell.highlighted = false,
                    SceneItem::Indicator(indicator) => {
                        indicator.highlighted = false;
                        indicator.focused = false;
                    }
                    SceneItem::Group(_) => {}
                }
                item
            })
            .collect();
        doc
    }

    /// Rebuilds a scene, checking that rows and group links reference
    /// existing items.
    pub fn from_document(doc: &ChartDocument) -> Result<Scene, Error> {
        let mut ids = HashSet::new();
        for item in &doc.items {
            if !ids.insert(item.id()) {
                return Err(Error::invalid_chart(format!(
                    "duplicate item id {}",
                    item.id()
                )));
            }
        }

        let cells: HashSet<ItemId> = doc
            .items
            .iter()
            .filter_map(SceneItem::as_cell)
            .map(|c| c.id)
            .collect();
        let mut gridded = HashSet::new();
        for (r, row) in doc.rows.iter().enumerate() {
            if row.is_empty() {
                return Err(Error::invalid_chart(format!("row {} is empty", r)));
            }
            for id in row {
                if !cells.contains(id) {
                    return Err(Error::invalid_chart(format!(
                        "row {} references unknown cell {}",
                        r, id
                    )));
                }
                if !gridded.insert(*id) {
                    return Err(Error::invalid_chart(format!(
                        "cell {} appears in more than one row",
                        id
                    )));
                }
            }
        }

        for item in &doc.items {
            if let Some(parent) = item.parent() {
                let linked = doc
                    .items
                    .iter()
                    .find(|i| i.id() == parent)
                    .and_then(SceneItem::as_group)
                    .is_some_and(|g| g.children.contains(&item.id()));
                if !linked {
                    return Err(Error::invalid_chart(format!(
                        "item {} has a dangling parent {}",
                        item.id(),
                        parent
                    )));
                }
            }
        }

        let mut scene = Scene::new(doc.layout);
        scene.set_show_chart_center(doc.show_chart_center);
        for item in &doc.items {
            scene.insert_item(item.clone());
        }
        *scene.grid_mut() = Grid::from_rows(doc.rows.clone());
        let roots = scene.roots();
        for root in roots {
            scene.refresh_subtree(root);
        }
        Ok(scene)
    }
}
