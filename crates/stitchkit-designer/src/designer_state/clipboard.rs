//! Copy, cut, paste and delete.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use stitchkit_core::{Error, ItemId, Result};

use super::ChartState;
use crate::commands::{DesignerCommand, ItemsChange};
use crate::model::{SceneItem, SceneShape};

/// Clipboard payload: copied roots and everything inside them, in paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipboardItems {
    pub items: Vec<SceneItem>,
}

impl ClipboardItems {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let items: Self = serde_json::from_str(json)?;
        let ids: HashSet<ItemId> = items.items.iter().map(SceneItem::id).collect();
        if ids.len() != items.items.len() {
            return Err(Error::other("clipboard contains duplicate item ids"));
        }
        Ok(items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ChartState {
    /// Copies the selection. Returns false when nothing is selected.
    pub fn copy(&mut self) -> bool {
        let roots = self.scene.selected_ids();
        if roots.is_empty() {
            return false;
        }
        let wanted: HashSet<ItemId> = roots
            .iter()
            .flat_map(|id| std::iter::once(*id).chain(self.scene.descendants(*id)))
            .collect();
        let items: Vec<SceneItem> = self
            .scene
            .items()
            .filter(|i| wanted.contains(&i.id()))
            .cloned()
            .collect();

        match (ClipboardItems { items }).to_json() {
            Ok(json) => {
                self.clipboard = Some(json);
                self.paste_count = 0;
                tracing::debug!("Copied {} items", wanted.len());
                true
            }
            Err(e) => {
                tracing::warn!("Failed to copy selection: {}", e);
                false
            }
        }
    }

    /// Copies the selection and deletes it as one undo step.
    pub fn cut(&mut self) -> bool {
        if !self.copy() {
            return false;
        }
        self.delete_with_name("Cut")
    }

    /// Raw clipboard contents, for hosts that share it with the system clipboard.
    pub fn clipboard_json(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn set_clipboard_json(&mut self, json: impl Into<String>) {
        self.clipboard = Some(json.into());
        self.paste_count = 0;
    }

    /// Pastes the clipboard as new free-floating items, offset from the
    /// originals, and selects them. Returns the new root ids.
    pub fn paste(&mut self) -> Vec<ItemId> {
        let Some(json) = self.clipboard.clone() else {
            return Vec::new();
        };
        let clip = match ClipboardItems::from_json(&json) {
            Ok(clip) if !clip.is_empty() => clip,
            Ok(_) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Clipboard cannot be pasted: {}", e);
                return Vec::new();
            }
        };

        self.paste_count += 1;
        let offset = self.defaults().paste_offset() * self.paste_count as f64;

        let remap: HashMap<ItemId, ItemId> = clip
            .items
            .iter()
            .map(|item| (item.id(), self.scene.generate_id()))
            .collect();

        let mut roots = Vec::new();
        for mut item in clip.items {
            let old_id = item.id();
            let Some(new_id) = remap.get(&old_id).copied() else {
                continue;
            };
            item.set_id(new_id);
            item.set_parent(item.parent().and_then(|p| remap.get(&p).copied()));
            item.set_selected(false);
            match &mut item {
                SceneItem::Cell(cell) => {
                    cell.highlighted = false;
                    cell.translate(offset, offset);
                }
                SceneItem::Indicator(indicator) => {
                    indicator.focused = false;
                    indicator.highlighted = false;
                    indicator.translate(offset, offset);
                }
                SceneItem::Group(group) => {
                    group.children = group
                        .children
                        .iter()
                        .filter_map(|c| remap.get(c).copied())
                        .collect();
                }
            }
            if item.parent().is_none() {
                roots.push(new_id);
            }
            self.scene.insert_item(item);
        }
        for id in &roots {
            self.scene.refresh_subtree(*id);
        }

        let ids: Vec<ItemId> = remap.values().copied().collect();
        let added: Vec<(usize, SceneItem)> = ids
            .iter()
            .filter_map(|id| {
                let index = self.scene.items.draw_index(*id)?;
                self.scene.item(*id).cloned().map(|item| (index, item))
            })
            .collect();
        self.record_command(DesignerCommand::composite(
            "Paste",
            vec![DesignerCommand::AddItems(ItemsChange::new(added))],
        ));

        self.scene.select_many(&roots);
        self.emit_selection_changed();
        tracing::debug!("Pasted {} items", ids.len());
        roots
    }

    /// Deletes the selected items. Cells leave the grid; emptied rows go.
    pub fn delete_selected(&mut self) -> bool {
        self.delete_with_name("Delete")
    }

    fn delete_with_name(&mut self, name: &str) -> bool {
        let ids = self.scene.selected_ids();
        let Some(remove) = self.remove_items_command(&ids) else {
            return false;
        };
        let command = match remove {
            DesignerCommand::Composite(mut composite) => {
                composite.name = name.to_string();
                DesignerCommand::Composite(composite)
            }
            other => other,
        };
        self.record_command(command);
        self.emit_selection_changed();
        true
    }
}
