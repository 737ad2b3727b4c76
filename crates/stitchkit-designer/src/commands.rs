//! Reversible edits recorded in the undo history.
//!
//! Every command stores full before/after state rather than deltas, so
//! `apply` followed by `undo` returns the scene to exactly where it was.

use stitchkit_core::ItemId;

use crate::grid::Grid;
use crate::model::{SceneItem, SelectionGroup};
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum DesignerCommand {
    AddItems(ItemsChange),
    RemoveItems(ItemsChange),
    ChangeItems(ChangeItems),
    GridChange(GridChange),
    Group(GroupChange),
    Ungroup(GroupChange),
    Composite(CompositeCommand),
}

/// Items entering or leaving the scene, with their paint-order slots.
///
/// The grid snapshots are optional; when present they are restored
/// alongside the items.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsChange {
    pub items: Vec<(usize, SceneItem)>,
    pub grid_before: Option<Grid>,
    pub grid_after: Option<Grid>,
}

impl ItemsChange {
    pub fn new(items: Vec<(usize, SceneItem)>) -> Self {
        Self {
            items,
            grid_before: None,
            grid_after: None,
        }
    }

    pub fn with_grid(mut self, before: Grid, after: Grid) -> Self {
        self.grid_before = Some(before);
        self.grid_after = Some(after);
        self
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|(_, item)| item.id()).collect()
    }

    fn insert(&self, scene: &mut Scene, grid: Option<&Grid>) {
        scene.restore_items(self.items.clone());
        for (_, item) in &self.items {
            if matches!(item, SceneItem::Group(_)) {
                scene.refresh_subtree(item.id());
            }
        }
        if let Some(grid) = grid {
            scene.grid_mut().restore(grid.clone());
        }
    }

    fn take(&self, scene: &mut Scene, grid: Option<&Grid>) {
        scene.take_items(&self.ids());
        if let Some(grid) = grid {
            scene.grid_mut().restore(grid.clone());
        }
    }
}

/// Property changes to existing items.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeItems {
    pub before: Vec<SceneItem>,
    pub after: Vec<SceneItem>,
}

impl ChangeItems {
    pub fn new(before: Vec<SceneItem>, after: Vec<SceneItem>) -> Self {
        Self { before, after }
    }

    /// True when no item actually changed.
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }

    fn write(scene: &mut Scene, states: &[SceneItem]) {
        for item in states {
            scene.replace_item(item.clone(), true);
        }
        for item in states {
            scene.refresh_ancestors(item.id());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridChange {
    pub before: Grid,
    pub after: Grid,
}

/// A root group being created or dissolved.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupChange {
    pub group: SelectionGroup,
    pub draw_index: usize,
}

impl GroupChange {
    fn attach(&self, scene: &mut Scene) {
        let mut group = self.group.clone();
        group.selected = false;
        scene.attach_group(group, Some(self.draw_index));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeCommand {
    pub commands: Vec<DesignerCommand>,
    pub name: String,
}

impl CompositeCommand {
    pub fn new(name: impl Into<String>, commands: Vec<DesignerCommand>) -> Self {
        Self {
            commands,
            name: name.into(),
        }
    }
}

impl DesignerCommand {
    pub fn apply(&self, scene: &mut Scene) {
        match self {
            DesignerCommand::AddItems(cmd) => cmd.insert(scene, cmd.grid_after.as_ref()),
            DesignerCommand::RemoveItems(cmd) => cmd.take(scene, cmd.grid_after.as_ref()),
            DesignerCommand::ChangeItems(cmd) => ChangeItems::write(scene, &cmd.after),
            DesignerCommand::GridChange(cmd) => scene.grid_mut().restore(cmd.after.clone()),
            DesignerCommand::Group(cmd) => cmd.attach(scene),
            DesignerCommand::Ungroup(cmd) => {
                scene.ungroup(cmd.group.id);
            }
            DesignerCommand::Composite(cmd) => {
                for sub in &cmd.commands {
                    sub.apply(scene);
                }
            }
        }
    }

    pub fn undo(&self, scene: &mut Scene) {
        match self {
            DesignerCommand::AddItems(cmd) => cmd.take(scene, cmd.grid_before.as_ref()),
            DesignerCommand::RemoveItems(cmd) => cmd.insert(scene, cmd.grid_before.as_ref()),
            DesignerCommand::ChangeItems(cmd) => ChangeItems::write(scene, &cmd.before),
            DesignerCommand::GridChange(cmd) => scene.grid_mut().restore(cmd.before.clone()),
            DesignerCommand::Group(cmd) => {
                scene.ungroup(cmd.group.id);
            }
            DesignerCommand::Ungroup(cmd) => cmd.attach(scene),
            DesignerCommand::Composite(cmd) => {
                for sub in cmd.commands.iter().rev() {
                    sub.undo(scene);
                }
            }
        }
    }

    /// Human readable name shown in undo/redo menus.
    pub fn name(&self) -> &str {
        match self {
            DesignerCommand::AddItems(_) => "Add Items",
            DesignerCommand::RemoveItems(_) => "Remove Items",
            DesignerCommand::ChangeItems(_) => "Change Items",
            DesignerCommand::GridChange(_) => "Change Rows",
            DesignerCommand::Group(_) => "Group",
            DesignerCommand::Ungroup(_) => "Ungroup",
            DesignerCommand::Composite(cmd) => &cmd.name,
        }
    }

    /// Wraps commands under a user-visible name.
    pub fn composite(name: &str, commands: Vec<DesignerCommand>) -> DesignerCommand {
        DesignerCommand::Composite(CompositeCommand::new(name, commands))
    }
}
