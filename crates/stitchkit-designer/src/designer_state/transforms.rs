//! Selection and transform commands on the selected items.

use stitchkit_core::ItemId;

use super::ChartState;
use crate::commands::{ChangeItems, DesignerCommand, GridChange, GroupChange};
use crate::model::{Bounds, SceneItem};
use crate::scene::{
    GridArrangement, HorizontalAlignment, HorizontalDistribution, ItemDelta, MirrorDirection,
    VerticalAlignment, VerticalDistribution,
};

impl ChartState {
    pub fn select(&mut self, id: ItemId, multi: bool) -> Option<ItemId> {
        let root = self.scene.select(id, multi);
        self.emit_selection_changed();
        root
    }

    pub fn select_in_rect(&mut self, rect: Bounds, multi: bool) -> usize {
        let count = self.scene.select_in_rect(rect, multi);
        self.emit_selection_changed();
        count
    }

    pub fn select_all(&mut self) {
        self.scene.select_all();
        self.emit_selection_changed();
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
        self.emit_selection_changed();
    }

    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.scene.selected_ids()
    }

    pub fn align_selection(
        &mut self,
        vertical: VerticalAlignment,
        horizontal: HorizontalAlignment,
    ) -> bool {
        let ids = self.scene.selected_ids();
        let deltas = self.scene.alignment_deltas(&ids, vertical, horizontal);
        self.commit_deltas(&ids, &deltas, "Align")
    }

    pub fn distribute_selection(
        &mut self,
        vertical: VerticalDistribution,
        horizontal: HorizontalDistribution,
    ) -> bool {
        let ids = self.scene.selected_ids();
        let deltas = self.scene.distribution_deltas(&ids, vertical, horizontal);
        self.commit_deltas(&ids, &deltas, "Distribute")
    }

    /// Lays the selection (reading order) or every gridded cell (row order)
    /// out on a lattice.
    pub fn arrange_grid(&mut self, arrangement: &GridArrangement) -> bool {
        let ids = if arrangement.use_selection {
            let selected = self.scene.selected_ids();
            self.scene.reading_order(&selected)
        } else {
            self.scene.grid().cells().collect()
        };
        let deltas = self.scene.arrangement_deltas(&ids, arrangement);
        self.commit_deltas(&ids, &deltas, "Arrange")
    }

    fn commit_deltas(&mut self, ids: &[ItemId], deltas: &[ItemDelta], name: &str) -> bool {
        if deltas.is_empty() {
            return false;
        }
        let before = self.scene.snapshot_items(ids);
        self.scene.apply_deltas(deltas);
        let after = self.scene.snapshot_items(ids);
        self.record_command(DesignerCommand::composite(
            name,
            vec![DesignerCommand::ChangeItems(ChangeItems::new(before, after))],
        ));
        true
    }

    pub fn mirror(&mut self, direction: MirrorDirection) -> bool {
        let ids = self.scene.selected_ids();
        if ids.is_empty() {
            return false;
        }
        let before = self.scene.snapshot_items(&ids);
        let grid_before = self.scene.grid().snapshot();
        self.scene.mirror(&ids, direction);
        let after = self.scene.snapshot_items(&ids);

        let mut commands = Vec::new();
        let change = ChangeItems::new(before, after);
        if !change.is_noop() {
            commands.push(DesignerCommand::ChangeItems(change));
        }
        if self.scene.grid() != &grid_before {
            commands.push(DesignerCommand::GridChange(GridChange {
                before: grid_before,
                after: self.scene.grid().snapshot(),
            }));
        }
        if commands.is_empty() {
            return false;
        }
        self.record_command(DesignerCommand::composite("Mirror", commands));
        true
    }

    /// Rotates the selection rigidly about its centre.
    pub fn rotate(&mut self, degrees: f64) -> bool {
        let ids = self.scene.selected_ids();
        let Some(bounds) = self.scene.bounds_of(&ids) else {
            return false;
        };
        if degrees.abs() < f64::EPSILON {
            return false;
        }
        let before = self.scene.snapshot_items(&ids);
        self.scene.rotate_items(&ids, degrees, bounds.center());
        let after = self.scene.snapshot_items(&ids);
        self.record_command(DesignerCommand::composite(
            "Rotate",
            vec![DesignerCommand::ChangeItems(ChangeItems::new(before, after))],
        ));
        true
    }

    /// Groups the selected roots. Needs at least two.
    pub fn group_selected(&mut self) -> Option<ItemId> {
        let ids = self.scene.selected_ids();
        let group_id = self.scene.group_items(&ids)?;
        let group = self
            .scene
            .item(group_id)
            .and_then(SceneItem::as_group)
            .cloned()?;
        let draw_index = self.scene.items.draw_index(group_id)?;
        self.record_command(DesignerCommand::Group(GroupChange { group, draw_index }));
        self.scene.select(group_id, false);
        self.emit_selection_changed();
        Some(group_id)
    }

    /// Dissolves every selected group, selecting its former children.
    pub fn ungroup_selected(&mut self) -> Vec<ItemId> {
        let groups: Vec<ItemId> = self
            .scene
            .selected_ids()
            .into_iter()
            .filter(|id| matches!(self.scene.item(*id), Some(SceneItem::Group(_))))
            .collect();
        if groups.is_empty() {
            return Vec::new();
        }

        let mut commands = Vec::new();
        let mut released = Vec::new();
        for gid in groups {
            let Some(group) = self.scene.item(gid).and_then(SceneItem::as_group).cloned() else {
                continue;
            };
            let Some(draw_index) = self.scene.items.draw_index(gid) else {
                continue;
            };
            released.extend(self.scene.ungroup(gid));
            commands.push(DesignerCommand::Ungroup(GroupChange { group, draw_index }));
        }
        // Undo re-attaches in reverse, so indices recorded in order stay valid.
        self.record_command(DesignerCommand::composite("Ungroup", commands));
        self.scene.select_many(&released);
        self.emit_selection_changed();
        released
    }
}
