//! Chart creation and row operations.

use std::collections::{HashMap, HashSet};

use stitchkit_core::{ChartEvent, Error, ItemId, Result};

use super::ChartState;
use crate::commands::{ChangeItems, DesignerCommand, GridChange, ItemsChange};
use crate::grid::{ChartStyle, GridLayout};
use crate::model::SceneItem;

impl ChartState {
    /// Replaces the chart with `rows` straight rows of `columns` cells.
    pub fn create_rows_chart(&mut self, rows: usize, columns: usize, stitch: &str) -> Result<()> {
        let layout = Self::layout_from(self.defaults(), ChartStyle::Rows);
        self.create_chart(layout, rows, columns, stitch)
    }

    /// Replaces the chart with `rounds` concentric rounds of
    /// `stitches_per_round` cells around the origin.
    pub fn create_rounds_chart(
        &mut self,
        rounds: usize,
        stitches_per_round: usize,
        stitch: &str,
    ) -> Result<()> {
        let layout = Self::layout_from(self.defaults(), ChartStyle::Rounds);
        self.create_chart(layout, rounds, stitches_per_round, stitch)
    }

    /// Replaces the chart with an empty one without a grid.
    pub fn create_blank_chart(&mut self) {
        self.gesture = None;
        self.set_focused_indicator(None);
        self.scene.clear();
        self.scene
            .set_layout(Self::layout_from(self.defaults(), ChartStyle::Blank));
        self.reset_history();
        tracing::info!("Created blank chart");
    }

    fn create_chart(
        &mut self,
        layout: GridLayout,
        rows: usize,
        columns: usize,
        stitch: &str,
    ) -> Result<()> {
        if rows == 0 || columns == 0 {
            return Err(Error::invalid_chart(format!(
                "a chart needs at least one row and one column, got {}x{}",
                rows, columns
            )));
        }
        let stitch = if stitch.is_empty() {
            self.defaults().default_stitch()
        } else {
            stitch.to_string()
        };
        let size = self.stitch_size(&stitch);

        self.gesture = None;
        self.set_focused_indicator(None);
        self.scene.clear();
        self.scene.set_layout(layout);
        let (fg, bg) = (self.edit_color(), self.edit_background());
        for _ in 0..rows {
            let ids: Vec<ItemId> = (0..columns)
                .map(|_| self.scene.add_cell(&stitch, size, fg, bg))
                .collect();
            self.scene.grid_mut().append_row(ids);
        }
        self.scene.update_rows();
        self.reset_history();

        tracing::info!(
            "Created {:?} chart: {} rows x {} columns of '{}'",
            layout.style,
            rows,
            columns,
            stitch
        );
        Ok(())
    }

    /// Inserts a row of `columns` new cells before row `index`
    /// (`index == row_count` appends). Returns the new cell ids.
    pub fn insert_row(&mut self, index: usize, columns: usize) -> Vec<ItemId> {
        let row_count = self.scene.grid().row_count();
        if index > row_count || columns == 0 {
            tracing::warn!(
                "insert_row: cannot insert {} cells at row {} ({} rows)",
                columns,
                index,
                row_count
            );
            return Vec::new();
        }

        let stitch = self.edit_stitch().to_string();
        let size = self.stitch_size(&stitch);
        let (fg, bg) = (self.edit_color(), self.edit_background());
        let grid_before = self.scene.grid().snapshot();

        let ids: Vec<ItemId> = (0..columns)
            .map(|_| self.scene.add_cell(&stitch, size, fg, bg))
            .collect();
        self.scene.grid_mut().insert_row(index, ids.clone());
        let added: Vec<(usize, SceneItem)> = ids
            .iter()
            .filter_map(|id| {
                let index = self.scene.items.draw_index(*id)?;
                self.scene.item(*id).cloned().map(|item| (index, item))
            })
            .collect();
        let add = ItemsChange::new(added).with_grid(grid_before, self.scene.grid().snapshot());

        let mut commands = vec![DesignerCommand::AddItems(add)];
        commands.extend(self.realign());
        self.scene.set_highlighted_row(None);
        self.record_command(DesignerCommand::composite("Insert Row", commands));
        ids
    }

    pub fn insert_row_after(&mut self, row: usize, columns: usize) -> Vec<ItemId> {
        self.insert_row(row + 1, columns)
    }

    /// Deletes row `index` and its cells, closing the gap.
    pub fn remove_row(&mut self, index: usize) -> bool {
        let Some(cells) = self.scene.grid().row(index).map(<[ItemId]>::to_vec) else {
            tracing::warn!("remove_row: no row {}", index);
            return false;
        };
        let Some(remove) = self.remove_items_command(&cells) else {
            return false;
        };
        let mut commands = vec![remove];
        commands.extend(self.realign());
        self.scene.set_highlighted_row(None);
        self.record_command(DesignerCommand::composite("Remove Row", commands));
        true
    }

    pub fn move_row_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.scene.grid().row_count() {
            return false;
        }
        self.move_row(index, index - 1)
    }

    pub fn move_row_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.scene.grid().row_count() {
            return false;
        }
        self.move_row(index, index + 1)
    }

    fn move_row(&mut self, from: usize, to: usize) -> bool {
        let before = self.scene.grid().snapshot();
        self.scene.grid_mut().move_row(from, to);
        let mut commands = vec![DesignerCommand::GridChange(GridChange {
            before,
            after: self.scene.grid().snapshot(),
        })];
        commands.extend(self.realign());
        if self.scene.highlighted_row() == Some(from) {
            self.scene.set_highlighted_row(Some(to));
        }
        self.record_command(DesignerCommand::composite("Move Row", commands));
        true
    }

    /// Turns the selected cells, in reading order, into a new last row.
    pub fn create_row_from_selection(&mut self) -> bool {
        let cells = self.scene.reading_order(&self.scene.selected_cells());
        if cells.is_empty() {
            return false;
        }
        let before = self.scene.grid().snapshot();
        for id in &cells {
            self.scene.grid_mut().remove_cell(*id);
        }
        self.scene.grid_mut().append_row(cells);
        let mut commands = vec![DesignerCommand::GridChange(GridChange {
            before,
            after: self.scene.grid().snapshot(),
        })];
        commands.extend(self.realign());
        self.scene.set_highlighted_row(None);
        self.record_command(DesignerCommand::composite("Create Row", commands));
        true
    }

    /// Highlights a row, selects its cells and announces it.
    pub fn highlight_row(&mut self, row: usize) -> bool {
        let Some(cells) = self.scene.grid().row(row).map(<[ItemId]>::to_vec) else {
            return false;
        };
        self.scene.set_highlighted_row(Some(row));
        self.scene.select_many(&cells);
        self.emit(ChartEvent::RowSelected { row });
        self.emit_selection_changed();
        true
    }

    pub fn clear_row_highlight(&mut self) {
        self.scene.set_highlighted_row(None);
    }

    /// Snaps gridded cells onto their slots. Returns the change, if any cell moved.
    pub(crate) fn realign(&mut self) -> Option<DesignerCommand> {
        let before: HashMap<ItemId, SceneItem> = self
            .scene
            .grid()
            .cells()
            .filter_map(|id| self.scene.item(id).cloned().map(|item| (id, item)))
            .collect();
        let moved = self.scene.update_rows();
        if moved.is_empty() {
            return None;
        }
        let before_states = moved.iter().filter_map(|id| before.get(id).cloned()).collect();
        let after_states = moved
            .iter()
            .filter_map(|id| self.scene.item(*id).cloned())
            .collect();
        Some(DesignerCommand::ChangeItems(ChangeItems::new(
            before_states,
            after_states,
        )))
    }

    /// Removes items and everything inside them, detaching cells from the
    /// grid and dropping groups left empty. Returns the applied change.
    pub(crate) fn remove_items_command(&mut self, ids: &[ItemId]) -> Option<DesignerCommand> {
        let mut doomed: HashSet<ItemId> = HashSet::new();
        for id in ids {
            if self.scene.item(*id).is_some() {
                doomed.insert(*id);
                doomed.extend(self.scene.descendants(*id));
            }
        }
        if doomed.is_empty() {
            return None;
        }

        // Groups left with no surviving children go too, up the hierarchy.
        loop {
            let emptied: Vec<ItemId> = self
                .scene
                .items()
                .filter_map(SceneItem::as_group)
                .filter(|g| !doomed.contains(&g.id))
                .filter(|g| g.children.iter().all(|c| doomed.contains(c)))
                .map(|g| g.id)
                .collect();
            if emptied.is_empty() {
                break;
            }
            doomed.extend(emptied);
        }

        let parents: Vec<ItemId> = self
            .scene
            .items()
            .filter_map(SceneItem::as_group)
            .filter(|g| !doomed.contains(&g.id))
            .filter(|g| g.children.iter().any(|c| doomed.contains(c)))
            .map(|g| g.id)
            .collect();
        let parents_before: Vec<SceneItem> = parents
            .iter()
            .filter_map(|id| self.scene.item(*id).cloned())
            .collect();

        let grid_before = self.scene.grid().snapshot();
        for id in &doomed {
            self.scene.grid_mut().remove_cell(*id);
        }
        for parent in &parents {
            if let Some(group) = self
                .scene
                .item_mut(*parent)
                .and_then(SceneItem::as_group_mut)
            {
                group.children.retain(|c| !doomed.contains(c));
            }
            self.scene.refresh_subtree(*parent);
            self.scene.refresh_ancestors(*parent);
        }
        let parents_after: Vec<SceneItem> = parents
            .iter()
            .filter_map(|id| self.scene.item(*id).cloned())
            .collect();

        let doomed: Vec<ItemId> = doomed.into_iter().collect();
        let taken = self.scene.take_items(&doomed);
        if self.focused_indicator().is_some_and(|f| doomed.contains(&f)) {
            self.set_focused_indicator(None);
        }
        let remove =
            ItemsChange::new(taken).with_grid(grid_before, self.scene.grid().snapshot());

        let mut commands = Vec::new();
        if !parents.is_empty() {
            commands.push(DesignerCommand::ChangeItems(ChangeItems::new(
                parents_before,
                parents_after,
            )));
        }
        commands.push(DesignerCommand::RemoveItems(remove));
        Some(DesignerCommand::composite("Remove Items", commands))
    }

    /// Changes the text of an indicator.
    pub fn set_indicator_text(&mut self, id: ItemId, text: &str) -> bool {
        let before = self.scene.snapshot_items(&[id]);
        let Some(indicator) = self.scene.item_mut(id).and_then(SceneItem::as_indicator_mut) else {
            return false;
        };
        if indicator.text == text {
            return false;
        }
        indicator.text = text.to_string();
        self.scene.refresh_ancestors(id);
        let after = self.scene.snapshot_items(&[id]);
        self.record_command(DesignerCommand::composite(
            "Edit Indicator",
            vec![DesignerCommand::ChangeItems(ChangeItems::new(before, after))],
        ));
        true
    }
}
