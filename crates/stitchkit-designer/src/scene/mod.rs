//! Chart scene: item ownership, grid membership, and geometry queries.

mod operations;
mod types;

pub use types::{
    GridArrangement, HorizontalAlignment, HorizontalDistribution, ItemDelta, MirrorDirection,
    VerticalAlignment, VerticalDistribution,
};

use std::collections::HashSet;

use stitchkit_core::constants::HIT_TOLERANCE;
use stitchkit_core::{Color, ItemId};

use crate::grid::{Grid, GridIndex, GridLayout};
use crate::item_store::ItemStore;
use crate::model::{Bounds, Cell, Indicator, Point, SceneItem, SceneShape, Size};
use crate::selection_manager::{root_of, SelectionManager};

/// Everything placed on one chart.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub(crate) items: ItemStore,
    pub(crate) selection: SelectionManager,
    grid: Grid,
    layout: GridLayout,
    highlighted_row: Option<usize>,
    show_chart_center: bool,
    rubber_band: Option<Bounds>,
}

impl Scene {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            items: ItemStore::new(),
            selection: SelectionManager::new(),
            grid: Grid::new(),
            layout,
            highlighted_row: None,
            show_chart_center: true,
            rubber_band: None,
        }
    }

    /// Removes every item and row.
    pub fn clear(&mut self) {
        self.items.clear();
        self.grid.clear();
        self.selection = SelectionManager::new();
        self.highlighted_row = None;
        self.rubber_band = None;
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: GridLayout) {
        self.layout = layout;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn item(&self, id: ItemId) -> Option<&SceneItem> {
        self.items.get(id)
    }

    pub fn cell(&self, id: ItemId) -> Option<&Cell> {
        self.items.get(id).and_then(SceneItem::as_cell)
    }

    pub fn indicator(&self, id: ItemId) -> Option<&Indicator> {
        self.items.get(id).and_then(SceneItem::as_indicator)
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut SceneItem> {
        self.items.get_mut(id)
    }

    /// Items bottom to top.
    pub fn items(&self) -> impl DoubleEndedIterator<Item = &SceneItem> + '_ {
        self.items.iter()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Items not contained in a group, bottom to top.
    pub fn roots(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|i| i.parent().is_none())
            .map(|i| i.id())
            .collect()
    }

    pub fn generate_id(&mut self) -> ItemId {
        self.items.generate_id()
    }

    /// Adds a free-floating cell on top of the paint order.
    pub fn add_cell(&mut self, stitch: &str, size: Size, color: Color, bg_color: Color) -> ItemId {
        let id = self.items.generate_id();
        let cell = Cell::new(id, stitch, size).with_colors(color, bg_color);
        self.items.insert(SceneItem::Cell(cell));
        id
    }

    pub fn add_indicator(&mut self, text: &str, pos: Point) -> ItemId {
        let id = self.items.generate_id();
        self.items
            .insert(SceneItem::Indicator(Indicator::new(id, text, pos)));
        id
    }

    /// Inserts an item as-is (its id is kept and reserved).
    pub fn insert_item(&mut self, item: SceneItem) {
        self.items.insert(item);
    }

    /// Replaces the stored state of an existing item.
    pub(crate) fn replace_item(&mut self, item: SceneItem, keep_selection: bool) {
        let Some(slot) = self.items.get_mut(item.id()) else {
            tracing::warn!("replace_item: item {} is not in the scene", item.id());
            return;
        };
        let selected = slot.is_selected();
        *slot = item;
        if keep_selection {
            slot.set_selected(selected);
        }
    }

    /// Removes items, returning each with its paint-order index, lowest index first.
    pub(crate) fn take_items(&mut self, ids: &[ItemId]) -> Vec<(usize, SceneItem)> {
        let mut indexed: Vec<(usize, ItemId)> = ids
            .iter()
            .filter_map(|id| self.items.draw_index(*id).map(|i| (i, *id)))
            .collect();
        indexed.sort_unstable();
        indexed.dedup();
        let taken: Vec<(usize, SceneItem)> = indexed
            .iter()
            .filter_map(|(index, id)| self.items.remove(*id).map(|item| (*index, item)))
            .collect();
        self.selection.prune(&self.items);
        taken
    }

    /// Re-inserts items taken by [`Scene::take_items`], lowest index first.
    pub(crate) fn restore_items(&mut self, mut items: Vec<(usize, SceneItem)>) {
        items.sort_by_key(|(index, _)| *index);
        for (index, item) in items {
            self.items.insert_at(index, item);
        }
    }

    // ---- hierarchy ----

    pub fn root_of(&self, id: ItemId) -> Option<ItemId> {
        root_of(&self.items, id)
    }

    /// Groups containing `id`, innermost first.
    pub fn ancestors(&self, id: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut current = self.items.get(id).and_then(SceneItem::parent);
        while let Some(p) = current {
            if out.contains(&p) {
                break;
            }
            out.push(p);
            current = self.items.get(p).and_then(SceneItem::parent);
        }
        out
    }

    /// All items below `id` in the group hierarchy (not including `id`).
    pub fn descendants(&self, id: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(group) = self.items.get(current).and_then(SceneItem::as_group) {
                for child in &group.children {
                    out.push(*child);
                    stack.push(*child);
                }
            }
        }
        out
    }

    /// Non-group items at or below `id`.
    pub fn leaves(&self, id: ItemId) -> Vec<ItemId> {
        match self.items.get(id) {
            Some(SceneItem::Group(group)) => group
                .children
                .iter()
                .flat_map(|child| self.leaves(*child))
                .collect(),
            Some(_) => vec![id],
            None => Vec::new(),
        }
    }

    /// Clones of the given items plus everything they contain and every
    /// group containing them. Used to capture before/after states.
    pub fn snapshot_items(&self, ids: &[ItemId]) -> Vec<SceneItem> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for id in ids {
            let related = std::iter::once(*id)
                .chain(self.descendants(*id))
                .chain(self.ancestors(*id));
            for rid in related {
                if seen.insert(rid) {
                    if let Some(item) = self.items.get(rid) {
                        out.push(item.clone());
                    }
                }
            }
        }
        out
    }

    /// Recomputes cached bounds of `id` (if a group) and everything inside it.
    pub(crate) fn refresh_subtree(&mut self, id: ItemId) {
        let children = match self.items.get(id).and_then(SceneItem::as_group) {
            Some(group) => group.children.clone(),
            None => return,
        };
        for child in &children {
            self.refresh_subtree(*child);
        }
        let child_bounds: Vec<Bounds> = children
            .iter()
            .filter_map(|c| self.items.get(*c).map(SceneShape::bounds))
            .collect();
        if let Some(group) = self.items.get_mut(id).and_then(SceneItem::as_group_mut) {
            group.refresh(child_bounds);
        }
    }

    pub(crate) fn refresh_ancestors(&mut self, id: ItemId) {
        for ancestor in self.ancestors(id) {
            let children = match self.items.get(ancestor).and_then(SceneItem::as_group) {
                Some(group) => group.children.clone(),
                None => continue,
            };
            let child_bounds: Vec<Bounds> = children
                .iter()
                .filter_map(|c| self.items.get(*c).map(SceneShape::bounds))
                .collect();
            if let Some(group) = self.items.get_mut(ancestor).and_then(SceneItem::as_group_mut) {
                group.refresh(child_bounds);
            }
        }
    }

    // ---- geometry ----

    pub fn item_bounds(&self, id: ItemId) -> Option<Bounds> {
        self.items.get(id).map(SceneShape::bounds)
    }

    pub fn bounds_of(&self, ids: &[ItemId]) -> Option<Bounds> {
        Bounds::union_all(ids.iter().filter_map(|id| self.item_bounds(*id)))
    }

    /// Union of every item's bounds.
    pub fn scene_rect(&self) -> Option<Bounds> {
        Bounds::union_all(
            self.items
                .iter()
                .filter(|i| i.parent().is_none())
                .map(SceneShape::bounds),
        )
    }

    /// Topmost root item whose geometry contains `point`.
    pub fn topmost_at(&self, point: Point) -> Option<ItemId> {
        self.topmost_leaf_at(point).and_then(|id| self.root_of(id))
    }

    /// Topmost cell or indicator under `point`, ignoring grouping.
    pub fn topmost_leaf_at(&self, point: Point) -> Option<ItemId> {
        self.items
            .iter()
            .rev()
            .filter(|i| !matches!(i, SceneItem::Group(_)))
            .find(|i| i.contains_point(point, HIT_TOLERANCE))
            .map(SceneItem::id)
    }

    /// Moves an item and everything in it.
    pub fn translate_item(&mut self, id: ItemId, dx: f64, dy: f64) {
        for leaf in self.leaves(id) {
            if let Some(item) = self.items.get_mut(leaf) {
                item.translate(dx, dy);
            }
        }
        self.refresh_subtree(id);
        self.refresh_ancestors(id);
    }

    /// Rigidly rotates an item and everything in it about `pivot`.
    pub fn rotate_item(&mut self, id: ItemId, degrees: f64, pivot: Point) {
        for leaf in self.leaves(id) {
            if let Some(item) = self.items.get_mut(leaf) {
                item.rotate(degrees, pivot);
            }
        }
        self.refresh_subtree(id);
        self.refresh_ancestors(id);
    }

    // ---- grid ----

    pub fn grid_index_of(&self, id: ItemId) -> Option<GridIndex> {
        self.grid.index_of(id)
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Option<ItemId> {
        self.grid.cell_at(row, column)
    }

    /// Gridded cell whose nominal slot contains `point`.
    pub fn cell_at_position(&self, point: Point) -> Option<ItemId> {
        let index = self.grid.index_at(point, &self.layout)?;
        self.grid.cell_at(index.row, index.column)
    }

    /// Snaps every gridded cell back onto its slot. Returns the moved ids.
    pub fn update_rows(&mut self) -> Vec<ItemId> {
        let mut moved = Vec::new();
        let placements: Vec<(ItemId, crate::grid::Slot)> = self
            .grid
            .rows()
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                let columns = row.len();
                let layout = self.layout;
                row.iter()
                    .enumerate()
                    .filter_map(move |(c, id)| layout.slot(r, c, columns).map(|s| (*id, s)))
            })
            .collect();

        for (id, slot) in placements {
            if let Some(cell) = self.items.get_mut(id).and_then(SceneItem::as_cell_mut) {
                if cell.pos() != slot.pos || cell.rotation() != slot.rotation {
                    cell.set_pos(slot.pos);
                    cell.set_rotation(slot.rotation);
                    moved.push(id);
                }
            }
        }
        for id in &moved {
            self.refresh_ancestors(*id);
        }
        moved
    }

    pub fn highlighted_row(&self) -> Option<usize> {
        self.highlighted_row
    }

    /// Highlights the cells of one row, clearing any previous highlight.
    pub fn set_highlighted_row(&mut self, row: Option<usize>) {
        for item in self.items.iter_mut() {
            if let Some(cell) = item.as_cell_mut() {
                cell.highlighted = false;
            }
        }
        self.highlighted_row = row.filter(|r| *r < self.grid.row_count());
        if let Some(r) = self.highlighted_row {
            let ids: Vec<ItemId> = self.grid.row(r).map(<[ItemId]>::to_vec).unwrap_or_default();
            for id in ids {
                if let Some(cell) = self.items.get_mut(id).and_then(SceneItem::as_cell_mut) {
                    cell.highlighted = true;
                }
            }
        }
    }

    pub fn show_chart_center(&self) -> bool {
        self.show_chart_center
    }

    pub fn set_show_chart_center(&mut self, show: bool) {
        self.show_chart_center = show;
    }

    pub fn rubber_band(&self) -> Option<Bounds> {
        self.rubber_band
    }

    pub(crate) fn set_rubber_band(&mut self, rect: Option<Bounds>) {
        self.rubber_band = rect;
    }

    // ---- selection ----

    pub fn select(&mut self, id: ItemId, multi: bool) -> Option<ItemId> {
        self.selection.select(&mut self.items, id, multi)
    }

    pub fn select_in_rect(&mut self, rect: Bounds, multi: bool) -> usize {
        self.selection.select_in_rect(&mut self.items, rect, multi)
    }

    /// Replaces the selection with the roots owning `ids`.
    pub fn select_many(&mut self, ids: &[ItemId]) -> usize {
        self.selection.select_many(&mut self.items, ids)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&mut self.items);
    }

    pub fn clear_selection(&mut self) {
        self.selection.deselect_all(&mut self.items);
    }

    /// Selected root items in paint order.
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.selection.selected_roots(&self.items)
    }

    /// Cells inside the selection, including those inside selected groups.
    pub fn selected_cells(&self) -> Vec<ItemId> {
        self.selected_ids()
            .into_iter()
            .flat_map(|id| self.leaves(id))
            .filter(|id| self.cell(*id).is_some())
            .collect()
    }

    pub fn selection_bounds(&self) -> Option<Bounds> {
        self.bounds_of(&self.selected_ids())
    }

    pub fn primary_selection(&self) -> Option<ItemId> {
        self.selection.primary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ChartStyle;

    fn scene_with_cells(n: usize) -> (Scene, Vec<ItemId>) {
        let mut scene = Scene::new(GridLayout::new(ChartStyle::Rows, Size::new(32.0, 32.0), 8.0));
        let ids: Vec<ItemId> = (0..n)
            .map(|_| scene.add_cell("ch", Size::new(32.0, 32.0), Color::BLACK, Color::WHITE))
            .collect();
        (scene, ids)
    }

    #[test]
    fn test_update_rows_places_cells_on_slots() {
        let (mut scene, ids) = scene_with_cells(4);
        scene.grid_mut().append_row(ids[..2].to_vec());
        scene.grid_mut().append_row(ids[2..].to_vec());
        let moved = scene.update_rows();
        assert_eq!(moved.len(), 4);
        assert_eq!(scene.cell(ids[3]).unwrap().pos(), Point::new(48.0, 72.0));
        assert_eq!(scene.cell_at_position(Point::new(40.0, 50.0)), Some(ids[3]));
        assert!(scene.update_rows().is_empty());
    }

    #[test]
    fn test_take_and_restore_items() {
        let (mut scene, ids) = scene_with_cells(3);
        let taken = scene.take_items(&[ids[2], ids[0]]);
        assert_eq!(taken[0].0, 0);
        assert_eq!(scene.item_count(), 1);
        scene.restore_items(taken);
        assert_eq!(scene.roots(), ids);
    }

    #[test]
    fn test_highlight_row() {
        let (mut scene, ids) = scene_with_cells(2);
        scene.grid_mut().append_row(vec![ids[0]]);
        scene.grid_mut().append_row(vec![ids[1]]);
        scene.set_highlighted_row(Some(1));
        assert!(scene.cell(ids[1]).unwrap().highlighted);
        assert!(!scene.cell(ids[0]).unwrap().highlighted);
        scene.set_highlighted_row(Some(7));
        assert_eq!(scene.highlighted_row(), None);
        assert!(!scene.cell(ids[1]).unwrap().highlighted);
    }

    #[test]
    fn test_topmost_hit_prefers_last_painted() {
        let (mut scene, ids) = scene_with_cells(2);
        assert_eq!(scene.topmost_at(Point::new(0.0, -5.0)), Some(ids[1]));
        scene.translate_item(ids[1], 100.0, 0.0);
        assert_eq!(scene.topmost_at(Point::new(0.0, -5.0)), Some(ids[0]));
        assert_eq!(scene.topmost_at(Point::new(50.0, 50.0)), None);
    }
}
