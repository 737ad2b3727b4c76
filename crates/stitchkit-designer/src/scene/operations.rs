//! Transform operations for Scene: align, distribute, arrange, mirror,
//! rotate, group and ungroup.

use std::collections::HashSet;

use stitchkit_core::ItemId;

use super::types::*;
use super::Scene;
use crate::model::{Bounds, Point, SceneItem, SelectionGroup};

const EPSILON: f64 = 1e-9;

impl Scene {
    /// Calculates the translation that aligns each item against the
    /// aggregate bounding box of `ids`. Axes are independent.
    /// Items already in place are omitted, so the result is idempotent.
    pub fn alignment_deltas(
        &self,
        ids: &[ItemId],
        vertical: VerticalAlignment,
        horizontal: HorizontalAlignment,
    ) -> Vec<ItemDelta> {
        let Some(total) = self.bounds_of(ids) else {
            return Vec::new();
        };

        let mut deltas = Vec::new();
        for id in ids {
            let Some(b) = self.item_bounds(*id) else {
                continue;
            };
            let dx = match horizontal {
                HorizontalAlignment::None => 0.0,
                HorizontalAlignment::Left => total.min_x - b.min_x,
                HorizontalAlignment::Center => total.center().x - b.center().x,
                HorizontalAlignment::Right => total.max_x - b.max_x,
            };
            let dy = match vertical {
                VerticalAlignment::None => 0.0,
                VerticalAlignment::Top => total.min_y - b.min_y,
                VerticalAlignment::Center => total.center().y - b.center().y,
                VerticalAlignment::Bottom => total.max_y - b.max_y,
            };
            push_delta(&mut deltas, *id, dx, dy);
        }
        deltas
    }

    /// Calculates the translation that spaces the reference edges (or
    /// centres) of `ids` evenly. The first and last items stay put.
    pub fn distribution_deltas(
        &self,
        ids: &[ItemId],
        vertical: VerticalDistribution,
        horizontal: HorizontalDistribution,
    ) -> Vec<ItemDelta> {
        let horizontal_ref = |b: &Bounds| match horizontal {
            HorizontalDistribution::None => None,
            HorizontalDistribution::Left => Some(b.min_x),
            HorizontalDistribution::Center => Some(b.center().x),
            HorizontalDistribution::Right => Some(b.max_x),
        };
        let vertical_ref = |b: &Bounds| match vertical {
            VerticalDistribution::None => None,
            VerticalDistribution::Top => Some(b.min_y),
            VerticalDistribution::Center => Some(b.center().y),
            VerticalDistribution::Bottom => Some(b.max_y),
        };

        let bounds: Vec<(ItemId, Bounds)> = ids
            .iter()
            .filter_map(|id| self.item_bounds(*id).map(|b| (*id, b)))
            .collect();

        let dx = spread(&bounds, horizontal_ref);
        let dy = spread(&bounds, vertical_ref);

        let mut deltas = Vec::new();
        for (id, _) in &bounds {
            let x = dx.iter().find(|(i, _)| i == id).map_or(0.0, |(_, d)| *d);
            let y = dy.iter().find(|(i, _)| i == id).map_or(0.0, |(_, d)| *d);
            push_delta(&mut deltas, *id, x, y);
        }
        deltas
    }

    /// Calculates the translation placing `ids`, in the given order, on a
    /// row-major lattice from the arrangement anchor. Columns wrap; items
    /// beyond `rows * columns` continue on further rows.
    pub fn arrangement_deltas(&self, ids: &[ItemId], arrangement: &GridArrangement) -> Vec<ItemDelta> {
        let columns = arrangement.effective_columns(ids.len());
        let pitch_x = arrangement.cell_size.width + arrangement.spacing.width;
        let pitch_y = arrangement.cell_size.height + arrangement.spacing.height;

        let mut deltas = Vec::new();
        for (i, id) in ids.iter().enumerate() {
            let Some(b) = self.item_bounds(*id) else {
                continue;
            };
            let target = Point::new(
                arrangement.anchor.x + (i % columns) as f64 * pitch_x,
                arrangement.anchor.y + (i / columns) as f64 * pitch_y,
            );
            push_delta(&mut deltas, *id, target.x - b.min_x, target.y - b.min_y);
        }
        deltas
    }

    pub fn apply_deltas(&mut self, deltas: &[ItemDelta]) {
        for d in deltas {
            self.translate_item(d.id, d.dx, d.dy);
        }
    }

    /// Sorts items top to bottom, then left to right, by their bounds.
    pub fn reading_order(&self, ids: &[ItemId]) -> Vec<ItemId> {
        let mut keyed: Vec<(ItemId, Bounds)> = ids
            .iter()
            .filter_map(|id| self.item_bounds(*id).map(|b| (*id, b)))
            .collect();
        keyed.sort_by(|(_, a), (_, b)| {
            a.min_y
                .total_cmp(&b.min_y)
                .then(a.min_x.total_cmp(&b.min_x))
        });
        keyed.into_iter().map(|(id, _)| id).collect()
    }

    /// Reflects the items across the central axis of their combined bounds.
    ///
    /// Item rotation is unchanged. Horizontal mirroring reverses the column
    /// order of the mirrored cells within each row; vertical mirroring
    /// reverses the order of the rows they occupy.
    pub fn mirror(&mut self, ids: &[ItemId], direction: MirrorDirection) {
        let Some(total) = self.bounds_of(ids) else {
            return;
        };
        let axis = total.center();

        for id in ids {
            let Some(b) = self.item_bounds(*id) else {
                continue;
            };
            let c = b.center();
            if direction.is_horizontal() {
                self.translate_item(*id, 2.0 * (axis.x - c.x), 0.0);
            } else {
                self.translate_item(*id, 0.0, 2.0 * (axis.y - c.y));
            }
        }

        let cells: HashSet<ItemId> = ids
            .iter()
            .flat_map(|id| self.leaves(*id))
            .filter(|id| self.grid().contains(*id))
            .collect();
        if cells.is_empty() {
            return;
        }

        if direction.is_horizontal() {
            self.grid_mut().reverse_cells_in_rows(&cells);
        } else {
            let rows: Vec<usize> = cells
                .iter()
                .filter_map(|id| self.grid().index_of(*id).map(|i| i.row))
                .collect();
            self.grid_mut().reverse_rows(&rows);
        }
    }

    /// Rotates items rigidly: positions orbit `pivot` and each item's own
    /// rotation grows by the same angle.
    pub fn rotate_items(&mut self, ids: &[ItemId], degrees: f64, pivot: Point) {
        for id in ids {
            self.rotate_item(*id, degrees, pivot);
        }
    }

    /// Groups root items. Needs at least two distinct roots.
    pub fn group_items(&mut self, ids: &[ItemId]) -> Option<ItemId> {
        let wanted: HashSet<ItemId> = ids.iter().copied().collect();
        let roots: Vec<ItemId> = self
            .items
            .iter()
            .filter(|i| i.parent().is_none() && wanted.contains(&i.id()))
            .map(|i| i.id())
            .collect();
        if roots.len() < 2 {
            tracing::debug!("group_items: need 2 root items, got {}", roots.len());
            return None;
        }

        let group_id = self.items.generate_id();
        let group = SelectionGroup::new(group_id, roots);
        Some(self.attach_group(group, None))
    }

    /// Inserts a group and re-parents its children to it. Returns its id.
    pub(crate) fn attach_group(&mut self, group: SelectionGroup, draw_index: Option<usize>) -> ItemId {
        let id = group.id;
        for child in &group.children {
            if let Some(item) = self.items.get_mut(*child) {
                item.set_parent(Some(id));
                item.set_selected(false);
            }
        }
        let index = draw_index.unwrap_or(self.items.draw_order().len());
        self.items.insert_at(index, SceneItem::Group(group));
        self.refresh_subtree(id);
        id
    }

    /// Dissolves a group. Children keep their scene positions and move to
    /// the group's parent. Returns the former children.
    pub fn ungroup(&mut self, group_id: ItemId) -> Vec<ItemId> {
        let Some(SceneItem::Group(group)) = self.items.get(group_id).cloned() else {
            return Vec::new();
        };

        for child in &group.children {
            if let Some(item) = self.items.get_mut(*child) {
                item.set_parent(group.parent);
            }
        }

        if let Some(outer) = group
            .parent
            .and_then(|p| self.items.get_mut(p))
            .and_then(SceneItem::as_group_mut)
        {
            if let Some(pos) = outer.children.iter().position(|c| *c == group_id) {
                outer.children.remove(pos);
                for (k, child) in group.children.iter().enumerate() {
                    outer.children.insert(pos + k, *child);
                }
            }
        }

        self.items.remove(group_id);
        self.selection.prune(&self.items);
        if let Some(first) = group.children.first() {
            self.refresh_ancestors(*first);
        }
        group.children
    }
}

fn push_delta(deltas: &mut Vec<ItemDelta>, id: ItemId, dx: f64, dy: f64) {
    if dx.abs() > EPSILON || dy.abs() > EPSILON {
        deltas.push(ItemDelta { id, dx, dy });
    }
}

/// Offsets that space the reference values evenly between the extremes.
fn spread(
    bounds: &[(ItemId, Bounds)],
    reference: impl Fn(&Bounds) -> Option<f64>,
) -> Vec<(ItemId, f64)> {
    let mut refs: Vec<(ItemId, f64)> = bounds
        .iter()
        .filter_map(|(id, b)| reference(b).map(|r| (*id, r)))
        .collect();
    if refs.len() < 3 {
        return Vec::new();
    }
    refs.sort_by(|a, b| a.1.total_cmp(&b.1));

    let first = refs[0].1;
    let last = refs[refs.len() - 1].1;
    let step = (last - first) / (refs.len() - 1) as f64;
    refs.iter()
        .enumerate()
        .map(|(i, (id, r))| (*id, first + step * i as f64 - r))
        .collect()
}
