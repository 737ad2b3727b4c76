//! Pointer gesture handling for the edit modes.

use stitchkit_core::constants::MIN_CELL_SCALE;
use stitchkit_core::{ChartEvent, Color, ColorRole, ItemId};

use super::ChartState;
use crate::commands::{ChangeItems, DesignerCommand, GridChange, ItemsChange};
use crate::edit_mode::{EditMode, PointerButton, PointerEvent};
use crate::grid::ChartStyle;
use crate::model::{signed_angle_between, Bounds, Point, SceneItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Press landed on an item; the mode handler owns the gesture.
    Item,
    /// Press landed on empty space.
    RubberBand,
}

/// Working set of one press/move/release sequence.
#[derive(Debug, Clone)]
pub struct Gesture {
    pub kind: GestureKind,
    pub mode: EditMode,
    /// Root item under the press.
    pub target: Option<ItemId>,
    /// Cell or indicator under the press.
    pub leaf: Option<ItemId>,
    /// Roots moved, rotated or scaled by the gesture.
    pub roots: Vec<ItemId>,
    pub press: Point,
    pub last: Point,
    pub moved: bool,
    pub multi: bool,
    /// Press-time states of every item the gesture may touch.
    pub before: Vec<SceneItem>,
    /// Cells painted so far (ColorPlacement).
    pub painted: Vec<ItemId>,
    pub pivot: Point,
    /// Row being dragged (RowEdit).
    pub row: Option<usize>,
}

impl Gesture {
    fn new(kind: GestureKind, mode: EditMode, press: Point, multi: bool) -> Self {
        Self {
            kind,
            mode,
            target: None,
            leaf: None,
            roots: Vec::new(),
            press,
            last: press,
            moved: false,
            multi,
            before: Vec::new(),
            painted: Vec::new(),
            pivot: press,
            row: None,
        }
    }

    /// Rectangle spanned by the press and the last pointer position.
    pub fn band(&self) -> Bounds {
        Bounds::from_corners(self.press, self.last)
    }

    fn before_ids(&self) -> Vec<ItemId> {
        self.before.iter().map(SceneItem::id).collect()
    }
}

impl ChartState {
    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn press(&mut self, event: PointerEvent) {
        if self.gesture.is_some() {
            tracing::warn!("press ignored: a gesture is already active");
            return;
        }
        if event.button != PointerButton::Primary {
            tracing::debug!("press ignored: {:?} button", event.button);
            return;
        }

        let multi = event.modifiers.multi_select();
        let Some(root) = self.scene.topmost_at(event.pos) else {
            tracing::debug!("Rubber band started at ({}, {})", event.pos.x, event.pos.y);
            self.gesture = Some(Gesture::new(
                GestureKind::RubberBand,
                self.mode,
                event.pos,
                multi,
            ));
            return;
        };

        let mut gesture = Gesture::new(GestureKind::Item, self.mode, event.pos, multi);
        gesture.target = Some(root);
        gesture.leaf = self.scene.topmost_leaf_at(event.pos);

        match self.mode {
            EditMode::StitchPlacement
            | EditMode::IndicatorPlacement
            | EditMode::RotationAdjust
            | EditMode::ScaleAdjust => {
                let already = self.scene.item(root).is_some_and(SceneItem::is_selected);
                if multi || !already {
                    self.scene.select(root, multi);
                    self.emit_selection_changed();
                }
                gesture.roots = self.scene.selected_ids();
                gesture.before = self.scene.snapshot_items(&gesture.roots);
                if let Some(bounds) = self.scene.bounds_of(&gesture.roots) {
                    gesture.pivot = bounds.center();
                }
            }
            EditMode::ColorPlacement => {
                if let Some(cell) = gesture.leaf.filter(|id| self.scene.cell(*id).is_some()) {
                    self.paint_background(&mut gesture, cell);
                }
            }
            EditMode::RowEdit => {
                let row = gesture
                    .leaf
                    .and_then(|id| self.scene.grid_index_of(id))
                    .map(|index| index.row);
                if let Some(row) = row {
                    self.highlight_row(row);
                    let cells = self.scene.grid().row(row).map(<[ItemId]>::to_vec);
                    gesture.roots = cells.unwrap_or_default();
                    gesture.before = self.scene.snapshot_items(&gesture.roots);
                    gesture.row = Some(row);
                }
            }
        }

        tracing::debug!("{} gesture on item {}", self.mode, root);
        self.gesture = Some(gesture);
    }

    pub fn pointer_move(&mut self, event: PointerEvent) {
        let Some(mut gesture) = self.gesture.take() else {
            return;
        };
        self.update_gesture(&mut gesture, event.pos);
        self.gesture = Some(gesture);
    }

    pub fn release(&mut self, event: PointerEvent) {
        let Some(mut gesture) = self.gesture.take() else {
            return;
        };
        self.update_gesture(&mut gesture, event.pos);
        match gesture.kind {
            GestureKind::RubberBand => self.finish_rubber_band(gesture),
            GestureKind::Item => self.finish_item_gesture(gesture),
        }
    }

    /// Abandons the active gesture and restores the press-time state.
    pub fn cancel_gesture(&mut self) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        tracing::debug!("Cancelling {:?} gesture", gesture.kind);
        self.restore_before(&gesture);
        self.scene.set_rubber_band(None);
    }

    fn restore_before(&mut self, gesture: &Gesture) {
        for item in &gesture.before {
            self.scene.replace_item(item.clone(), true);
        }
        for item in &gesture.before {
            self.scene.refresh_ancestors(item.id());
        }
    }

    fn update_gesture(&mut self, gesture: &mut Gesture, pos: Point) {
        gesture.last = pos;
        if !gesture.moved && gesture.press.distance_to(&pos) > self.defaults().drag_threshold() {
            gesture.moved = true;
        }

        if gesture.kind == GestureKind::RubberBand {
            if gesture.moved {
                self.scene.set_rubber_band(Some(gesture.band()));
            }
            return;
        }

        if gesture.mode.drags_items() {
            if gesture.moved {
                self.drag_roots(gesture, pos);
            }
            return;
        }

        match gesture.mode {
            EditMode::ColorPlacement => {
                let hit = self
                    .scene
                    .topmost_leaf_at(pos)
                    .filter(|id| self.scene.cell(*id).is_some());
                if let Some(cell) = hit {
                    self.paint_background(gesture, cell);
                }
            }
            EditMode::RotationAdjust => {
                let angle =
                    signed_angle_between(gesture.press - gesture.pivot, pos - gesture.pivot);
                self.restore_before(gesture);
                self.scene
                    .rotate_items(&gesture.roots, angle, gesture.pivot);
            }
            EditMode::ScaleAdjust => {
                let start = gesture.press.distance_to(&gesture.pivot);
                let ratio = if start < f64::EPSILON {
                    1.0
                } else {
                    pos.distance_to(&gesture.pivot) / start
                };
                self.restore_before(gesture);
                self.scale_cells(gesture, ratio);
            }
            _ => {}
        }
    }

    fn drag_roots(&mut self, gesture: &Gesture, pos: Point) {
        self.restore_before(gesture);
        let mut delta = pos - gesture.press;
        if self.defaults().snap_to_grid() && gesture.mode != EditMode::RowEdit {
            let layout = self.scene.layout();
            delta = Point::new(
                snap(delta.x, layout.cell_size.width),
                snap(delta.y, layout.row_pitch()),
            );
        }
        for id in &gesture.roots {
            self.scene.translate_item(*id, delta.x, delta.y);
        }
    }

    fn scale_cells(&mut self, gesture: &Gesture, ratio: f64) {
        let leaves: Vec<ItemId> = gesture
            .roots
            .iter()
            .flat_map(|id| self.scene.leaves(*id))
            .collect();
        for leaf in leaves {
            if let Some(cell) = self.scene.item_mut(leaf).and_then(SceneItem::as_cell_mut) {
                let sx = (cell.transform.scale_x * ratio).max(MIN_CELL_SCALE);
                let sy = (cell.transform.scale_y * ratio).max(MIN_CELL_SCALE);
                cell.set_scale(sx, sy);
            }
            self.scene.refresh_ancestors(leaf);
        }
    }

    fn paint_background(&mut self, gesture: &mut Gesture, cell: ItemId) {
        if gesture.painted.contains(&cell) {
            return;
        }
        let Some(item) = self.scene.item(cell).cloned() else {
            return;
        };
        gesture.before.push(item);
        gesture.painted.push(cell);
        let color = self.edit_background();
        if let Some(c) = self.scene.item_mut(cell).and_then(SceneItem::as_cell_mut) {
            c.bg_color = color;
        }
    }

    fn finish_rubber_band(&mut self, gesture: Gesture) {
        self.scene.set_rubber_band(None);

        if gesture.moved {
            let count = self.scene.select_in_rect(gesture.band(), gesture.multi);
            tracing::debug!("Rubber band selected {} items", count);
            self.emit_selection_changed();
            return;
        }

        // Short band: click on empty space.
        self.scene.clear_selection();
        self.emit_selection_changed();
        match gesture.mode {
            EditMode::StitchPlacement => {
                self.create_cell_at(gesture.last);
            }
            EditMode::IndicatorPlacement => {
                self.create_indicator_at(gesture.last);
            }
            _ => {
                self.set_focused_indicator(None);
            }
        }
    }

    /// Adds a free cell with the edit stitch and colors at `pos`.
    pub fn create_cell_at(&mut self, pos: Point) -> ItemId {
        let stitch = self.edit_stitch().to_string();
        let size = self.stitch_size(&stitch);
        let id = self
            .scene
            .add_cell(&stitch, size, self.edit_color(), self.edit_background());
        if let Some(cell) = self.scene.item_mut(id).and_then(SceneItem::as_cell_mut) {
            cell.set_pos(pos);
        }
        self.record_added(id, "Add Stitch");
        id
    }

    /// Adds an empty indicator at `pos` and gives it focus.
    pub fn create_indicator_at(&mut self, pos: Point) -> ItemId {
        let id = self.scene.add_indicator("", pos);
        self.record_added(id, "Add Indicator");
        self.set_focused_indicator(Some(id));
        id
    }

    fn record_added(&mut self, id: ItemId, name: &str) {
        let index = self.scene.items.draw_index(id).unwrap_or(0);
        let Some(item) = self.scene.item(id).cloned() else {
            return;
        };
        let cmd = DesignerCommand::composite(
            name,
            vec![DesignerCommand::AddItems(ItemsChange::new(vec![(
                index, item,
            )]))],
        );
        self.record_command(cmd);
    }

    fn finish_item_gesture(&mut self, gesture: Gesture) {
        match gesture.mode {
            EditMode::StitchPlacement if !gesture.moved => self.click_cell(&gesture),
            EditMode::IndicatorPlacement if !gesture.moved => {
                let indicator = gesture
                    .leaf
                    .filter(|id| self.scene.indicator(*id).is_some());
                if indicator.is_some() {
                    self.set_focused_indicator(indicator);
                }
            }
            EditMode::ColorPlacement => self.commit_paint(&gesture),
            EditMode::RowEdit if gesture.moved => self.commit_row_drag(&gesture),
            EditMode::RowEdit => {}
            EditMode::StitchPlacement | EditMode::IndicatorPlacement => {
                self.commit_change(&gesture, "Move")
            }
            EditMode::RotationAdjust if gesture.moved => self.commit_change(&gesture, "Rotate"),
            EditMode::ScaleAdjust if gesture.moved => self.commit_change(&gesture, "Scale"),
            EditMode::RotationAdjust | EditMode::ScaleAdjust => {}
        }
    }

    fn commit_change(&mut self, gesture: &Gesture, name: &str) {
        let after = self.scene.snapshot_items(&gesture.before_ids());
        let change = ChangeItems::new(gesture.before.clone(), after);
        if change.is_noop() {
            return;
        }
        self.record_command(DesignerCommand::composite(
            name,
            vec![DesignerCommand::ChangeItems(change)],
        ));
    }

    /// Click without drag in stitch mode: set the edit stitch, or toggle the
    /// alternate color when the cell already has it.
    fn click_cell(&mut self, gesture: &Gesture) {
        let Some(id) = gesture.leaf.filter(|id| self.scene.cell(*id).is_some()) else {
            return;
        };
        let stitch = self.edit_stitch().to_string();
        let size = self.stitch_size(&stitch);
        let (primary, alternate) = (self.defaults().primary_color(), self.defaults().alternate_color());
        let before = self.scene.snapshot_items(&[id]);

        let Some(cell) = self.scene.item_mut(id).and_then(SceneItem::as_cell_mut) else {
            return;
        };
        let event = if cell.stitch != stitch {
            cell.set_stitch(&stitch, size).map(|old| ChartEvent::StitchChanged {
                cell: id,
                old,
                new: stitch.clone(),
            })
        } else {
            let new = alternate_of(cell.color, primary, alternate);
            cell.toggle_alternate_color(primary, alternate)
                .map(|old| ChartEvent::ColorChanged {
                    cell: id,
                    role: ColorRole::Foreground,
                    old: Some(old),
                    new,
                })
        };
        let Some(event) = event else {
            return;
        };
        self.scene.refresh_ancestors(id);

        let after = self.scene.snapshot_items(&[id]);
        let name = match event {
            ChartEvent::StitchChanged { .. } => "Change Stitch",
            _ => "Change Color",
        };
        self.record_command(DesignerCommand::composite(
            name,
            vec![DesignerCommand::ChangeItems(ChangeItems::new(before, after))],
        ));
        self.emit(event);
    }

    fn commit_paint(&mut self, gesture: &Gesture) {
        if gesture.painted.is_empty() {
            return;
        }
        let after: Vec<SceneItem> = gesture
            .painted
            .iter()
            .filter_map(|id| self.scene.item(*id).cloned())
            .collect();
        let change = ChangeItems::new(gesture.before.clone(), after);
        if change.is_noop() {
            return;
        }
        self.record_command(DesignerCommand::composite(
            "Paint Background",
            vec![DesignerCommand::ChangeItems(change)],
        ));

        let new = self.edit_background();
        for item in &gesture.before {
            if let Some(cell) = item.as_cell() {
                if cell.bg_color != new {
                    self.emit(ChartEvent::ColorChanged {
                        cell: cell.id,
                        role: ColorRole::Background,
                        old: Some(cell.bg_color),
                        new,
                    });
                }
            }
        }
    }

    /// Drops a dragged row into the nearest row slot and realigns the chart.
    fn commit_row_drag(&mut self, gesture: &Gesture) {
        let Some(row) = gesture.row else {
            return;
        };
        let target = self.nearest_row(gesture, row);
        self.restore_before(gesture);

        let mut commands = Vec::new();
        if target != row {
            let grid_before = self.scene.grid().snapshot();
            self.scene.grid_mut().move_row(row, target);
            commands.push(DesignerCommand::GridChange(GridChange {
                before: grid_before,
                after: self.scene.grid().snapshot(),
            }));
        }
        if let Some(realign) = self.realign() {
            commands.push(realign);
        }
        if commands.is_empty() {
            return;
        }
        tracing::debug!("Row {} dropped at {}", row, target);
        self.record_command(DesignerCommand::composite("Move Row", commands));
        self.highlight_row(target);
    }

    fn nearest_row(&self, gesture: &Gesture, row: usize) -> usize {
        let last = self.scene.grid().row_count().saturating_sub(1);
        let layout = self.scene.layout();
        let pitch = layout.row_pitch();
        if pitch <= 0.0 {
            return row;
        }
        let target = match layout.style {
            ChartStyle::Rounds => {
                // Rings move by the radial distance the pointer travelled.
                let from = (gesture.press - layout.origin).length();
                let to = (gesture.last - layout.origin).length();
                row as f64 + (to - from) / pitch
            }
            _ => row as f64 + (gesture.last.y - gesture.press.y) / pitch,
        };
        (target.round().max(0.0) as usize).min(last)
    }
}

fn snap(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

fn alternate_of(color: Color, primary: Color, alternate: Color) -> Color {
    if color == primary {
        alternate
    } else {
        primary
    }
}
