use std::sync::Arc;

use stitchkit_core::StaticDefaults;
use stitchkit_designer::{
    ChartState, GridArrangement, HorizontalAlignment, HorizontalDistribution, ItemId,
    MirrorDirection, Point, SceneItem, Size, StitchLibrary, VerticalAlignment,
    VerticalDistribution,
};

fn close(a: Point, b: Point) -> bool {
    a.distance_to(&b) < 1e-6
}

/// Blank chart with free "sc" cells (32x32) at the given positions.
fn free_cells(positions: &[(f64, f64)]) -> (ChartState, Vec<ItemId>) {
    let mut state = ChartState::new(
        Arc::new(StaticDefaults::new()),
        Arc::new(StitchLibrary::builtin()),
    );
    state.set_edit_stitch("sc");
    let ids = positions
        .iter()
        .map(|(x, y)| state.create_cell_at(Point::new(*x, *y)))
        .collect();
    (state, ids)
}

fn select_all_of(state: &mut ChartState, ids: &[ItemId]) {
    state.clear_selection();
    for id in ids {
        state.select(*id, true);
    }
}

#[test]
fn test_align_center_x() {
    let (mut state, ids) = free_cells(&[(16.0, 32.0), (116.0, 80.0)]);
    select_all_of(&mut state, &ids);

    assert!(state.align_selection(VerticalAlignment::None, HorizontalAlignment::Center));
    let scene = state.scene();
    let a = scene.item_bounds(ids[0]).unwrap();
    let b = scene.item_bounds(ids[1]).unwrap();
    assert!((a.center().x - 66.0).abs() < 1e-9);
    assert!((b.center().x - 66.0).abs() < 1e-9);
    // Vertical positions untouched.
    assert_eq!(a.min_y, 0.0);
    assert_eq!(b.min_y, 48.0);

    // Already aligned: nothing to record.
    assert!(!state.align_selection(VerticalAlignment::None, HorizontalAlignment::Center));
}

#[test]
fn test_align_twice_changes_nothing() {
    let (mut state, ids) = free_cells(&[(16.0, 32.0), (116.0, 80.0), (60.0, 140.0)]);
    select_all_of(&mut state, &ids);

    assert!(state.align_selection(VerticalAlignment::Top, HorizontalAlignment::Left));
    let depth = state.history().undo_depth();
    let placed: Vec<Point> = ids
        .iter()
        .map(|id| state.scene().cell(*id).unwrap().pos())
        .collect();
    for id in &ids {
        let b = state.scene().item_bounds(*id).unwrap();
        assert!(b.min_x.abs() < 1e-9 && b.min_y.abs() < 1e-9);
    }

    assert!(!state.align_selection(VerticalAlignment::Top, HorizontalAlignment::Left));
    assert_eq!(state.history().undo_depth(), depth);
    for (id, pos) in ids.iter().zip(&placed) {
        assert!(close(state.scene().cell(*id).unwrap().pos(), *pos));
    }
}

#[test]
fn test_distribute_keeps_endpoints() {
    let (mut state, ids) = free_cells(&[(16.0, 32.0), (26.0, 32.0), (216.0, 32.0)]);
    select_all_of(&mut state, &ids);

    assert!(state.distribute_selection(VerticalDistribution::None, HorizontalDistribution::Left));
    let left = |id: ItemId| state.scene().item_bounds(id).unwrap().min_x;
    assert_eq!(left(ids[0]), 0.0);
    assert_eq!(left(ids[2]), 200.0);
    assert!((left(ids[1]) - 100.0).abs() < 1e-9);
}

#[test]
fn test_rotate_quarter_turn_about_centre() {
    let (mut state, ids) = free_cells(&[(16.0, 32.0), (80.0, 32.0)]);
    select_all_of(&mut state, &ids);

    // Combined bounds are (0,0)-(96,32), centre (48,16).
    assert!(state.rotate(90.0));
    let a = state.scene().cell(ids[0]).unwrap();
    let b = state.scene().cell(ids[1]).unwrap();
    assert!(close(a.pos(), Point::new(32.0, -16.0)));
    assert!(close(b.pos(), Point::new(32.0, 48.0)));
    assert_eq!(a.rotation(), 90.0);
    assert_eq!(b.rotation(), 90.0);

    state.undo();
    assert!(close(state.scene().cell(ids[0]).unwrap().pos(), Point::new(16.0, 32.0)));
    assert_eq!(state.scene().cell(ids[0]).unwrap().rotation(), 0.0);
}

#[test]
fn test_mirror_flips_across_centre() {
    let (mut state, ids) = free_cells(&[(16.0, 32.0), (116.0, 32.0)]);
    select_all_of(&mut state, &ids);

    assert!(state.mirror(MirrorDirection::Left));
    assert_eq!(state.scene().cell(ids[0]).unwrap().pos(), Point::new(116.0, 32.0));
    assert_eq!(state.scene().cell(ids[1]).unwrap().pos(), Point::new(16.0, 32.0));
}

#[test]
fn test_mirror_reverses_grid_columns() {
    let mut state = ChartState::new(
        Arc::new(StaticDefaults::new()),
        Arc::new(StitchLibrary::builtin()),
    );
    state.create_rows_chart(1, 3, "sc").unwrap();
    let row = state.scene().grid().row(0).unwrap().to_vec();
    state.select_all();

    assert!(state.mirror(MirrorDirection::Right));
    let reversed: Vec<ItemId> = row.iter().rev().copied().collect();
    assert_eq!(state.scene().grid().row(0).unwrap(), reversed.as_slice());
    state.undo();
    assert_eq!(state.scene().grid().row(0).unwrap(), row.as_slice());
}

#[test]
fn test_arrange_selection_on_lattice() {
    let (mut state, ids) = free_cells(&[(300.0, 300.0), (16.0, 32.0), (500.0, 32.0)]);
    select_all_of(&mut state, &ids);
    let arrangement = GridArrangement {
        rows: 1,
        columns: 2,
        cell_size: Size::new(32.0, 32.0),
        spacing: Size::new(8.0, 8.0),
        anchor: Point::new(0.0, 0.0),
        use_selection: true,
    };

    assert!(state.arrange_grid(&arrangement));
    // Reading order: the two top cells first, left to right.
    let top_left = |id: ItemId| state.scene().item_bounds(id).unwrap().top_left();
    assert_eq!(top_left(ids[1]), Point::new(0.0, 0.0));
    assert_eq!(top_left(ids[2]), Point::new(40.0, 0.0));
    assert_eq!(top_left(ids[0]), Point::new(0.0, 40.0));
}

#[test]
fn test_group_and_ungroup_round_trip() {
    let (mut state, ids) = free_cells(&[(16.0, 32.0), (80.0, 32.0), (144.0, 32.0)]);
    select_all_of(&mut state, &ids[..2]);

    let inner = state.group_selected().unwrap();
    assert_eq!(state.selected_ids(), vec![inner]);
    assert_eq!(state.scene().item(ids[0]).unwrap().parent(), Some(inner));

    state.select(ids[2], true);
    let outer = state.group_selected().unwrap();
    assert_eq!(state.scene().item(inner).unwrap().parent(), Some(outer));
    assert_eq!(state.scene().roots(), vec![outer]);

    // Picking a nested cell selects the outermost group.
    state.clear_selection();
    assert_eq!(state.select(ids[0], false), Some(outer));

    let released = state.ungroup_selected();
    assert_eq!(released.len(), 2);
    assert!(released.contains(&inner));
    assert!(state.scene().item(outer).is_none());
    assert_eq!(state.scene().item(inner).unwrap().parent(), None);

    state.undo();
    let group = state
        .scene()
        .item(outer)
        .and_then(SceneItem::as_group)
        .unwrap();
    assert!(group.children.contains(&inner));
    assert!(group.children.contains(&ids[2]));

    state.undo();
    state.undo();
    assert!(state.scene().item(inner).is_none());
    assert!(ids.iter().all(|id| state.scene().item(*id).unwrap().parent().is_none()));
}

#[test]
fn test_group_needs_two_items() {
    let (mut state, ids) = free_cells(&[(16.0, 32.0)]);
    state.select(ids[0], false);
    assert_eq!(state.group_selected(), None);
    assert!(state.ungroup_selected().is_empty());
}

#[test]
fn test_rotating_group_keeps_its_centre() {
    let (mut state, ids) = free_cells(&[(16.0, 32.0), (80.0, 32.0)]);
    select_all_of(&mut state, &ids);
    let group = state.group_selected().unwrap();
    let before = state.scene().item_bounds(group).unwrap();

    state.rotate(180.0);
    let after = state.scene().item_bounds(group).unwrap();
    assert!(close(before.center(), after.center()));
    assert!(close(state.scene().cell(ids[0]).unwrap().pos(), Point::new(80.0, 0.0)));
}
