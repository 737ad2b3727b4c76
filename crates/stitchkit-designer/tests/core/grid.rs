use std::sync::Arc;

use stitchkit_core::StaticDefaults;
use stitchkit_designer::{ChartState, ChartStyle, GridIndex, Point, StitchLibrary};

fn chart(rows: usize, columns: usize) -> ChartState {
    let mut state = ChartState::new(
        Arc::new(StaticDefaults::new()),
        Arc::new(StitchLibrary::builtin()),
    );
    state.create_rows_chart(rows, columns, "sc").unwrap();
    state
}

#[test]
fn test_create_rows_chart_places_cells_on_slots() {
    let state = chart(3, 4);
    let scene = state.scene();
    assert_eq!(scene.layout().style, ChartStyle::Rows);
    assert_eq!(scene.grid().row_count(), 3);
    assert_eq!(scene.item_count(), 12);
    assert!(!state.can_undo());

    // 32x32 cells, 8 between rows: bottom centre of (2, 3).
    let id = scene.cell_at(2, 3).unwrap();
    assert_eq!(scene.cell(id).unwrap().pos(), Point::new(112.0, 112.0));
}

#[test]
fn test_empty_chart_is_rejected() {
    let mut state = chart(1, 1);
    assert!(state.create_rows_chart(0, 4, "sc").is_err());
    assert!(state.create_rounds_chart(3, 0, "sc").is_err());
    assert_eq!(state.scene().item_count(), 1);
}

#[test]
fn test_cell_at_and_index_of_agree() {
    let state = chart(3, 4);
    let grid = state.scene().grid();
    for row in 0..3 {
        for column in 0..4 {
            let id = grid.cell_at(row, column).unwrap();
            assert_eq!(grid.index_of(id), Some(GridIndex::new(row, column)));
        }
    }
    assert_eq!(grid.cell_at(3, 0), None);
}

#[test]
fn test_remove_middle_row() {
    let mut state = chart(3, 4);
    let last_row: Vec<_> = state.scene().grid().row(2).unwrap().to_vec();

    assert!(state.remove_row(1));
    let scene = state.scene();
    assert_eq!(scene.grid().row_count(), 2);
    assert_eq!(scene.cell_at(2, 0), None);
    assert_eq!(scene.item_count(), 8);
    assert_eq!(scene.grid().row(1).unwrap(), last_row.as_slice());
    // Former row 2 closes the gap.
    let pos = scene.cell(last_row[0]).unwrap().pos();
    assert_eq!(pos, Point::new(16.0, 72.0));
    assert_eq!(state.undo_description(), Some("Remove Row"));
}

#[test]
fn test_remove_row_out_of_range() {
    let mut state = chart(2, 2);
    assert!(!state.remove_row(5));
    assert!(!state.can_undo());
}

#[test]
fn test_insert_row_shifts_later_rows() {
    let mut state = chart(2, 3);
    let old_first = state.scene().cell_at(0, 0).unwrap();

    let ids = state.insert_row(0, 5);
    assert_eq!(ids.len(), 5);
    let scene = state.scene();
    assert_eq!(scene.grid().row_count(), 3);
    assert_eq!(scene.grid().column_count(0), 5);
    assert_eq!(scene.cell_at(1, 0), Some(old_first));
    assert_eq!(scene.cell(old_first).unwrap().pos(), Point::new(16.0, 72.0));
}

#[test]
fn test_insert_row_after_appends() {
    let mut state = chart(2, 3);
    let ids = state.insert_row_after(1, 2);
    assert_eq!(state.scene().grid().row(2).unwrap(), ids.as_slice());
    assert!(state.insert_row(9, 2).is_empty());
}

#[test]
fn test_move_row_up_and_down() {
    let mut state = chart(3, 2);
    let row0 = state.scene().grid().row(0).unwrap().to_vec();

    assert!(!state.move_row_up(0));
    assert!(state.move_row_down(0));
    assert_eq!(state.scene().grid().row(1).unwrap(), row0.as_slice());
    assert!(state.move_row_up(1));
    assert_eq!(state.scene().grid().row(0).unwrap(), row0.as_slice());
    assert!(!state.move_row_down(2));
}

#[test]
fn test_highlight_row_selects_its_cells() {
    let mut state = chart(3, 4);
    assert!(state.highlight_row(1));
    let row: Vec<_> = state.scene().grid().row(1).unwrap().to_vec();
    assert_eq!(state.selected_ids(), row);
    assert!(row
        .iter()
        .all(|id| state.scene().cell(*id).unwrap().highlighted));
    assert!(!state.highlight_row(7));
}

#[test]
fn test_create_row_from_selection() {
    let mut state = chart(2, 3);
    let a = state.scene().cell_at(0, 2).unwrap();
    let b = state.scene().cell_at(1, 0).unwrap();
    state.select(a, false);
    state.select(b, true);

    assert!(state.create_row_from_selection());
    let grid = state.scene().grid();
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.row(2).unwrap(), &[a, b]);
    assert_eq!(grid.column_count(0), 2);
}

#[test]
fn test_rounds_chart_uses_rings() {
    let mut state = ChartState::new(
        Arc::new(StaticDefaults::new()),
        Arc::new(StitchLibrary::builtin()),
    );
    state.create_rounds_chart(2, 6, "dc").unwrap();
    let scene = state.scene();
    assert_eq!(scene.layout().style, ChartStyle::Rounds);

    let pitch = scene.layout().row_pitch();
    let inner = scene.cell(scene.cell_at(0, 0).unwrap()).unwrap();
    let outer = scene.cell(scene.cell_at(1, 3).unwrap()).unwrap();
    assert!((inner.pos().distance_to(&Point::default()) - pitch).abs() < 1e-9);
    assert!((outer.pos().distance_to(&Point::default()) - 2.0 * pitch).abs() < 1e-9);
}
