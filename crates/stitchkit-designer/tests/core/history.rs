use std::sync::Arc;

use stitchkit_core::{ChartEvent, Color, EventBus, EventBusConfig, StaticDefaults};
use stitchkit_designer::{ChartState, EditMode, ItemId, Point, PointerEvent, StitchLibrary};

fn chart() -> ChartState {
    let bus = EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    });
    let mut state = ChartState::new(
        Arc::new(StaticDefaults::new()),
        Arc::new(StitchLibrary::builtin()),
    )
    .with_event_bus(Arc::new(bus));
    state.create_rows_chart(3, 4, "sc").unwrap();
    state
}

type CellState = (ItemId, String, Color, Color, Point, f64, f64, f64);

/// Rows plus every cell's stitch, colors and transform.
fn fingerprint(state: &ChartState) -> (Vec<Vec<ItemId>>, Vec<CellState>) {
    let rows = state.scene().grid().rows().to_vec();
    let mut cells: Vec<CellState> = state
        .scene()
        .items()
        .filter_map(|i| i.as_cell())
        .map(|c| {
            (
                c.id,
                c.stitch.clone(),
                c.color,
                c.bg_color,
                c.pos(),
                c.rotation(),
                c.transform.scale_x,
                c.transform.scale_y,
            )
        })
        .collect();
    cells.sort_by_key(|cell| cell.0);
    (rows, cells)
}

fn click(state: &mut ChartState, x: f64, y: f64) {
    state.press(PointerEvent::primary(x, y));
    state.release(PointerEvent::primary(x, y));
}

#[test]
fn test_undo_n_then_redo_n() {
    let mut state = chart();
    let initial = fingerprint(&state);

    state.set_mode(EditMode::ColorPlacement);
    state.set_edit_background(Color::rgb(0, 128, 255));
    click(&mut state, 16.0, 16.0);
    state.set_mode(EditMode::StitchPlacement);
    state.set_edit_stitch("dc");
    click(&mut state, 48.0, 16.0);
    let painted = state.scene().cell_at(0, 0).unwrap();
    assert_eq!(
        state.scene().cell(painted).unwrap().bg_color,
        Color::rgb(0, 128, 255)
    );

    state.remove_row(1);
    state.insert_row(0, 2);
    state.move_row_down(0);
    let cell = state.scene().cell_at(2, 1).unwrap();
    state.select(cell, false);
    state.rotate(45.0);
    let last = fingerprint(&state);
    assert_eq!(state.history().undo_depth(), 6);

    for _ in 0..6 {
        assert!(state.undo());
    }
    assert!(!state.can_undo());
    assert_eq!(fingerprint(&state), initial);

    for _ in 0..6 {
        assert!(state.redo());
    }
    assert!(!state.can_redo());
    assert_eq!(fingerprint(&state), last);
}

#[test]
fn test_undo_restores_removed_cells_in_paint_order() {
    let mut state = chart();
    let order: Vec<ItemId> = state.scene().items().map(|i| i.id()).collect();

    state.remove_row(0);
    state.undo();
    let restored: Vec<ItemId> = state.scene().items().map(|i| i.id()).collect();
    assert_eq!(restored, order);
}

#[test]
fn test_new_command_clears_redo() {
    let mut state = chart();
    state.remove_row(0);
    state.undo();
    assert!(state.can_redo());
    assert_eq!(state.redo_description(), Some("Remove Row"));

    state.insert_row(0, 1);
    assert!(!state.can_redo());
}

#[test]
fn test_history_events_follow_availability() {
    let mut state = chart();
    state.events().clear_history();

    state.remove_row(2);
    state.undo();
    let history: Vec<ChartEvent> = state
        .events()
        .history()
        .into_iter()
        .filter(|e| matches!(e, ChartEvent::HistoryChanged { .. }))
        .collect();
    assert_eq!(
        history,
        vec![
            ChartEvent::HistoryChanged {
                can_undo: true,
                can_redo: false
            },
            ChartEvent::HistoryChanged {
                can_undo: false,
                can_redo: true
            },
        ]
    );
}

#[test]
fn test_undo_limit_from_defaults() {
    let defaults = StaticDefaults::new().with("undo_limit", "2");
    let mut state = ChartState::new(Arc::new(defaults), Arc::new(StitchLibrary::builtin()));
    state.create_rows_chart(4, 1, "sc").unwrap();

    state.remove_row(0);
    state.remove_row(0);
    state.remove_row(0);
    assert_eq!(state.history().undo_depth(), 2);
    assert!(state.undo());
    assert!(state.undo());
    assert!(!state.undo());
    assert_eq!(state.scene().grid().row_count(), 3);
}
