use std::sync::Arc;

use stitchkit_core::{ChartEvent, Color, ColorRole, EventBus, EventBusConfig, StaticDefaults};
use stitchkit_designer::{ChartState, EditMode, GestureKind, Modifiers, Point, PointerEvent, StitchLibrary};

/// One row of three "sc" cells: cell `c` covers x in [32c, 32c + 32], y in [0, 32].
fn one_row() -> ChartState {
    let bus = EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    });
    let mut state = ChartState::new(
        Arc::new(StaticDefaults::new()),
        Arc::new(StitchLibrary::builtin()),
    )
    .with_event_bus(Arc::new(bus));
    state.create_rows_chart(1, 3, "sc").unwrap();
    state.events().clear_history();
    state
}

fn click(state: &mut ChartState, x: f64, y: f64) {
    state.press(PointerEvent::primary(x, y));
    state.release(PointerEvent::primary(x, y));
}

fn drag(state: &mut ChartState, from: (f64, f64), to: (f64, f64)) {
    state.press(PointerEvent::primary(from.0, from.1));
    state.pointer_move(PointerEvent::primary(to.0, to.1));
    state.release(PointerEvent::primary(to.0, to.1));
}

#[test]
fn test_click_sets_stitch_then_toggles_color() {
    let mut state = one_row();
    let cell = state.scene().cell_at(0, 0).unwrap();
    state.set_edit_stitch("dc");

    click(&mut state, 16.0, 16.0);
    let c = state.scene().cell(cell).unwrap();
    assert_eq!(c.stitch, "dc");
    assert_eq!(c.size.height, 64.0);
    assert_eq!(c.pos(), Point::new(16.0, 32.0));
    assert!(state.events().history().contains(&ChartEvent::StitchChanged {
        cell,
        old: "sc".to_string(),
        new: "dc".to_string(),
    }));

    // Same stitch again: primary becomes alternate.
    click(&mut state, 16.0, 16.0);
    assert_eq!(state.scene().cell(cell).unwrap().color, Color::rgb(255, 0, 0));
    click(&mut state, 16.0, 16.0);
    assert_eq!(state.scene().cell(cell).unwrap().color, Color::BLACK);
    assert_eq!(state.history().undo_depth(), 3);
    assert_eq!(state.undo_description(), Some("Change Color"));
}

#[test]
fn test_drag_moves_selection() {
    let mut state = one_row();
    let cell = state.scene().cell_at(0, 1).unwrap();

    drag(&mut state, (48.0, 16.0), (78.0, 26.0));
    assert_eq!(state.scene().cell(cell).unwrap().pos(), Point::new(78.0, 42.0));
    assert_eq!(state.selected_ids(), vec![cell]);
    assert_eq!(state.undo_description(), Some("Move"));

    state.undo();
    assert_eq!(state.scene().cell(cell).unwrap().pos(), Point::new(48.0, 32.0));
}

#[test]
fn test_small_motion_is_a_click() {
    let mut state = one_row();
    let cell = state.scene().cell_at(0, 1).unwrap();
    state.set_edit_stitch("sc");

    drag(&mut state, (48.0, 16.0), (50.0, 17.0));
    assert_eq!(state.scene().cell(cell).unwrap().pos(), Point::new(48.0, 32.0));
    // Same stitch, so the click toggled the color.
    assert_eq!(state.scene().cell(cell).unwrap().color, Color::rgb(255, 0, 0));
}

#[test]
fn test_rubber_band_selects_intersecting_roots() {
    let mut state = one_row();
    state.press(PointerEvent::primary(-20.0, -20.0));
    assert_eq!(state.gesture().map(|g| g.kind), Some(GestureKind::RubberBand));
    state.pointer_move(PointerEvent::primary(40.0, 10.0));
    assert!(state.scene().rubber_band().is_some());
    state.release(PointerEvent::primary(40.0, 10.0));

    assert!(state.scene().rubber_band().is_none());
    let expected = vec![
        state.scene().cell_at(0, 0).unwrap(),
        state.scene().cell_at(0, 1).unwrap(),
    ];
    assert_eq!(state.selected_ids(), expected);
    assert_eq!(state.scene().item_count(), 3);
}

#[test]
fn test_rubber_band_with_modifier_extends_selection() {
    let mut state = one_row();
    let last = state.scene().cell_at(0, 2).unwrap();
    state.select(last, false);

    let shift = Modifiers {
        shift: true,
        ..Default::default()
    };
    state.press(PointerEvent::primary(-20.0, -20.0).with_modifiers(shift));
    state.release(PointerEvent::primary(10.0, 10.0).with_modifiers(shift));
    assert_eq!(state.selected_ids().len(), 2);
}

#[test]
fn test_click_on_empty_space_creates_cell() {
    let mut state = one_row();
    state.set_edit_stitch("hdc");

    click(&mut state, 200.0, 200.0);
    assert_eq!(state.scene().item_count(), 4);
    let created = state
        .scene()
        .items()
        .last()
        .and_then(|i| i.as_cell())
        .unwrap();
    assert_eq!(created.stitch, "hdc");
    assert_eq!(created.pos(), Point::new(200.0, 200.0));
    assert!(!state.scene().grid().contains(created.id));
    assert!(state.selected_ids().is_empty());

    state.undo();
    assert_eq!(state.scene().item_count(), 3);
}

#[test]
fn test_indicator_mode_creates_and_focuses() {
    let mut state = one_row();
    state.set_mode(EditMode::IndicatorPlacement);

    click(&mut state, 200.0, 10.0);
    let id = state.focused_indicator().unwrap();
    assert!(state.scene().indicator(id).unwrap().focused);
    assert!(state
        .events()
        .history()
        .contains(&ChartEvent::IndicatorFocusGained { indicator: id }));

    assert!(state.set_indicator_text(id, "Row 1"));
    assert_eq!(state.scene().indicator(id).unwrap().text, "Row 1");

    // Empty click in another mode drops focus.
    state.set_mode(EditMode::ColorPlacement);
    click(&mut state, 500.0, 500.0);
    assert_eq!(state.focused_indicator(), None);
}

#[test]
fn test_color_mode_paints_backgrounds() {
    let mut state = one_row();
    state.set_mode(EditMode::ColorPlacement);
    let blue = Color::rgb(0, 0, 255);
    state.set_edit_background(blue);

    state.press(PointerEvent::primary(16.0, 16.0));
    state.pointer_move(PointerEvent::primary(48.0, 16.0));
    state.pointer_move(PointerEvent::primary(50.0, 18.0));
    state.release(PointerEvent::primary(80.0, 16.0));

    let row: Vec<_> = state.scene().grid().row(0).unwrap().to_vec();
    assert!(row
        .iter()
        .all(|id| state.scene().cell(*id).unwrap().bg_color == blue));
    assert_eq!(state.history().undo_depth(), 1);
    let painted = state
        .events()
        .history()
        .into_iter()
        .filter(|e| {
            matches!(
                e,
                ChartEvent::ColorChanged {
                    role: ColorRole::Background,
                    ..
                }
            )
        })
        .count();
    assert_eq!(painted, 3);

    state.undo();
    assert!(row
        .iter()
        .all(|id| state.scene().cell(*id).unwrap().bg_color == Color::WHITE));
}

#[test]
fn test_row_drag_reorders_rows() {
    let mut state = one_row();
    state.create_rows_chart(3, 2, "sc").unwrap();
    state.set_mode(EditMode::RowEdit);
    let first = state.scene().grid().row(0).unwrap().to_vec();

    // Rows are 40 apart; two rows down.
    drag(&mut state, (16.0, 16.0), (16.0, 96.0));
    assert_eq!(state.scene().grid().row(2).unwrap(), first.as_slice());
    assert_eq!(
        state.scene().cell(first[0]).unwrap().pos(),
        Point::new(16.0, 112.0)
    );
    assert_eq!(state.scene().highlighted_row(), Some(2));
    assert_eq!(state.undo_description(), Some("Move Row"));

    state.undo();
    assert_eq!(state.scene().grid().row(0).unwrap(), first.as_slice());
    assert_eq!(
        state.scene().cell(first[0]).unwrap().pos(),
        Point::new(16.0, 32.0)
    );
}

#[test]
fn test_round_drag_follows_radial_distance() {
    let mut state = one_row();
    state.create_rounds_chart(4, 8, "sc").unwrap();
    state.set_mode(EditMode::RowEdit);
    let second = state.scene().grid().row(1).unwrap().to_vec();
    let third = state.scene().grid().row(2).unwrap().to_vec();

    // Round 2, cell 0 sits at radius 120 and points outward along +x.
    // A quarter pitch outward keeps the round where it is.
    drag(&mut state, (136.0, 0.0), (146.0, 0.0));
    assert_eq!(state.scene().grid().row(2).unwrap(), third.as_slice());

    // Round 1 dragged two pitches outward lands in round 3.
    drag(&mut state, (96.0, 0.0), (176.0, 0.0));
    assert_eq!(state.scene().grid().row(3).unwrap(), second.as_slice());
    let pos = state.scene().cell(second[0]).unwrap().pos();
    assert!((pos.x - 160.0).abs() < 1e-9 && pos.y.abs() < 1e-9);
    assert_eq!(state.undo_description(), Some("Move Row"));

    state.undo();
    assert_eq!(state.scene().grid().row(1).unwrap(), second.as_slice());
    let pos = state.scene().cell(second[0]).unwrap().pos();
    assert!((pos.x - 80.0).abs() < 1e-9 && pos.y.abs() < 1e-9);
}

#[test]
fn test_rotate_mode_follows_pointer_angle() {
    let mut state = one_row();
    state.set_mode(EditMode::RotationAdjust);
    let cell = state.scene().cell_at(0, 0).unwrap();

    // Pivot is the cell centre (16, 16); a quarter turn clockwise.
    drag(&mut state, (26.0, 16.0), (16.0, 26.0));
    assert!((state.scene().cell(cell).unwrap().rotation() - 90.0).abs() < 1e-9);
    assert_eq!(state.undo_description(), Some("Rotate"));
}

#[test]
fn test_scale_mode_clamps_to_minimum() {
    let mut state = one_row();
    state.set_mode(EditMode::ScaleAdjust);
    let cell = state.scene().cell_at(0, 0).unwrap();

    drag(&mut state, (30.0, 16.0), (16.1, 16.0));
    let transform = state.scene().cell(cell).unwrap().transform;
    assert_eq!(transform.scale_x, 0.1);
    assert_eq!(transform.scale_y, 0.1);
}

#[test]
fn test_cancel_restores_press_state() {
    let mut state = one_row();
    state.set_mode(EditMode::RotationAdjust);
    let cell = state.scene().cell_at(0, 0).unwrap();

    state.press(PointerEvent::primary(26.0, 16.0));
    state.pointer_move(PointerEvent::primary(16.0, 26.0));
    assert!(state.scene().cell(cell).unwrap().rotation() > 0.0);

    state.set_mode(EditMode::StitchPlacement);
    assert!(state.gesture().is_none());
    assert_eq!(state.scene().cell(cell).unwrap().rotation(), 0.0);
    assert!(!state.can_undo());
}

#[test]
fn test_mode_change_event() {
    let mut state = one_row();
    state.set_mode(EditMode::ScaleAdjust);
    assert_eq!(
        state.events().history(),
        vec![ChartEvent::ModeChanged {
            mode: "scale".to_string()
        }]
    );
    assert_eq!("scale".parse::<EditMode>().unwrap(), EditMode::ScaleAdjust);
}

#[test]
fn test_drag_snaps_to_grid_steps() {
    let defaults = StaticDefaults::new().with("snap_to_grid", "true");
    let mut state = ChartState::new(Arc::new(defaults), Arc::new(StitchLibrary::builtin()));
    state.create_rows_chart(1, 1, "sc").unwrap();
    let cell = state.scene().cell_at(0, 0).unwrap();

    // 32 wide columns, 40 between rows.
    drag(&mut state, (16.0, 16.0), (60.0, 37.0));
    assert_eq!(state.scene().cell(cell).unwrap().pos(), Point::new(48.0, 72.0));
}
