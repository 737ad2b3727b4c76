use std::sync::Arc;

use stitchkit_core::StaticDefaults;
use stitchkit_designer::{ChartState, ClipboardItems, Point, SceneItem, StitchLibrary};

fn chart() -> ChartState {
    let mut state = ChartState::new(
        Arc::new(StaticDefaults::new()),
        Arc::new(StitchLibrary::builtin()),
    );
    state.create_rows_chart(2, 3, "sc").unwrap();
    state
}

#[test]
fn test_paste_offsets_each_time() {
    let mut state = chart();
    let source = state.scene().cell_at(0, 0).unwrap();
    state.select(source, false);
    assert!(state.copy());

    let first = state.paste();
    assert_eq!(first.len(), 1);
    assert_ne!(first[0], source);
    assert_eq!(state.selected_ids(), first);
    let pasted = state.scene().cell(first[0]).unwrap();
    assert_eq!(pasted.pos(), Point::new(32.0, 48.0));
    assert_eq!(pasted.stitch, "sc");
    assert!(!state.scene().grid().contains(first[0]));

    let second = state.paste();
    assert_eq!(
        state.scene().cell(second[0]).unwrap().pos(),
        Point::new(48.0, 64.0)
    );
    assert_eq!(state.scene().item_count(), 8);
    assert_eq!(state.undo_description(), Some("Paste"));

    state.undo();
    state.undo();
    assert_eq!(state.scene().item_count(), 6);
}

#[test]
fn test_paste_offset_comes_from_defaults() {
    let defaults = StaticDefaults::new().with("paste_offset", "5");
    let mut state = ChartState::new(Arc::new(defaults), Arc::new(StitchLibrary::builtin()));
    state.set_edit_stitch("sc");
    let id = state.create_cell_at(Point::new(10.0, 10.0));
    state.select(id, false);
    state.copy();

    let pasted = state.paste();
    assert_eq!(
        state.scene().cell(pasted[0]).unwrap().pos(),
        Point::new(15.0, 15.0)
    );
}

#[test]
fn test_paste_keeps_groups_together() {
    let mut state = chart();
    let a = state.scene().cell_at(0, 0).unwrap();
    let b = state.scene().cell_at(0, 1).unwrap();
    state.select(a, false);
    state.select(b, true);
    let group = state.group_selected().unwrap();
    state.copy();

    let roots = state.paste();
    assert_eq!(roots.len(), 1);
    assert_ne!(roots[0], group);
    let pasted = state
        .scene()
        .item(roots[0])
        .and_then(SceneItem::as_group)
        .unwrap();
    assert_eq!(pasted.children.len(), 2);
    for child in &pasted.children {
        assert_ne!(*child, a);
        assert_ne!(*child, b);
        assert_eq!(state.scene().item(*child).unwrap().parent(), Some(roots[0]));
    }
}

#[test]
fn test_cut_removes_and_undo_restores_grid() {
    let mut state = chart();
    let cell = state.scene().cell_at(1, 1).unwrap();
    state.select(cell, false);

    assert!(state.cut());
    assert!(state.scene().item(cell).is_none());
    assert_eq!(state.scene().grid().column_count(1), 2);
    assert_eq!(state.undo_description(), Some("Cut"));
    assert!(state.clipboard_json().is_some());

    state.undo();
    assert_eq!(state.scene().cell_at(1, 1), Some(cell));

    // Cut contents still paste after undo.
    assert_eq!(state.paste().len(), 1);
}

#[test]
fn test_delete_whole_row_drops_row() {
    let mut state = chart();
    state.highlight_row(0);
    assert!(state.delete_selected());
    assert_eq!(state.scene().grid().row_count(), 1);
    assert_eq!(state.undo_description(), Some("Delete"));
}

#[test]
fn test_copy_without_selection() {
    let mut state = chart();
    assert!(!state.copy());
    assert!(!state.cut());
    assert!(state.paste().is_empty());
}

#[test]
fn test_foreign_clipboard_is_validated() {
    let mut state = chart();
    state.set_clipboard_json("not json");
    assert!(state.paste().is_empty());

    let id = state.scene().cell_at(0, 0).unwrap();
    let item = state.scene().item(id).unwrap().clone();
    let dup = ClipboardItems {
        items: vec![item.clone(), item],
    };
    let json = serde_json::to_string(&dup).unwrap();
    assert!(ClipboardItems::from_json(&json).is_err());
}
