use std::sync::Arc;

use proptest::prelude::*;
use stitchkit_core::StaticDefaults;
use stitchkit_designer::{
    normalize_degrees, rotate_point, ChartState, Grid, GridIndex, HorizontalAlignment,
    ItemTransform, Point, StitchLibrary, VerticalAlignment,
};

fn chart(rows: usize, columns: usize) -> ChartState {
    let mut state = ChartState::new(
        Arc::new(StaticDefaults::new()),
        Arc::new(StitchLibrary::builtin()),
    );
    state.create_rows_chart(rows, columns, "sc").unwrap();
    state
}

proptest! {
    #[test]
    fn prop_grid_lookup_round_trips(rows in prop::collection::vec(1usize..6, 1..6)) {
        let mut next = 1u64;
        let grid = Grid::from_rows(
            rows.iter()
                .map(|n| (0..*n).map(|_| { next += 1; next }).collect())
                .collect(),
        );
        for (r, row) in grid.rows().iter().enumerate() {
            for (c, id) in row.iter().enumerate() {
                prop_assert_eq!(grid.index_of(*id), Some(GridIndex::new(r, c)));
                prop_assert_eq!(grid.cell_at(r, c), Some(*id));
            }
        }
    }

    #[test]
    fn prop_transform_inverse(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        rotation in 0.0f64..360.0,
        scale in 0.1f64..4.0,
    ) {
        let mut t = ItemTransform::with_origin(Point::new(16.0, 32.0));
        t.pos = Point::new(x, y);
        t.rotation = rotation;
        t.scale_x = scale;
        t.scale_y = scale;
        let local = Point::new(7.0, 3.0);
        let back = t.inverse_map(t.map_point(local)).unwrap();
        prop_assert!(back.distance_to(&local) < 1e-6);
    }

    #[test]
    fn prop_rotation_preserves_distance(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        degrees in -720.0f64..720.0,
    ) {
        let pivot = Point::new(3.0, -4.0);
        let p = Point::new(x, y);
        let q = rotate_point(p, pivot, degrees);
        prop_assert!((p.distance_to(&pivot) - q.distance_to(&pivot)).abs() < 1e-6);
        let n = normalize_degrees(degrees);
        prop_assert!((0.0..360.0).contains(&n));
    }

    #[test]
    fn prop_undo_everything_restores_rows(
        ops in prop::collection::vec(0u8..4, 1..8),
    ) {
        let mut state = chart(3, 3);
        let initial = state.scene().grid().rows().to_vec();
        let mut recorded = 0;
        for op in ops {
            let rows = state.scene().grid().row_count();
            let done = match op {
                0 => !state.insert_row(0, 2).is_empty(),
                1 => rows > 1 && state.remove_row(rows - 1),
                2 => state.move_row_down(0),
                _ => {
                    state.select_all();
                    state.align_selection(VerticalAlignment::Top, HorizontalAlignment::None)
                }
            };
            if done {
                recorded += 1;
            }
        }
        prop_assert_eq!(state.history().undo_depth(), recorded);
        while state.undo() {}
        prop_assert_eq!(state.scene().grid().rows(), initial.as_slice());
        prop_assert_eq!(state.scene().item_count(), 9);
    }
}
