//! Row/column membership of cells and the nominal slot layout.
//!
//! The grid holds ids only; the scene's item store owns the cells. Rows are
//! ordered top to bottom (inner to outer for rounds) and may be jagged.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stitchkit_core::ItemId;

use crate::model::{normalize_degrees, Point, Size};

/// Row/column address of a gridded cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridIndex {
    pub row: usize,
    pub column: usize,
}

impl GridIndex {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for GridIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<ItemId>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<ItemId>>) -> Self {
        let mut grid = Self::new();
        for row in rows {
            grid.append_row(row);
        }
        grid
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Option<ItemId> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    pub fn index_of(&self, id: ItemId) -> Option<GridIndex> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|c| *c == id)
                .map(|c| GridIndex::new(r, c))
        })
    }

    /// Maps a scene point to the gridded cell slot under it.
    pub fn index_at(&self, point: Point, layout: &GridLayout) -> Option<GridIndex> {
        layout.index_at(point, self)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.rows.iter().any(|r| r.contains(&id))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of cells in `row`, 0 when the row does not exist.
    pub fn column_count(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    pub fn max_column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row(&self, index: usize) -> Option<&[ItemId]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<ItemId>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every gridded cell in row order.
    pub fn cells(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.rows.iter().flatten().copied()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Inserts a new row before `index` (`index == row_count()` appends).
    ///
    /// Ids already in the grid are skipped; an empty row is not inserted.
    pub fn insert_row(&mut self, index: usize, cells: Vec<ItemId>) {
        debug_assert!(index <= self.rows.len(), "row index {index} out of range");
        if index > self.rows.len() {
            tracing::warn!(
                "insert_row: index {} out of range ({} rows)",
                index,
                self.rows.len()
            );
            return;
        }

        let mut seen = HashSet::new();
        let cells: Vec<ItemId> = cells
            .into_iter()
            .filter(|id| {
                let fresh = !self.contains(*id) && seen.insert(*id);
                if !fresh {
                    tracing::warn!("insert_row: cell {} is already in a row", id);
                }
                fresh
            })
            .collect();

        if cells.is_empty() {
            return;
        }
        self.rows.insert(index, cells);
    }

    pub fn insert_row_after(&mut self, row: usize, cells: Vec<ItemId>) {
        self.insert_row(row + 1, cells);
    }

    pub fn append_row(&mut self, cells: Vec<ItemId>) {
        self.insert_row(self.rows.len(), cells);
    }

    /// Removes a row, returning the ids that were in it. The cells
    /// themselves are untouched.
    pub fn remove_row(&mut self, index: usize) -> Vec<ItemId> {
        debug_assert!(index < self.rows.len(), "row index {index} out of range");
        if index >= self.rows.len() {
            tracing::warn!(
                "remove_row: index {} out of range ({} rows)",
                index,
                self.rows.len()
            );
            return Vec::new();
        }
        self.rows.remove(index)
    }

    pub fn move_row(&mut self, from: usize, to: usize) {
        let len = self.rows.len();
        debug_assert!(from < len && to < len, "move_row {from} -> {to} out of range");
        if from >= len || to >= len {
            tracing::warn!("move_row: {} -> {} out of range ({} rows)", from, to, len);
            return;
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
    }

    /// Drops a cell from its row, removing the row when it empties.
    pub fn remove_cell(&mut self, id: ItemId) -> Option<GridIndex> {
        let index = self.index_of(id)?;
        self.rows[index.row].remove(index.column);
        if self.rows[index.row].is_empty() {
            self.rows.remove(index.row);
        }
        Some(index)
    }

    /// Places `id` at `index`, shifting later cells in that row right.
    pub fn insert_cell(&mut self, index: GridIndex, id: ItemId) {
        let valid = index.row < self.rows.len() && index.column <= self.rows[index.row].len();
        debug_assert!(valid, "insert_cell at {index} out of range");
        if !valid || self.contains(id) {
            tracing::warn!("insert_cell: cannot place {} at {}", id, index);
            return;
        }
        self.rows[index.row].insert(index.column, id);
    }

    /// Reverses the column order of the given cells within each row they
    /// occupy. Cells not in `ids` keep their columns.
    pub fn reverse_cells_in_rows(&mut self, ids: &HashSet<ItemId>) {
        for row in &mut self.rows {
            let columns: Vec<usize> = row
                .iter()
                .enumerate()
                .filter(|(_, id)| ids.contains(id))
                .map(|(c, _)| c)
                .collect();
            let reversed: Vec<ItemId> = columns.iter().rev().map(|c| row[*c]).collect();
            for (c, id) in columns.into_iter().zip(reversed) {
                row[c] = id;
            }
        }
    }

    /// Reverses the order of the given rows among themselves.
    pub fn reverse_rows(&mut self, rows: &[usize]) {
        let mut rows: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|r| *r < self.rows.len())
            .collect();
        rows.sort_unstable();
        rows.dedup();
        let (mut lo, mut hi) = (0usize, rows.len());
        while lo + 1 < hi {
            hi -= 1;
            self.rows.swap(rows[lo], rows[hi]);
            lo += 1;
        }
    }

    pub fn snapshot(&self) -> Grid {
        self.clone()
    }

    pub fn restore(&mut self, snapshot: Grid) {
        *self = snapshot;
    }
}

/// How rows are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartStyle {
    /// Straight rows stacked top to bottom.
    #[default]
    Rows,
    /// Concentric rounds around the layout origin.
    Rounds,
    /// No grid.
    Blank,
}

impl std::str::FromStr for ChartStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rows" => Ok(Self::Rows),
            "rounds" => Ok(Self::Rounds),
            "blank" => Ok(Self::Blank),
            other => Err(format!("Unknown chart style '{}'", other)),
        }
    }
}

/// Nominal placement of a cell in a grid slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Scene position of the cell's transform origin (bottom centre).
    pub pos: Point,
    pub rotation: f64,
}

/// Geometry of the chart grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub style: ChartStyle,
    pub cell_size: Size,
    pub row_spacing: f64,
    /// Top-left of row 0 for row charts, the centre for rounds.
    pub origin: Point,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            style: ChartStyle::Rows,
            cell_size: Size::new(
                stitchkit_core::constants::DEFAULT_CELL_WIDTH,
                stitchkit_core::constants::DEFAULT_CELL_HEIGHT,
            ),
            row_spacing: stitchkit_core::constants::DEFAULT_ROW_SPACING,
            origin: Point::default(),
        }
    }
}

impl GridLayout {
    pub fn new(style: ChartStyle, cell_size: Size, row_spacing: f64) -> Self {
        Self {
            style,
            cell_size,
            row_spacing,
            origin: Point::default(),
        }
    }

    /// Distance between consecutive rows (or rounds).
    pub fn row_pitch(&self) -> f64 {
        self.cell_size.height + self.row_spacing
    }

    /// Where the cell at `(row, column)` sits in a row of `columns` cells.
    pub fn slot(&self, row: usize, column: usize, columns: usize) -> Option<Slot> {
        match self.style {
            ChartStyle::Rows => {
                let top_left = Point::new(
                    self.origin.x + column as f64 * self.cell_size.width,
                    self.origin.y + row as f64 * self.row_pitch(),
                );
                Some(Slot {
                    pos: Point::new(
                        top_left.x + self.cell_size.width / 2.0,
                        top_left.y + self.cell_size.height,
                    ),
                    rotation: 0.0,
                })
            }
            ChartStyle::Rounds => {
                if columns == 0 {
                    return None;
                }
                let radius = (row + 1) as f64 * self.row_pitch();
                let angle = 360.0 / columns as f64 * column as f64;
                let (sin, cos) = angle.to_radians().sin_cos();
                Some(Slot {
                    pos: Point::new(self.origin.x + radius * cos, self.origin.y + radius * sin),
                    rotation: normalize_degrees(angle + 90.0),
                })
            }
            ChartStyle::Blank => None,
        }
    }

    /// Slot under a scene point, if a gridded cell occupies it.
    pub fn index_at(&self, point: Point, grid: &Grid) -> Option<GridIndex> {
        let rel = point - self.origin;
        let (row, column) = match self.style {
            ChartStyle::Rows => {
                if rel.x < 0.0 || rel.y < 0.0 || self.cell_size.width <= 0.0 {
                    return None;
                }
                let row = (rel.y / self.row_pitch()).floor() as usize;
                let column = (rel.x / self.cell_size.width).floor() as usize;
                (row, column)
            }
            ChartStyle::Rounds => {
                let ring = (rel.length() / self.row_pitch()).floor() as usize;
                let row = ring.checked_sub(1)?;
                let columns = grid.column_count(row);
                if columns == 0 {
                    return None;
                }
                let step = 360.0 / columns as f64;
                let column = (normalize_degrees(rel.angle_degrees()) / step).round() as usize % columns;
                (row, column)
            }
            ChartStyle::Blank => return None,
        };
        grid.cell_at(row, column).map(|_| GridIndex::new(row, column))
    }

    /// Polyline guide through a row, used to draw row lines.
    pub fn row_guide(&self, row: usize, columns: usize) -> Vec<Point> {
        match self.style {
            ChartStyle::Rows => {
                let y = self.origin.y + row as f64 * self.row_pitch() + self.cell_size.height;
                vec![
                    Point::new(self.origin.x, y),
                    Point::new(self.origin.x + columns as f64 * self.cell_size.width, y),
                ]
            }
            ChartStyle::Rounds => {
                let radius = (row + 1) as f64 * self.row_pitch();
                (0..=64)
                    .map(|i| {
                        let (sin, cos) = (i as f64 * 360.0 / 64.0).to_radians().sin_cos();
                        Point::new(self.origin.x + radius * cos, self.origin.y + radius * sin)
                    })
                    .collect()
            }
            ChartStyle::Blank => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x4() -> Grid {
        Grid::from_rows(vec![
            vec![1, 2, 3, 4],
            vec![5, 6, 7, 8],
            vec![9, 10, 11, 12],
        ])
    }

    #[test]
    fn test_lookup() {
        let grid = grid_3x4();
        assert_eq!(grid.cell_at(1, 2), Some(7));
        assert_eq!(grid.cell_at(3, 0), None);
        assert_eq!(grid.cell_at(0, 4), None);
        assert_eq!(grid.index_of(11), Some(GridIndex::new(2, 2)));
        assert_eq!(grid.index_of(99), None);
        assert_eq!(grid.column_count(7), 0);
    }

    #[test]
    fn test_remove_cell_cascades_empty_row() {
        let mut grid = Grid::from_rows(vec![vec![1, 2], vec![3], vec![4, 5]]);
        assert_eq!(grid.remove_cell(3), Some(GridIndex::new(1, 0)));
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.cell_at(1, 0), Some(4));
    }

    #[test]
    fn test_insert_row_skips_duplicates() {
        let mut grid = grid_3x4();
        grid.insert_row(1, vec![2, 20, 20, 21]);
        assert_eq!(grid.row(1), Some(&[20, 21][..]));
        assert_eq!(grid.row_count(), 4);
    }

    #[test]
    fn test_move_row() {
        let mut grid = grid_3x4();
        grid.move_row(0, 2);
        assert_eq!(grid.cell_at(2, 0), Some(1));
        assert_eq!(grid.cell_at(0, 0), Some(5));
    }

    #[test]
    fn test_jagged_max_columns() {
        let grid = Grid::from_rows(vec![vec![1], vec![2, 3, 4], vec![5, 6]]);
        assert_eq!(grid.max_column_count(), 3);
    }

    #[test]
    fn test_reverse_selected_cells_in_rows() {
        let mut grid = grid_3x4();
        grid.reverse_cells_in_rows(&HashSet::from([1, 2, 4, 6, 7]));
        assert_eq!(grid.row(0), Some(&[4, 2, 3, 1][..]));
        assert_eq!(grid.row(1), Some(&[5, 7, 6, 8][..]));
        assert_eq!(grid.row(2), Some(&[9, 10, 11, 12][..]));
    }

    #[test]
    fn test_reverse_rows() {
        let mut grid = grid_3x4();
        grid.reverse_rows(&[0, 2]);
        assert_eq!(grid.cell_at(0, 0), Some(9));
        assert_eq!(grid.cell_at(1, 0), Some(5));
        assert_eq!(grid.cell_at(2, 0), Some(1));
    }

    #[test]
    fn test_linear_slots_and_index_at() {
        let grid = grid_3x4();
        let layout = GridLayout::new(ChartStyle::Rows, Size::new(32.0, 32.0), 8.0);
        let slot = layout.slot(1, 2, 4).unwrap();
        assert_eq!(slot.pos, Point::new(80.0, 72.0));

        assert_eq!(
            grid.index_at(Point::new(70.0, 50.0), &layout),
            Some(GridIndex::new(1, 2))
        );
        assert_eq!(grid.index_at(Point::new(500.0, 50.0), &layout), None);
        assert_eq!(grid.index_at(Point::new(-1.0, 5.0), &layout), None);
    }

    #[test]
    fn test_round_slots_face_outward() {
        let grid = grid_3x4();
        let layout = GridLayout::new(ChartStyle::Rounds, Size::new(32.0, 32.0), 8.0);
        let slot = layout.slot(0, 1, 4).unwrap();
        assert!((slot.pos.x - 0.0).abs() < 1e-9);
        assert!((slot.pos.y - 40.0).abs() < 1e-9);
        assert!((slot.rotation - 180.0).abs() < 1e-9);

        // A point just outside round 1 at 90 degrees.
        assert_eq!(
            grid.index_at(Point::new(0.0, 85.0), &layout),
            Some(GridIndex::new(1, 1))
        );
        assert_eq!(grid.index_at(Point::new(0.0, 10.0), &layout), None);
    }
}
