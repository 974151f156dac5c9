//! Game board representation and collision detection

use crate::tetromino::Shape;
use ratatui::style::Color;

/// Fixed board dimensions
pub const COLUMNS: usize = 10;
pub const ROWS: usize = 20;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Board coordinates of a shape's top-left matrix cell.
/// `y` may be negative while a piece is still above the visible grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Absolute board cells covered by `shape` placed at `pos`, as (x, y)
pub fn cells_at(shape: &Shape, pos: Position) -> impl Iterator<Item = (i32, i32)> + '_ {
    shape
        .occupied()
        .map(move |(r, c)| (pos.x + c as i32, pos.y + r as i32))
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [[Cell; COLUMNS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLUMNS]; ROWS],
        }
    }

    /// True iff `0 <= x < COLUMNS` and `y < ROWS`. There is no lower bound
    /// on `y`: the area above the grid is part of the playfield.
    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < COLUMNS as i32 && y < ROWS as i32
    }

    /// Whether a locked block sits at (x, y). Rows above the grid are never occupied.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|cell| cell.is_filled())
    }

    /// Get the cell at (x, y), `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x >= COLUMNS as i32 || y >= ROWS as i32 {
            return None;
        }
        Some(self.cells[y as usize][x as usize])
    }

    /// Set a cell, returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 || x >= COLUMNS as i32 || y >= ROWS as i32 {
            return false;
        }
        self.cells[y as usize][x as usize] = cell;
        true
    }

    /// True if any occupied cell of `shape` at `pos` leaves the side walls,
    /// passes the floor, or overlaps a locked block inside the grid.
    pub fn collides(&self, shape: &Shape, pos: Position) -> bool {
        cells_at(shape, pos).any(|(x, y)| !self.is_in_bounds(x, y) || self.is_occupied(x, y))
    }

    /// Write `shape` into the grid with `color`. Cells above row 0 are dropped.
    pub fn lock(&mut self, shape: &Shape, pos: Position, color: Color) {
        for (x, y) in cells_at(shape, pos) {
            if y >= 0 {
                self.set(x, y, Cell::Filled(color));
            }
        }
    }

    /// Indices of completely filled rows, top to bottom
    pub fn full_rows(&self) -> Vec<usize> {
        (0..ROWS).filter(|&row| self.is_row_full(row)).collect()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        row < ROWS && self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Remove every row in `rows` at once, shifting the rest down and
    /// inserting empty rows at the top. Out of range indices are ignored.
    /// Returns the number of rows removed.
    pub fn clear_rows(&mut self, rows: &[usize]) -> usize {
        let mut write_row = ROWS;

        for read_row in (0..ROWS).rev() {
            if rows.contains(&read_row) {
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                self.cells[write_row] = self.cells[read_row];
            }
        }

        // Fill the top with empty rows
        for row in 0..write_row {
            self.cells[row] = [Cell::Empty; COLUMNS];
        }

        write_row
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[Cell; COLUMNS])> {
        self.cells.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::TetrominoType;
    use proptest::prelude::*;

    const RED: Cell = Cell::Filled(Color::Red);

    fn fill_row(board: &mut Board, row: usize) {
        for col in 0..COLUMNS {
            board.set(col as i32, row as i32, Cell::Filled(Color::Cyan));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert!(board.full_rows().is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new();
        assert!(board.set(5, 5, RED));
        assert_eq!(board.get(5, 5), Some(RED));
        assert!(board.is_occupied(5, 5));
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(0, ROWS as i32), None);
        assert_eq!(board.get(COLUMNS as i32, 0), None);
    }

    #[test]
    fn test_in_bounds_has_no_upper_limit() {
        let board = Board::new();
        assert!(board.is_in_bounds(0, -5));
        assert!(board.is_in_bounds(COLUMNS as i32 - 1, ROWS as i32 - 1));
        assert!(!board.is_in_bounds(-1, 0));
        assert!(!board.is_in_bounds(COLUMNS as i32, 0));
        assert!(!board.is_in_bounds(0, ROWS as i32));
    }

    #[test]
    fn test_above_grid_never_occupied() {
        let board = Board::new();
        assert!(!board.is_occupied(3, -1));
    }

    #[test]
    fn test_collides_with_walls_and_floor() {
        let board = Board::new();
        let i = TetrominoType::I.shape();
        assert!(!board.collides(&i, Position::new(0, 0)));
        assert!(!board.collides(&i, Position::new(6, 19)));
        assert!(board.collides(&i, Position::new(-1, 0)));
        assert!(board.collides(&i, Position::new(7, 0)));
        assert!(board.collides(&i, Position::new(0, 20)));
    }

    #[test]
    fn test_spawn_area_is_passable_but_walls_are_not() {
        let mut board = Board::new();
        fill_row(&mut board, 0);
        let o = TetrominoType::O.shape();
        // Fully above the grid: nothing to hit
        assert!(!board.collides(&o, Position::new(4, -2)));
        // Bottom half reaches the filled row 0
        assert!(board.collides(&o, Position::new(4, -1)));
        // Still bound-checked on x while above the grid
        assert!(board.collides(&o, Position::new(-1, -3)));
    }

    #[test]
    fn test_lock_marks_cells_and_drops_overflow() {
        let mut board = Board::new();
        let t = TetrominoType::T.shape();
        board.lock(&t, Position::new(2, -1), Color::Red);
        // Top row of the T is above the grid, only the stem lands
        assert!(board.is_occupied(3, 0));
        assert!(!board.is_occupied(2, 0));
        assert_eq!(
            board
                .rows()
                .flat_map(|(_, row)| row.iter())
                .filter(|c| c.is_filled())
                .count(),
            1
        );
    }

    #[test]
    fn test_full_rows_top_to_bottom() {
        let mut board = Board::new();
        fill_row(&mut board, 10);
        fill_row(&mut board, 5);
        board.set(0, 7, RED);
        assert_eq!(board.full_rows(), vec![5, 10]);
    }

    #[test]
    fn test_clear_single_row() {
        let mut board = Board::new();
        fill_row(&mut board, 19);
        board.set(0, 18, RED);
        board.set(4, 3, RED);

        board.clear_rows(&[19]);

        assert_eq!(board.get(0, 19), Some(RED));
        assert_eq!(board.get(4, 4), Some(RED));
        assert!(board.get(0, 18).unwrap().is_empty());
        assert!(board.full_rows().is_empty());
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut board = Board::new();
        // Tag every non-full row with a marker in a distinct column
        for row in 0..ROWS {
            if row == 5 || row == 10 {
                fill_row(&mut board, row);
            } else {
                board.set((row % COLUMNS) as i32, row as i32, RED);
            }
        }
        let survivors: Vec<[Cell; COLUMNS]> = board
            .rows()
            .filter(|(i, _)| *i != 5 && *i != 10)
            .map(|(_, r)| *r)
            .collect();

        board.clear_rows(&[5, 10]);

        let after: Vec<[Cell; COLUMNS]> = board.rows().map(|(_, r)| *r).collect();
        assert!(after[0].iter().all(Cell::is_empty));
        assert!(after[1].iter().all(Cell::is_empty));
        assert_eq!(&after[2..], &survivors[..]);
    }

    #[test]
    fn test_clear_adjacent_rows_order_independent() {
        let mut a = Board::new();
        fill_row(&mut a, 18);
        fill_row(&mut a, 19);
        a.set(2, 17, RED);
        let mut b = a.clone();

        a.clear_rows(&[18, 19]);
        b.clear_rows(&[19, 18]);

        assert_eq!(a, b);
        assert_eq!(a.get(2, 19), Some(RED));
    }

    proptest! {
        #[test]
        fn collides_matches_cellwise_definition(
            kind in 0usize..7,
            turns in 0usize..4,
            x in -4i32..14,
            y in -5i32..24,
            blocks in proptest::collection::vec((0i32..10, 0i32..20), 0..40),
        ) {
            let mut board = Board::new();
            for &(bx, by) in &blocks {
                board.set(bx, by, RED);
            }
            let mut shape = TetrominoType::all()[kind].shape();
            for _ in 0..turns {
                shape = shape.rotated_cw();
            }

            let expected = cells_at(&shape, Position::new(x, y)).any(|(cx, cy)| {
                cx < 0
                    || cx >= COLUMNS as i32
                    || cy >= ROWS as i32
                    || (cy >= 0 && blocks.contains(&(cx, cy)))
            });
            prop_assert_eq!(board.collides(&shape, Position::new(x, y)), expected);
        }
    }
}
