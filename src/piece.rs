//! Active falling piece logic

use crate::board::{Board, COLUMNS, Position, cells_at};
use crate::tetromino::{CatalogEntry, Shape, TetrominoType};
use ratatui::style::Color;

/// A falling piece: its current (possibly rotated) shape, where it sits,
/// and the color it locks with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: TetrominoType,
    pub shape: Shape,
    pub position: Position,
    pub color: Color,
}

impl Piece {
    /// Create a piece at the spawn position: horizontally centered, top row
    pub fn spawn(entry: CatalogEntry) -> Self {
        Self {
            kind: entry.kind,
            shape: entry.shape,
            position: spawn_position(&entry.shape),
            color: entry.color,
        }
    }

    /// Absolute (x, y) cells covered by this piece
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        cells_at(&self.shape, self.position)
    }

    /// Whether the piece overlaps a wall, the floor, or locked blocks
    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.shape, self.position)
    }

    /// Shift by (dx, dy) if the target is free; leaves the piece untouched otherwise
    pub fn try_move(&mut self, board: &Board, dx: i32, dy: i32) -> bool {
        let candidate = self.position.offset(dx, dy);
        if board.collides(&self.shape, candidate) {
            return false;
        }
        self.position = candidate;
        true
    }

    /// Rotate clockwise in place. No kicks: a blocked rotation is rejected.
    pub fn try_rotate(&mut self, board: &Board) -> bool {
        let rotated = self.shape.rotated_cw();
        if board.collides(&rotated, self.position) {
            return false;
        }
        self.shape = rotated;
        true
    }
}

/// `x = COLUMNS / 2 - width / 2`, `y = 0`
pub fn spawn_position(shape: &Shape) -> Position {
    Position::new((COLUMNS / 2) as i32 - (shape.cols() / 2) as i32, 0)
}
