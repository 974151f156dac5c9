//! Read-only view of a game for renderers

use crate::board::{Board, Cell};
use crate::piece::Piece;
use ratatui::style::Color;

/// What a renderer should draw in one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCell {
    Empty,
    /// A locked block
    Locked(Color),
    /// A locked block in a row that is about to be removed
    Clearing(Color),
    /// Part of the falling piece
    Active(Color),
}

/// Everything a front end needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    /// Rows flagged for removal, top to bottom
    pub pending_rows: &'a [usize],
    pub active: &'a Piece,
    pub next: &'a Piece,
    pub score: u64,
    pub lines: u32,
    pub fall_interval_ms: f64,
    pub game_over: bool,
    pub paused: bool,
}

impl Snapshot<'_> {
    /// Resolve a board cell, with the active piece drawn on top unless the game is over
    pub fn cell(&self, x: i32, y: i32) -> ViewCell {
        if !self.game_over && self.active.cells().any(|c| c == (x, y)) {
            return ViewCell::Active(self.active.color);
        }
        match self.board.get(x, y) {
            Some(Cell::Filled(color)) if self.pending_rows.contains(&(y as usize)) => {
                ViewCell::Clearing(color)
            }
            Some(Cell::Filled(color)) => ViewCell::Locked(color),
            _ => ViewCell::Empty,
        }
    }
}
