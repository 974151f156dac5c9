//! Delayed line clears
//!
//! Full rows are scored the moment a piece locks, then stay on the board
//! flagged for a short visual delay before the board is compacted. The
//! delay is part of game state and runs on tick time, so a restart simply
//! drops it and a pause freezes it.

use crate::board::Board;
use crate::score::Score;
use std::time::Duration;

/// Rows waiting for compaction and the time left before it happens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClear {
    rows: Vec<usize>,
    remaining: Duration,
}

impl PendingClear {
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// Line clear engine state
#[derive(Debug, Clone, Default)]
pub struct LineClear {
    delay: Duration,
    pending: Option<PendingClear>,
}

impl LineClear {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<&PendingClear> {
        self.pending.as_ref()
    }

    /// Rows currently flagged for clearing, top to bottom
    pub fn pending_rows(&self) -> &[usize] {
        self.pending.as_ref().map(PendingClear::rows).unwrap_or(&[])
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Score newly completed rows and flag them for delayed removal.
    ///
    /// Rows already pending from an earlier lock are not scored again; the
    /// new rows join the pending set and the delay restarts. Returns the
    /// number of newly scored rows.
    pub fn check(&mut self, board: &Board, score: &mut Score) -> usize {
        let already = self.pending_rows();
        let fresh: Vec<usize> = board
            .full_rows()
            .into_iter()
            .filter(|row| !already.contains(row))
            .collect();
        if fresh.is_empty() {
            return 0;
        }

        let gained = score.add_lines(fresh.len());
        tracing::info!(rows = ?fresh, gained, total = score.points, "lines completed");

        let count = fresh.len();
        let mut rows = self.pending.take().map(|p| p.rows).unwrap_or_default();
        rows.extend(fresh);
        rows.sort_unstable();
        self.pending = Some(PendingClear {
            rows,
            remaining: self.delay,
        });
        count
    }

    /// Advance the delay; compacts the board once it has run out.
    /// Returns the number of rows removed on this call.
    pub fn advance(&mut self, elapsed: Duration, board: &mut Board) -> usize {
        let Some(pending) = &mut self.pending else {
            return 0;
        };
        pending.remaining = pending.remaining.saturating_sub(elapsed);
        if !pending.remaining.is_zero() {
            return 0;
        }
        self.flush(board)
    }

    /// Compact any pending rows immediately
    pub fn flush(&mut self, board: &mut Board) -> usize {
        match self.pending.take() {
            Some(pending) => {
                let removed = board.clear_rows(&pending.rows);
                tracing::debug!(rows = ?pending.rows, "rows compacted");
                removed
            }
            None => 0,
        }
    }

    /// Drop pending rows without touching the board
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{COLUMNS, Cell, ROWS};
    use ratatui::style::Color;

    const DELAY: Duration = Duration::from_millis(600);

    fn fill_row(board: &mut Board, row: usize) {
        for col in 0..COLUMNS {
            board.set(col as i32, row as i32, Cell::Filled(Color::Blue));
        }
    }

    #[test]
    fn test_no_full_rows_does_nothing() {
        let board = Board::new();
        let mut score = Score::new();
        let mut clear = LineClear::new(DELAY);
        assert_eq!(clear.check(&board, &mut score), 0);
        assert!(!clear.is_pending());
        assert_eq!(score.points, 0);
    }

    #[test]
    fn test_rows_stay_until_delay_elapses() {
        let mut board = Board::new();
        fill_row(&mut board, 19);
        let mut score = Score::new();
        let mut clear = LineClear::new(DELAY);

        assert_eq!(clear.check(&board, &mut score), 1);
        assert_eq!(score.points, 100);
        assert_eq!(clear.pending_rows(), &[19]);

        assert_eq!(clear.advance(Duration::from_millis(599), &mut board), 0);
        assert!(board.is_row_full(19));

        assert_eq!(clear.advance(Duration::from_millis(1), &mut board), 1);
        assert!(board.is_empty());
        assert!(!clear.is_pending());
    }

    #[test]
    fn test_simultaneous_rows_score_per_line() {
        let mut board = Board::new();
        for row in [5, 10, 18, 19] {
            fill_row(&mut board, row);
        }
        let mut score = Score::new();
        let mut clear = LineClear::new(DELAY);
        assert_eq!(clear.check(&board, &mut score), 4);
        assert_eq!(score.points, 400);
        assert_eq!(clear.pending_rows(), &[5, 10, 18, 19]);
    }

    #[test]
    fn test_pending_rows_not_scored_twice() {
        let mut board = Board::new();
        fill_row(&mut board, 19);
        let mut score = Score::new();
        let mut clear = LineClear::new(DELAY);
        clear.check(&board, &mut score);
        clear.advance(Duration::from_millis(400), &mut board);

        // Another lock completes a second row before compaction
        fill_row(&mut board, 17);
        assert_eq!(clear.check(&board, &mut score), 1);
        assert_eq!(score.points, 200);
        assert_eq!(clear.pending_rows(), &[17, 19]);
        assert_eq!(clear.pending().map(|p| p.remaining()), Some(DELAY));

        clear.advance(DELAY, &mut board);
        assert!(board.is_empty());
        assert_eq!(board.rows().count(), ROWS);
    }

    #[test]
    fn test_cancel_discards_without_compacting() {
        let mut board = Board::new();
        fill_row(&mut board, 19);
        let mut score = Score::new();
        let mut clear = LineClear::new(DELAY);
        clear.check(&board, &mut score);
        clear.cancel();
        assert_eq!(clear.advance(DELAY, &mut board), 0);
        assert!(board.is_row_full(19));
    }
}
