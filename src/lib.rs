//! BLOCKFALL - a falling-block puzzle engine
//!
//! The engine is a plain state machine driven by [`Game::tick`] and
//! [`Game::apply`]; it never reads a clock or a terminal itself. Front ends
//! draw from a [`Snapshot`] and feed input back in.

pub mod board;
pub mod game;
pub mod input;
pub mod line_clear;
pub mod piece;
pub mod score;
pub mod settings;
pub mod snapshot;
pub mod speed;
pub mod tetromino;

pub use board::{Board, Cell, COLUMNS, ROWS};
pub use game::{Game, GameState, Timing};
pub use input::{Action, Button, KeyBindings, PadAction};
pub use settings::Settings;
pub use snapshot::{Snapshot, ViewCell};
pub use tetromino::TetrominoType;
