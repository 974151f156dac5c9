//! Core game state and logic
//!
//! [`Game`] owns everything about one game: board, falling and next piece,
//! score, speed ramp, pending line clear and held-button state. It advances
//! only through [`Game::tick`] and the control actions, so time is whatever
//! the caller says it is.

use crate::board::{Board, ROWS};
use crate::input::{Action, Button, HeldButtons, PadAction};
use crate::line_clear::LineClear;
use crate::piece::Piece;
use crate::score::Score;
use crate::snapshot::Snapshot;
use crate::speed::SpeedRamp;
use crate::tetromino::random_entry;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

pub const INITIAL_FALL_MS: f64 = 800.0;
pub const SPEED_INCREASE_INTERVAL: Duration = Duration::from_secs(30);
pub const SPEED_INCREASE_FACTOR: f64 = 0.85;
pub const INITIAL_MOVE_DELAY: Duration = Duration::from_millis(200);
pub const MOVE_REPEAT_DELAY: Duration = Duration::from_millis(100);
pub const LINE_CLEAR_DELAY: Duration = Duration::from_millis(600);
/// Longest tick accepted; a stalled frame must not turn into a burst of drops
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Timing parameters for a game
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    pub initial_fall_ms: f64,
    pub speed_increase_interval: Duration,
    pub speed_increase_factor: f64,
    pub initial_move_delay: Duration,
    pub move_repeat_delay: Duration,
    pub line_clear_delay: Duration,
    pub max_frame_delta: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            initial_fall_ms: INITIAL_FALL_MS,
            speed_increase_interval: SPEED_INCREASE_INTERVAL,
            speed_increase_factor: SPEED_INCREASE_FACTOR,
            initial_move_delay: INITIAL_MOVE_DELAY,
            move_repeat_delay: MOVE_REPEAT_DELAY,
            line_clear_delay: LINE_CLEAR_DELAY,
            max_frame_delta: MAX_FRAME_DELTA,
        }
    }
}

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// The main game struct
pub struct Game {
    board: Board,
    current: Piece,
    next: Piece,
    score: Score,
    state: GameState,
    timing: Timing,
    speed: SpeedRamp,
    line_clear: LineClear,
    input: HeldButtons,
    /// Time accumulated toward the next automatic drop
    drop_counter: Duration,
    /// Unpaused play time since the game started
    clock: Duration,
    rng: ChaCha8Rng,
}

impl Game {
    /// Create a new game with a random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a new game with a fixed piece sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_timing(seed, Timing::default())
    }

    pub fn with_timing(seed: u64, timing: Timing) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let current = Piece::spawn(random_entry(&mut rng));
        let next = Piece::spawn(random_entry(&mut rng));
        tracing::info!(seed, first = ?current.kind, next = ?next.kind, "game created");
        Self {
            board: Board::new(),
            current,
            next,
            score: Score::new(),
            state: GameState::Playing,
            speed: speed_ramp(&timing),
            line_clear: LineClear::new(timing.line_clear_delay),
            input: HeldButtons::new(timing.initial_move_delay, timing.move_repeat_delay),
            timing,
            drop_counter: Duration::ZERO,
            clock: Duration::ZERO,
            rng,
        }
    }

    /// Begin a fresh game: empty board, zero score, initial speed, new pieces.
    /// Any pending line clear is discarded along with the old board.
    pub fn start(&mut self) {
        self.board = Board::new();
        self.score = Score::new();
        self.state = GameState::Playing;
        self.speed = speed_ramp(&self.timing);
        self.line_clear = LineClear::new(self.timing.line_clear_delay);
        self.input.clear();
        self.drop_counter = Duration::ZERO;
        self.clock = Duration::ZERO;
        self.next = Piece::spawn(random_entry(&mut self.rng));
        self.spawn_next();
        tracing::info!(first = ?self.current.kind, next = ?self.next.kind, "game started");
    }

    /// Throw away the current game and start over, whatever its state
    pub fn restart(&mut self) {
        tracing::info!(score = self.score.points, state = ?self.state, "restart");
        self.start();
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.state == GameState::Paused
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn fall_interval_ms(&self) -> f64 {
        self.speed.fall_interval_ms()
    }

    pub fn speed_stage(&self) -> u32 {
        self.speed.stage
    }

    /// Rows flagged for removal, top to bottom
    pub fn pending_rows(&self) -> &[usize] {
        self.line_clear.pending_rows()
    }

    /// Unpaused play time
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: &self.board,
            pending_rows: self.line_clear.pending_rows(),
            active: &self.current,
            next: &self.next,
            score: self.score.points,
            lines: self.score.lines,
            fall_interval_ms: self.speed.fall_interval_ms(),
            game_over: self.is_game_over(),
            paused: self.is_paused(),
        }
    }

    /// Advance the game by one frame.
    ///
    /// Order within a running tick: speed ramp, delayed row compaction,
    /// held buttons, then gravity. Does nothing while paused or over.
    pub fn tick(&mut self, elapsed: Duration) {
        if self.state != GameState::Playing {
            return;
        }
        let elapsed = elapsed.min(self.timing.max_frame_delta);
        self.clock += elapsed;

        self.speed.advance(elapsed);
        self.line_clear.advance(elapsed, &mut self.board);

        for button in self.input.poll(self.clock) {
            if self.state != GameState::Playing {
                break;
            }
            match button {
                Button::Left => {
                    self.move_piece(-1, 0);
                }
                Button::Right => {
                    self.move_piece(1, 0);
                }
                Button::Rotate => {
                    self.rotate();
                }
                Button::Down => {
                    self.move_piece(0, 1);
                }
            }
        }
        if self.state != GameState::Playing {
            return;
        }

        // Gravity; overshoot past the interval is discarded, not carried
        self.drop_counter += elapsed;
        if millis(self.drop_counter) > self.speed.fall_interval_ms() {
            self.move_piece(0, 1);
            self.drop_counter = Duration::ZERO;
        }
    }

    /// Process a discrete key action
    pub fn apply(&mut self, action: Action) {
        match self.state {
            GameState::GameOver => {
                if action == Action::Restart {
                    self.restart();
                }
            }
            GameState::Paused => {
                if action == Action::Pause {
                    self.toggle_pause();
                }
            }
            GameState::Playing => match action {
                Action::MoveLeft => {
                    self.move_left();
                }
                Action::MoveRight => {
                    self.move_right();
                }
                Action::SoftDrop => {
                    self.soft_drop();
                }
                Action::Rotate => {
                    self.rotate();
                }
                Action::HardDrop => self.hard_drop(),
                Action::Pause => self.toggle_pause(),
                // Restart keys only count once the game is over; quitting is the caller's business
                Action::Restart | Action::Quit => {}
            },
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.move_piece(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.move_piece(1, 0)
    }

    pub fn soft_drop(&mut self) -> bool {
        self.move_piece(0, 1)
    }

    /// Rotate clockwise; rejected rotations are a no-op
    pub fn rotate(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let rotated = self.current.try_rotate(&self.board);
        if !rotated {
            tracing::debug!(kind = ?self.current.kind, "rotation blocked");
        }
        rotated
    }

    /// Drop straight down and lock in the same call
    pub fn hard_drop(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        // A spawned piece can fall fewer than ROWS rows; the last attempt locks it
        for _ in 0..=ROWS {
            if !self.move_piece(0, 1) {
                break;
            }
        }
    }

    /// Try to shift the piece. A blocked downward move lands it: lock,
    /// line check and next spawn all happen before this returns `false`.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        if self.current.try_move(&self.board, dx, dy) {
            return true;
        }
        if dy > 0 {
            self.land();
        }
        false
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                tracing::info!(clock_ms = self.clock.as_millis() as u64, "paused");
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                self.drop_counter = Duration::ZERO;
                tracing::info!("resumed");
            }
            GameState::GameOver => {}
        }
    }

    /// Press a named on-screen control. Unknown names are ignored.
    pub fn press_action(&mut self, name: &str) -> Option<PadAction> {
        let Some(action) = PadAction::from_name(name) else {
            tracing::debug!(name, "unknown control pressed");
            return None;
        };
        match action {
            PadAction::Hold(button) => self.input.press(button, self.clock),
            PadAction::HardDrop => self.hard_drop(),
        }
        Some(action)
    }

    /// Release a named on-screen control. Unknown names are ignored.
    pub fn release_action(&mut self, name: &str) -> Option<PadAction> {
        let Some(action) = PadAction::from_name(name) else {
            tracing::debug!(name, "unknown control released");
            return None;
        };
        if let PadAction::Hold(button) = action {
            self.input.release(button);
        }
        Some(action)
    }

    /// Lock the current piece, check lines and spawn the next one
    fn land(&mut self) {
        self.board
            .lock(&self.current.shape, self.current.position, self.current.color);
        tracing::debug!(
            kind = ?self.current.kind,
            x = self.current.position.x,
            y = self.current.position.y,
            "piece locked"
        );
        self.line_clear.check(&self.board, &mut self.score);
        self.spawn_next();
    }

    /// Promote the next piece and roll a new one. If the promoted piece
    /// overlaps locked blocks the game is over.
    fn spawn_next(&mut self) {
        let upcoming = Piece::spawn(random_entry(&mut self.rng));
        self.current = std::mem::replace(&mut self.next, upcoming);
        if self.current.collides(&self.board) {
            self.state = GameState::GameOver;
            self.input.clear();
            tracing::info!(
                score = self.score.points,
                lines = self.score.lines,
                "game over"
            );
        }
    }
}

fn speed_ramp(timing: &Timing) -> SpeedRamp {
    SpeedRamp::new(
        timing.initial_fall_ms,
        timing.speed_increase_interval,
        timing.speed_increase_factor,
    )
}

/// Fractional milliseconds, exact for whole-millisecond durations
fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
