//! Input handling
//!
//! Two styles feed the same action set. Discrete key presses map straight to
//! one [`Action`] each. On-screen buttons are held: [`HeldButtons`] is polled
//! every tick and fires after an initial delay, then at the repeat rate.

use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Pause,
    Restart,
    Quit,
}

/// Buttons that repeat while held, in the order they are evaluated each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Rotate,
    Down,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Left, Button::Right, Button::Rotate, Button::Down];

    fn index(self) -> usize {
        self as usize
    }
}

/// A named on-screen control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadAction {
    Hold(Button),
    HardDrop,
}

impl PadAction {
    /// Parse a control name such as `move-left` or `hard-drop`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "move-left" => Some(PadAction::Hold(Button::Left)),
            "move-right" => Some(PadAction::Hold(Button::Right)),
            "rotate" => Some(PadAction::Hold(Button::Rotate)),
            "move-down" | "soft-drop" => Some(PadAction::Hold(Button::Down)),
            "hard-drop" => Some(PadAction::HardDrop),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PadAction::Hold(Button::Left) => "move-left",
            PadAction::Hold(Button::Right) => "move-right",
            PadAction::Hold(Button::Rotate) => "rotate",
            PadAction::Hold(Button::Down) => "move-down",
            PadAction::HardDrop => "hard-drop",
        }
    }
}

/// Held-button state with initial-delay / repeat-delay gating.
///
/// All buttons share one "last move" timestamp and one first-move flag, so
/// at most one held button fires per tick.
#[derive(Debug, Clone)]
pub struct HeldButtons {
    held: [bool; 4],
    first_move: bool,
    last_move: Duration,
    initial_delay: Duration,
    repeat_delay: Duration,
}

impl HeldButtons {
    pub fn new(initial_delay: Duration, repeat_delay: Duration) -> Self {
        Self {
            held: [false; 4],
            first_move: true,
            last_move: Duration::ZERO,
            initial_delay,
            repeat_delay,
        }
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.held[button.index()]
    }

    /// Start holding `button` at game time `now`
    pub fn press(&mut self, button: Button, now: Duration) {
        if self.is_held(button) {
            return;
        }
        self.held[button.index()] = true;
        self.first_move = true;
        self.last_move = now;
    }

    /// Stop holding `button`
    pub fn release(&mut self, button: Button) {
        if !self.is_held(button) {
            return;
        }
        self.held[button.index()] = false;
        self.first_move = true;
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.held = [false; 4];
        self.first_move = true;
    }

    /// Buttons due to fire at game time `now`. Every held button is checked
    /// independently, in [`Button::ALL`] order, against the shared gate.
    pub fn poll(&mut self, now: Duration) -> Vec<Button> {
        let mut fired = Vec::new();
        for button in Button::ALL {
            if self.is_held(button) && self.ready(now) {
                fired.push(button);
                self.last_move = now;
                self.first_move = false;
            }
        }
        fired
    }

    fn ready(&self, now: Duration) -> bool {
        let delay = if self.first_move {
            self.initial_delay
        } else {
            self.repeat_delay
        };
        now.saturating_sub(self.last_move) >= delay
    }
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub pause: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode, `None` if unrecognised
    fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings, skipping (and logging) bad entries
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    tracing::warn!(key = %s, "ignoring unknown key binding");
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            rotate: Self::parse_keys(&settings.keys.rotate),
            hard_drop: Self::parse_keys(&settings.keys.hard_drop),
            pause: Self::parse_keys(&settings.keys.pause),
            restart: Self::parse_keys(&settings.keys.restart),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }

    /// Map a key press to its action
    pub fn action_for(&self, key: KeyEvent) -> Option<Action> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let code = normalize_key(key.code);
        let table = [
            (&self.move_left, Action::MoveLeft),
            (&self.move_right, Action::MoveRight),
            (&self.soft_drop, Action::SoftDrop),
            (&self.rotate, Action::Rotate),
            (&self.hard_drop, Action::HardDrop),
            (&self.pause, Action::Pause),
            (&self.restart, Action::Restart),
            (&self.quit, Action::Quit),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keys.contains(&code))
            .map(|(_, action)| action)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
