//! Keyboard input as intents.
//!
//! Hosts translate their own key events into a key name plus modifiers and
//! call [`KeyIntent::from_key`]. The sheet state machine only sees intents,
//! so it never touches toolkit event objects.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (d_row, d_col)
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Cmd on macOS
    pub platform: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Ctrl or Cmd, whichever the platform uses for clipboard shortcuts.
    pub fn primary(&self) -> bool {
        self.ctrl || self.platform
    }
}

/// What a key press means to the sheet, independent of the current state.
///
/// `Enter` is both "begin edit" and "commit" depending on state, so it stays
/// a single intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Move(Direction),
    Enter,
    /// F2
    BeginEdit,
    /// Escape
    Cancel,
    Tab,
    /// Delete key
    Clear,
    Backspace,
    /// Printable character
    Insert(char),
    Copy,
    Paste,
}

impl KeyIntent {
    /// Map a host key name to an intent. Names follow the DOM `KeyboardEvent.key`
    /// spelling with a few short aliases (`up`, `esc`, `del`). Unknown keys
    /// return `None`.
    pub fn from_key(key: &str, modifiers: Modifiers) -> Option<KeyIntent> {
        if modifiers.primary() {
            return match key.to_ascii_lowercase().as_str() {
                "c" => Some(KeyIntent::Copy),
                "v" => Some(KeyIntent::Paste),
                _ => None,
            };
        }

        let intent = match key.to_ascii_lowercase().as_str() {
            "arrowup" | "up" => KeyIntent::Move(Direction::Up),
            "arrowdown" | "down" => KeyIntent::Move(Direction::Down),
            "arrowleft" | "left" => KeyIntent::Move(Direction::Left),
            "arrowright" | "right" => KeyIntent::Move(Direction::Right),
            "enter" | "return" => KeyIntent::Enter,
            "f2" => KeyIntent::BeginEdit,
            "escape" | "esc" => KeyIntent::Cancel,
            "tab" => KeyIntent::Tab,
            "delete" | "del" => KeyIntent::Clear,
            "backspace" => KeyIntent::Backspace,
            "space" => KeyIntent::Insert(' '),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => KeyIntent::Insert(c),
                    _ => return None,
                }
            }
        };
        Some(intent)
    }
}
