//! Replay scripts: one UI event per line, fed to a headless sheet.
//!
//! ```text
//! # comment
//! click A1
//! type 10
//! key Enter
//! shift-click B2
//! dblclick A1
//! rclick B2
//! menu insert-row-above
//! key Ctrl+C
//! copy
//! paste
//! blur
//! ```
//!
//! `type` sends every character after the first space, spaces included.

use std::fmt;

use opsgrid_core::keys::{KeyIntent, Modifiers};
use opsgrid_engine::col_label::parse_cell_address;
use opsgrid_sheet::{InputEvent, MenuCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    UnknownCommand { line: usize, command: String },
    MissingArgument { line: usize, command: String },
    BadAddress { line: usize, address: String },
    UnknownKey { line: usize, key: String },
    UnknownMenuCommand { line: usize, name: String },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand { line, command } => {
                write!(f, "line {line}: unknown command '{command}'")
            }
            Self::MissingArgument { line, command } => {
                write!(f, "line {line}: '{command}' needs an argument")
            }
            Self::BadAddress { line, address } => {
                write!(f, "line {line}: invalid cell address '{address}'")
            }
            Self::UnknownKey { line, key } => write!(f, "line {line}: unknown key '{key}'"),
            Self::UnknownMenuCommand { line, name } => {
                write!(f, "line {line}: unknown menu command '{name}'")
            }
        }
    }
}

impl std::error::Error for ScriptError {}

/// Parse a whole script into the events it sends, in order.
pub fn parse_script(source: &str) -> Result<Vec<InputEvent>, ScriptError> {
    let mut events = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (command, rest) = match trimmed.split_once(' ') {
            Some((command, rest)) => (command, rest),
            None => (trimmed.trim_end(), ""),
        };
        let arg = rest.trim();

        match command.to_ascii_lowercase().as_str() {
            "click" => {
                let (row, col) = address(line, required(line, "click", arg)?)?;
                events.push(InputEvent::Click { row, col, shift: false });
            }
            "shift-click" => {
                let (row, col) = address(line, required(line, "shift-click", arg)?)?;
                events.push(InputEvent::Click { row, col, shift: true });
            }
            "dblclick" => {
                let (row, col) = address(line, required(line, "dblclick", arg)?)?;
                events.push(InputEvent::DoubleClick { row, col });
            }
            "rclick" => {
                let (row, col) = address(line, required(line, "rclick", arg)?)?;
                events.push(InputEvent::OpenContextMenu { row, col });
            }
            "menu" => {
                let name = required(line, "menu", arg)?;
                let command = MenuCommand::from_name(name).ok_or_else(|| {
                    ScriptError::UnknownMenuCommand { line, name: name.to_string() }
                })?;
                events.push(InputEvent::Menu(command));
            }
            "close-menu" => events.push(InputEvent::CloseContextMenu),
            "key" => events.push(InputEvent::Key(key_chord(line, required(line, "key", arg)?)?)),
            "type" => {
                // Keep inner and trailing spaces; only the separator is dropped
                let text = required(line, "type", rest)?;
                events.extend(text.chars().map(|c| InputEvent::Key(KeyIntent::Insert(c))));
            }
            "copy" => events.push(InputEvent::Key(KeyIntent::Copy)),
            "paste" => events.push(InputEvent::Key(KeyIntent::Paste)),
            "blur" => events.push(InputEvent::Blur),
            other => {
                return Err(ScriptError::UnknownCommand { line, command: other.to_string() })
            }
        }
    }

    Ok(events)
}

fn required<'a>(line: usize, command: &str, arg: &'a str) -> Result<&'a str, ScriptError> {
    if arg.is_empty() {
        Err(ScriptError::MissingArgument { line, command: command.to_string() })
    } else {
        Ok(arg)
    }
}

fn address(line: usize, text: &str) -> Result<(usize, usize), ScriptError> {
    parse_cell_address(text).ok_or_else(|| ScriptError::BadAddress { line, address: text.to_string() })
}

/// `Enter`, `Ctrl+C`, `Cmd+V`, `Shift+Tab`.
fn key_chord(line: usize, chord: &str) -> Result<KeyIntent, ScriptError> {
    let mut modifiers = Modifiers::none();
    let mut parts: Vec<&str> = chord.split('+').collect();
    // A bare "+" is the plus key, not a separator
    let key = if chord.ends_with("++") || chord == "+" {
        parts.truncate(parts.len().saturating_sub(2));
        "+"
    } else {
        parts.pop().unwrap_or_default()
    };

    for part in parts {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.ctrl = true,
            "cmd" | "meta" | "super" => modifiers.platform = true,
            "shift" => modifiers.shift = true,
            "alt" | "option" => modifiers.alt = true,
            _ => return Err(ScriptError::UnknownKey { line, key: chord.to_string() }),
        }
    }

    KeyIntent::from_key(key, modifiers)
        .ok_or_else(|| ScriptError::UnknownKey { line, key: chord.to_string() })
}
