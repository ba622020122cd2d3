//! Right-click menu over structural edits and the clipboard.

use opsgrid_core::selection::CellPos;

use crate::mode::SheetState;
use crate::sheet::SheetEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    InsertRowAbove,
    InsertRowBelow,
    InsertColumnLeft,
    InsertColumnRight,
    DeleteRow,
    DeleteColumn,
    Copy,
    Paste,
}

impl MenuCommand {
    pub fn all() -> &'static [MenuCommand] {
        &[
            MenuCommand::InsertRowAbove,
            MenuCommand::InsertRowBelow,
            MenuCommand::InsertColumnLeft,
            MenuCommand::InsertColumnRight,
            MenuCommand::DeleteRow,
            MenuCommand::DeleteColumn,
            MenuCommand::Copy,
            MenuCommand::Paste,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuCommand::InsertRowAbove => "Insert Row Above",
            MenuCommand::InsertRowBelow => "Insert Row Below",
            MenuCommand::InsertColumnLeft => "Insert Column Left",
            MenuCommand::InsertColumnRight => "Insert Column Right",
            MenuCommand::DeleteRow => "Delete Row",
            MenuCommand::DeleteColumn => "Delete Column",
            MenuCommand::Copy => "Copy",
            MenuCommand::Paste => "Paste",
        }
    }

    /// Kebab-case command name as used in scripts (`insert-row-above`).
    pub fn name(&self) -> &'static str {
        match self {
            MenuCommand::InsertRowAbove => "insert-row-above",
            MenuCommand::InsertRowBelow => "insert-row-below",
            MenuCommand::InsertColumnLeft => "insert-column-left",
            MenuCommand::InsertColumnRight => "insert-column-right",
            MenuCommand::DeleteRow => "delete-row",
            MenuCommand::DeleteColumn => "delete-column",
            MenuCommand::Copy => "copy",
            MenuCommand::Paste => "paste",
        }
    }

    pub fn from_name(name: &str) -> Option<MenuCommand> {
        let name = name.trim().to_ascii_lowercase();
        Self::all().iter().copied().find(|c| c.name() == name)
    }
}

/// Which cell was right-clicked and whether the menu is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMenu {
    target: Option<CellPos>,
    open: bool,
}

impl ContextMenu {
    pub fn open_at(&mut self, target: CellPos) {
        self.target = Some(target);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.target = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn target(&self) -> Option<CellPos> {
        self.target
    }
}

impl SheetEngine {
    pub(crate) fn open_context_menu(&mut self, row: usize, col: usize) {
        let Some(target) = self.in_bounds(row, col) else { return };

        self.commit_edit();
        let inside = self
            .state
            .selected_range()
            .map(|r| r.contains(row, col))
            .unwrap_or(false);
        if !inside {
            self.state = SheetState::CellSelected(target);
        }
        self.menu.open_at(target);
    }

    /// Run a command against the right-clicked cell. Ignored unless the menu
    /// is open. The menu is closed afterwards either way.
    pub(crate) fn run_menu_command(&mut self, command: MenuCommand) {
        let target = match (self.menu.is_open(), self.menu.target()) {
            (true, Some(target)) => target,
            _ => {
                log::debug!("menu command {:?} with no open menu", command);
                return;
            }
        };

        match command {
            MenuCommand::InsertRowAbove => {
                self.insert_row(target.row);
            }
            MenuCommand::InsertRowBelow => {
                self.insert_row(target.row + 1);
            }
            MenuCommand::InsertColumnLeft => {
                self.insert_column(target.col);
            }
            MenuCommand::InsertColumnRight => {
                self.insert_column(target.col + 1);
            }
            MenuCommand::DeleteRow => {
                self.delete_row(target.row);
            }
            MenuCommand::DeleteColumn => {
                self.delete_column(target.col);
            }
            MenuCommand::Copy => self.copy(),
            MenuCommand::Paste => self.paste(),
        }
        self.menu.close();
    }
}
