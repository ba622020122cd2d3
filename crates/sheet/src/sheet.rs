//! The sheet engine: one grid, one selection/editing state, one clipboard.
//!
//! All input arrives through [`SheetEngine::handle`], which runs to
//! completion before the next event. Every committed grid mutation is
//! reported to the change callback with the full updated grid.

use opsgrid_config::Settings;
use opsgrid_core::keys::{KeyIntent, Modifiers};
use opsgrid_core::selection::CellPos;
use opsgrid_engine::events::{ChangeCallback, GridChange};
use opsgrid_engine::formula::eval::ErrorMarker;
use opsgrid_engine::grid::Grid;

use crate::clipboard::Clipboard;
use crate::context_menu::{ContextMenu, MenuCommand};
use crate::mode::SheetState;

/// Host input, already stripped of toolkit event objects.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Click { row: usize, col: usize, shift: bool },
    DoubleClick { row: usize, col: usize },
    Key(KeyIntent),
    /// Editor lost focus
    Blur,
    OpenContextMenu { row: usize, col: usize },
    CloseContextMenu,
    Menu(MenuCommand),
}

pub struct SheetEngine {
    pub(crate) grid: Grid,
    pub(crate) state: SheetState,
    pub(crate) clipboard: Clipboard,
    pub(crate) menu: ContextMenu,
    pub(crate) tab_moves_right: bool,
    on_change: Option<ChangeCallback>,
}

impl std::fmt::Debug for SheetEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetEngine")
            .field("rows", &self.grid.rows())
            .field("cols", &self.grid.cols())
            .field("state", &self.state)
            .field("menu", &self.menu)
            .finish()
    }
}

impl SheetEngine {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            state: SheetState::Idle,
            clipboard: Clipboard::default(),
            menu: ContextMenu::default(),
            tab_moves_right: true,
            on_change: None,
        }
    }

    /// Apply user settings to an existing grid.
    pub fn with_settings(mut grid: Grid, settings: &Settings) -> Self {
        grid.set_error_marker(if settings.formula_error_detail {
            ErrorMarker::WithSource
        } else {
            ErrorMarker::Plain
        });
        let mut engine = Self::new(grid);
        engine.tab_moves_right = settings.tab_moves_right;
        engine
    }

    /// Fresh empty grid sized from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_settings(Grid::new(settings.default_rows, settings.default_columns), settings)
    }

    /// Register the change callback (replaces any previous one).
    pub fn on_change(mut self, callback: impl FnMut(&GridChange, &Grid) + 'static) -> Self {
        self.set_on_change(callback);
        self
    }

    pub fn set_on_change(&mut self, callback: impl FnMut(&GridChange, &Grid) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &SheetState {
        &self.state
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn menu(&self) -> &ContextMenu {
        &self.menu
    }

    /// The transition function.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Click { row, col, shift } => self.click(row, col, shift),
            InputEvent::DoubleClick { row, col } => self.double_click(row, col),
            InputEvent::Key(intent) => self.key(intent),
            InputEvent::Blur => self.commit_edit(),
            InputEvent::OpenContextMenu { row, col } => self.open_context_menu(row, col),
            InputEvent::CloseContextMenu => self.menu.close(),
            InputEvent::Menu(command) => self.run_menu_command(command),
        }
    }

    /// Convenience for hosts that only have a key name.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) {
        match KeyIntent::from_key(key, modifiers) {
            Some(intent) => self.key(intent),
            None => log::debug!("ignoring unmapped key {:?}", key),
        }
    }

    fn key(&mut self, intent: KeyIntent) {
        if self.state.is_editing() {
            self.editing_key(intent);
            return;
        }

        match intent {
            KeyIntent::Move(direction) => self.move_selection(direction),
            KeyIntent::Tab => self.move_selection(opsgrid_core::keys::Direction::Right),
            KeyIntent::Enter | KeyIntent::BeginEdit => self.begin_edit(),
            KeyIntent::Clear | KeyIntent::Backspace => self.clear_selection(),
            KeyIntent::Insert(c) => self.begin_edit_with(c.to_string()),
            KeyIntent::Cancel => self.collapse_selection(),
            KeyIntent::Copy => self.copy(),
            KeyIntent::Paste => self.paste(),
        }
    }

    pub(crate) fn notify(&mut self, change: GridChange) {
        log::debug!("grid change: {:?}", change);
        if let Some(callback) = self.on_change.as_mut() {
            callback(&change, &self.grid);
        }
    }

    pub(crate) fn in_bounds(&self, row: usize, col: usize) -> Option<CellPos> {
        self.grid.contains(row, col).then(|| CellPos::new(row, col))
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    /// Insert an empty row at `index`. Returns false if rejected.
    pub fn insert_row(&mut self, index: usize) -> bool {
        self.commit_edit();
        match self.grid.insert_row(index) {
            Ok(()) => {
                self.notify(GridChange::RowInserted { index });
                true
            }
            Err(e) => {
                log::debug!("insert row rejected: {}", e);
                false
            }
        }
    }

    /// Delete the row at `index`. The last row is never deleted.
    pub fn delete_row(&mut self, index: usize) -> bool {
        self.commit_edit();
        match self.grid.delete_row(index) {
            Ok(()) => {
                self.clamp_state();
                self.notify(GridChange::RowDeleted { index });
                true
            }
            Err(e) => {
                log::debug!("delete row rejected: {}", e);
                false
            }
        }
    }

    pub fn insert_column(&mut self, index: usize) -> bool {
        self.commit_edit();
        match self.grid.insert_column(index) {
            Ok(()) => {
                self.notify(GridChange::ColumnInserted { index });
                true
            }
            Err(e) => {
                log::debug!("insert column rejected: {}", e);
                false
            }
        }
    }

    pub fn delete_column(&mut self, index: usize) -> bool {
        self.commit_edit();
        match self.grid.delete_column(index) {
            Ok(()) => {
                self.clamp_state();
                self.notify(GridChange::ColumnDeleted { index });
                true
            }
            Err(e) => {
                log::debug!("delete column rejected: {}", e);
                false
            }
        }
    }

    fn clamp_state(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = state.clamped(self.grid.rows(), self.grid.cols());
    }
}
