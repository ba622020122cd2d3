//! Edit mode: begin, type, commit, cancel, and clearing selected cells.

use opsgrid_core::keys::{Direction, KeyIntent};
use opsgrid_engine::events::GridChange;

use crate::mode::SheetState;
use crate::sheet::SheetEngine;

impl SheetEngine {
    /// Enter edit mode on the anchor with the cell's current text (formula if any).
    pub(crate) fn begin_edit(&mut self) {
        let Some(pos) = self.state.anchor() else { return };
        let buffer = self
            .grid
            .cell(pos.row, pos.col)
            .map(|c| c.edit_text())
            .unwrap_or_default();
        self.state = SheetState::Editing { pos, buffer };
    }

    /// Enter edit mode replacing the cell's text (typing onto a selected cell).
    pub(crate) fn begin_edit_with(&mut self, buffer: String) {
        let Some(pos) = self.state.anchor() else { return };
        self.state = SheetState::Editing { pos, buffer };
    }

    pub(crate) fn editing_key(&mut self, intent: KeyIntent) {
        match intent {
            KeyIntent::Enter => self.commit_edit(),
            KeyIntent::Tab => {
                self.commit_edit();
                if self.tab_moves_right {
                    self.move_selection(Direction::Right);
                }
            }
            KeyIntent::Cancel => self.cancel_edit(),
            KeyIntent::Insert(c) => {
                if let SheetState::Editing { buffer, .. } = &mut self.state {
                    buffer.push(c);
                }
            }
            KeyIntent::Backspace => {
                if let SheetState::Editing { buffer, .. } = &mut self.state {
                    buffer.pop();
                }
            }
            // No caret model: navigation, F2, Delete and clipboard keys do nothing while editing
            KeyIntent::Move(_)
            | KeyIntent::BeginEdit
            | KeyIntent::Clear
            | KeyIntent::Copy
            | KeyIntent::Paste => {}
        }
    }

    /// Replace the transient editor text (hosts with their own text input).
    pub fn set_edit_buffer(&mut self, text: &str) {
        if let SheetState::Editing { buffer, .. } = &mut self.state {
            buffer.clear();
            buffer.push_str(text);
        }
    }

    /// Write the edit buffer into the grid and return to cell selection.
    /// No-op when not editing.
    pub fn commit_edit(&mut self) {
        let (pos, buffer) = match std::mem::take(&mut self.state) {
            SheetState::Editing { pos, buffer } => (pos, buffer),
            other => {
                self.state = other;
                return;
            }
        };

        self.state = SheetState::CellSelected(pos);
        match self.grid.set_input(pos.row, pos.col, &buffer) {
            Ok(()) => self.notify(GridChange::CellCommitted { row: pos.row, col: pos.col }),
            Err(e) => log::warn!("commit dropped: {}", e),
        }
    }

    /// Drop the edit buffer. The grid is not touched.
    pub fn cancel_edit(&mut self) {
        if let SheetState::Editing { pos, .. } = self.state {
            self.state = SheetState::CellSelected(pos);
        }
    }

    /// Delete/Backspace outside edit mode: clear value and formula of every
    /// selected cell without entering edit mode.
    pub(crate) fn clear_selection(&mut self) {
        let Some(range) = self.state.selected_range() else { return };
        for (row, col) in range.cells() {
            if let Err(e) = self.grid.clear_cell(row, col) {
                log::warn!("clear skipped: {}", e);
            }
        }
        self.notify(GridChange::CellsCleared {
            start_row: range.start_row,
            start_col: range.start_col,
            end_row: range.end_row,
            end_col: range.end_col,
        });
    }
}

#[cfg(test)]
mod tests {
    use opsgrid_core::selection::CellPos;
    use opsgrid_engine::cell::{CellKind, CellValue};
    use opsgrid_engine::grid::Grid;

    use crate::sheet::InputEvent;

    use super::*;

    fn key(engine: &mut SheetEngine, intent: KeyIntent) {
        engine.handle(InputEvent::Key(intent));
    }

    fn type_text(engine: &mut SheetEngine, text: &str) {
        for c in text.chars() {
            key(engine, KeyIntent::Insert(c));
        }
    }

    fn selected(row: usize, col: usize) -> SheetEngine {
        let mut engine = SheetEngine::new(Grid::new(3, 3));
        engine.handle(InputEvent::Click { row, col, shift: false });
        engine
    }

    #[test]
    fn test_enter_begins_and_commits() {
        let mut e = selected(0, 0);
        key(&mut e, KeyIntent::Enter);
        assert_eq!(e.state().edit_buffer(), Some(""));
        type_text(&mut e, "42");
        key(&mut e, KeyIntent::Enter);

        assert_eq!(e.state(), &SheetState::CellSelected(CellPos::new(0, 0)));
        let cell = e.grid().cell(0, 0).unwrap();
        assert_eq!(cell.value, CellValue::Number(42.0));
        assert_eq!(cell.kind, CellKind::Number);
    }

    #[test]
    fn test_f2_seeds_buffer_with_formula() {
        let mut e = selected(0, 0);
        type_text(&mut e, "=1+2");
        key(&mut e, KeyIntent::Enter);
        key(&mut e, KeyIntent::BeginEdit);
        assert_eq!(e.state().edit_buffer(), Some("=1+2"));
    }

    #[test]
    fn test_typing_replaces_cell_text() {
        let mut e = selected(1, 1);
        type_text(&mut e, "old");
        key(&mut e, KeyIntent::Enter);
        type_text(&mut e, "new");
        assert_eq!(e.state().edit_buffer(), Some("new"));
    }

    #[test]
    fn test_escape_restores_committed_value() {
        let mut e = selected(0, 0);
        type_text(&mut e, "5");
        key(&mut e, KeyIntent::Enter);

        key(&mut e, KeyIntent::Enter);
        e.set_edit_buffer("999");
        key(&mut e, KeyIntent::Cancel);

        assert_eq!(e.state(), &SheetState::CellSelected(CellPos::new(0, 0)));
        assert_eq!(e.grid().cell(0, 0).unwrap().value, CellValue::Number(5.0));
    }

    #[test]
    fn test_backspace_while_editing() {
        let mut e = selected(0, 0);
        type_text(&mut e, "abc");
        key(&mut e, KeyIntent::Backspace);
        assert_eq!(e.state().edit_buffer(), Some("ab"));
    }

    #[test]
    fn test_arrows_ignored_while_editing() {
        let mut e = selected(1, 1);
        type_text(&mut e, "x");
        key(&mut e, KeyIntent::Move(Direction::Down));
        assert_eq!(e.state().anchor(), Some(CellPos::new(1, 1)));
        assert_eq!(e.state().edit_buffer(), Some("x"));
    }

    #[test]
    fn test_tab_commits_and_moves_right() {
        let mut e = selected(0, 1);
        type_text(&mut e, "7");
        key(&mut e, KeyIntent::Tab);
        assert_eq!(e.state(), &SheetState::CellSelected(CellPos::new(0, 2)));
        assert_eq!(e.grid().display(0, 1), "7");

        // At the right edge Tab still commits but stays put
        type_text(&mut e, "8");
        key(&mut e, KeyIntent::Tab);
        assert_eq!(e.state(), &SheetState::CellSelected(CellPos::new(0, 2)));
        assert_eq!(e.grid().display(0, 2), "8");
    }

    #[test]
    fn test_tab_without_move_setting() {
        let mut e = selected(0, 0);
        e.tab_moves_right = false;
        type_text(&mut e, "1");
        key(&mut e, KeyIntent::Tab);
        assert_eq!(e.state(), &SheetState::CellSelected(CellPos::new(0, 0)));
    }

    #[test]
    fn test_blur_commits() {
        let mut e = selected(2, 0);
        type_text(&mut e, "hello");
        e.handle(InputEvent::Blur);
        assert_eq!(e.grid().cell(2, 0).unwrap().value, CellValue::Text("hello".into()));
    }

    #[test]
    fn test_click_elsewhere_commits_first() {
        let mut e = selected(0, 0);
        type_text(&mut e, "9");
        e.handle(InputEvent::Click { row: 2, col: 2, shift: false });
        assert_eq!(e.grid().display(0, 0), "9");
        assert_eq!(e.state(), &SheetState::CellSelected(CellPos::new(2, 2)));
    }

    #[test]
    fn test_delete_clears_without_editing() {
        let mut e = selected(0, 0);
        type_text(&mut e, "=1+1");
        key(&mut e, KeyIntent::Enter);
        key(&mut e, KeyIntent::Clear);

        assert_eq!(e.state(), &SheetState::CellSelected(CellPos::new(0, 0)));
        let cell = e.grid().cell(0, 0).unwrap();
        assert_eq!(cell.value, CellValue::Empty);
        assert_eq!(cell.formula, None);
    }

    #[test]
    fn test_delete_clears_whole_range() {
        let mut e = selected(0, 0);
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            e.handle(InputEvent::Click { row, col, shift: false });
            type_text(&mut e, "1");
            key(&mut e, KeyIntent::Enter);
        }
        e.handle(InputEvent::Click { row: 0, col: 0, shift: false });
        e.handle(InputEvent::Click { row: 1, col: 0, shift: true });
        key(&mut e, KeyIntent::Backspace);

        assert!(e.grid().cell(0, 0).unwrap().is_blank());
        assert!(e.grid().cell(1, 0).unwrap().is_blank());
        assert_eq!(e.grid().display(0, 1), "1");
    }
}
