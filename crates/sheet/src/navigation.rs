//! Selection operations
//!
//! Contains:
//! - Click / shift-click selection
//! - Arrow-key movement (clamped, always collapses ranges)
//! - Double-click into edit mode

use opsgrid_core::keys::Direction;
use opsgrid_core::selection::{CellPos, Range};

use crate::mode::SheetState;
use crate::sheet::SheetEngine;

impl SheetEngine {
    /// Plain click selects one cell and drops any range. Shift-click extends
    /// from the current anchor.
    pub(crate) fn click(&mut self, row: usize, col: usize, shift: bool) {
        let Some(target) = self.in_bounds(row, col) else { return };

        self.menu.close();
        self.commit_edit();

        let anchor = if shift { self.state.anchor() } else { None };
        self.state = match anchor {
            Some(anchor) if anchor != target => SheetState::RangeSelected {
                anchor,
                range: Range::spanning(anchor, target),
            },
            _ => SheetState::CellSelected(target),
        };
    }

    pub(crate) fn double_click(&mut self, row: usize, col: usize) {
        let Some(target) = self.in_bounds(row, col) else { return };

        self.menu.close();
        self.commit_edit();
        self.state = SheetState::CellSelected(target);
        self.begin_edit();
    }

    /// Move the anchor one cell, clamped to the grid. From idle the first
    /// arrow press selects A1.
    pub(crate) fn move_selection(&mut self, direction: Direction) {
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        let next = match self.state.anchor() {
            Some(anchor) => {
                let (d_row, d_col) = direction.delta();
                anchor.offset(d_row, d_col, rows, cols)
            }
            None => CellPos::new(0, 0),
        };
        self.state = SheetState::CellSelected(next);
    }

    /// Escape outside edit mode: a range shrinks back to its anchor.
    pub(crate) fn collapse_selection(&mut self) {
        self.menu.close();
        if let SheetState::RangeSelected { anchor, .. } = self.state {
            self.state = SheetState::CellSelected(anchor);
        }
    }
}
