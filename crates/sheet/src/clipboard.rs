//! Clipboard operations for the sheet engine.
//!
//! This module contains:
//! - `Clipboard`, an owned snapshot of a copied block
//! - Copy of the current selection
//! - Paste at the anchor, clipped to the grid

use opsgrid_engine::cell::{Cell, CellPatch};
use opsgrid_engine::events::GridChange;

use crate::sheet::SheetEngine;

/// Deep copy of the last copied block, row-major. Later edits to the grid
/// never show up here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    block: Option<Vec<Vec<Cell>>>,
}

impl Clipboard {
    pub fn capture(&mut self, block: Vec<Vec<Cell>>) {
        self.block = Some(block);
    }

    pub fn block(&self) -> Option<&[Vec<Cell>]> {
        self.block.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_none()
    }

    /// `(rows, cols)` of the copied block.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.block
            .as_ref()
            .map(|b| (b.len(), b.first().map(|r| r.len()).unwrap_or(0)))
    }

    /// Tab-separated edit text (formulas where present), for a system clipboard.
    pub fn to_tsv(&self) -> String {
        let Some(block) = &self.block else { return String::new() };
        block
            .iter()
            .map(|row| row.iter().map(|c| c.edit_text()).collect::<Vec<_>>().join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl SheetEngine {
    /// Copy the selected cell or range. Nothing to copy while idle or editing.
    pub(crate) fn copy(&mut self) {
        let Some(range) = self.state.selected_range() else { return };

        let block: Vec<Vec<Cell>> = (range.start_row..=range.end_row)
            .map(|row| {
                (range.start_col..=range.end_col)
                    .map(|col| self.grid.cell(row, col).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        log::debug!("copied {}x{} block", range.rows(), range.cols());
        self.clipboard.capture(block);
    }

    /// Write the clipboard block with its top-left at the anchor. Cells past
    /// the grid edge are dropped; the grid never grows. Stored values and
    /// formulas are written as-is.
    pub(crate) fn paste(&mut self) {
        if self.state.is_editing() {
            return;
        }
        let Some(anchor) = self.state.anchor() else { return };
        let Some(block) = self.clipboard.block() else { return };

        let rows = block.len().min(self.grid.rows() - anchor.row);
        let cols = block
            .first()
            .map(|r| r.len())
            .unwrap_or(0)
            .min(self.grid.cols() - anchor.col);

        let mut written = Vec::with_capacity(rows * cols);
        for (dr, source_row) in block.iter().take(rows).enumerate() {
            for (dc, cell) in source_row.iter().take(cols).enumerate() {
                let patch = CellPatch {
                    style: Some(cell.style.clone()),
                    ..CellPatch::content_of(cell)
                };
                written.push((anchor.row + dr, anchor.col + dc, patch));
            }
        }

        for (row, col, patch) in written {
            if let Err(e) = self.grid.set_cell(row, col, patch) {
                log::warn!("paste skipped cell: {}", e);
            }
        }

        self.notify(GridChange::Pasted { row: anchor.row, col: anchor.col, rows, cols });
    }
}
