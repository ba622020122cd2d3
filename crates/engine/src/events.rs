//! Change notifications for grid mutations.
//!
//! The host registers a callback at construction time and receives one
//! `GridChange` per committed mutation together with the full updated grid.
//! Persistence and re-rendering hang off this hook.

use crate::grid::Grid;

/// A committed mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum GridChange {
    /// An edit was committed into a cell.
    CellCommitted { row: usize, col: usize },
    /// Value and formula were cleared in a rectangular block.
    CellsCleared { start_row: usize, start_col: usize, end_row: usize, end_col: usize },
    RowInserted { index: usize },
    RowDeleted { index: usize },
    ColumnInserted { index: usize },
    ColumnDeleted { index: usize },
    /// Clipboard block written at an anchor; `rows`/`cols` is the clipped size.
    Pasted { row: usize, col: usize, rows: usize, cols: usize },
}

/// Callback type for receiving grid changes.
pub type ChangeCallback = Box<dyn FnMut(&GridChange, &Grid)>;

/// Simple change collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<GridChange>,
    /// `(rows, cols)` of the grid passed with each event
    shapes: Vec<(usize, usize)>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: &GridChange, grid: &Grid) {
        self.events.push(change.clone());
        self.shapes.push((grid.rows(), grid.cols()));
    }

    pub fn events(&self) -> &[GridChange] {
        &self.events
    }

    pub fn shapes(&self) -> &[(usize, usize)] {
        &self.shapes
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to structural (row/column) changes.
    pub fn structural(&self) -> Vec<&GridChange> {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GridChange::RowInserted { .. }
                        | GridChange::RowDeleted { .. }
                        | GridChange::ColumnInserted { .. }
                        | GridChange::ColumnDeleted { .. }
                )
            })
            .collect()
    }
}
