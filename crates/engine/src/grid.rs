use std::fmt;

use serde::Serialize;

use super::cell::{classify_input, Cell, CellKind, CellPatch, CellValue, Input};
use super::col_label::cell_address;
use super::formula::eval::{self, CellLookup, ErrorMarker, EvalResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Cell coordinates outside the grid.
    OutOfBounds { row: usize, col: usize, rows: usize, cols: usize },
    /// Row insert/delete index outside the valid range.
    RowIndex { index: usize, rows: usize },
    /// Column insert/delete index outside the valid range.
    ColumnIndex { index: usize, cols: usize },
    /// The grid always keeps at least one row.
    LastRow,
    /// The grid always keeps at least one column.
    LastColumn,
    /// Initial rows were empty.
    Empty,
    /// Initial rows had differing lengths.
    Ragged { row: usize, expected: usize, found: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { row, col, rows, cols } => {
                write!(f, "cell {} is outside the {rows}x{cols} grid", cell_address(*row, *col))
            }
            Self::RowIndex { index, rows } => write!(f, "row index {index} out of range for {rows} rows"),
            Self::ColumnIndex { index, cols } => write!(f, "column index {index} out of range for {cols} columns"),
            Self::LastRow => write!(f, "cannot delete the last row"),
            Self::LastColumn => write!(f, "cannot delete the last column"),
            Self::Empty => write!(f, "grid needs at least one row and one column"),
            Self::Ragged { row, expected, found } => {
                write!(f, "row {row} has {found} cells, expected {expected}")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Rectangular `rows x cols` matrix of cells.
///
/// Every row holds exactly `cols` cells and there is always at least one row
/// and one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    cols: usize,
    #[serde(skip)]
    error_marker: ErrorMarker,
}

impl CellLookup for Grid {
    fn numeric_at(&self, row: usize, col: usize) -> Option<f64> {
        self.cell(row, col).and_then(|c| c.value.as_number())
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.rows(), self.cols)
    }
}

impl Grid {
    /// Empty grid; each dimension is floored at one.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            cells: vec![vec![Cell::new(); cols]; rows],
            cols,
            error_marker: ErrorMarker::default(),
        }
    }

    pub fn from_rows(cells: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let cols = cells.first().map(|r| r.len()).unwrap_or(0);
        if cols == 0 {
            return Err(GridError::Empty);
        }
        if let Some((row, r)) = cells.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(GridError::Ragged { row, expected: cols, found: r.len() });
        }
        Ok(Self { cells, cols, error_marker: ErrorMarker::default() })
    }

    pub fn with_error_marker(mut self, marker: ErrorMarker) -> Self {
        self.error_marker = marker;
        self
    }

    pub fn set_error_marker(&mut self, marker: ErrorMarker) {
        self.error_marker = marker;
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn row_slice(&self, row: usize) -> Option<&[Cell]> {
        self.cells.get(row).map(|r| r.as_slice())
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|r| r.as_slice())
    }

    pub fn display(&self, row: usize, col: usize) -> String {
        self.cell(row, col).map(|c| c.value.raw_display()).unwrap_or_default()
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell, GridError> {
        let (rows, cols) = (self.rows(), self.cols);
        self.cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(GridError::OutOfBounds { row, col, rows, cols })
    }

    /// Replace a subset of the cell's fields. Never grows the grid.
    pub fn set_cell(&mut self, row: usize, col: usize, patch: CellPatch) -> Result<(), GridError> {
        self.cell_mut(row, col)?.apply(patch);
        Ok(())
    }

    /// Commit raw editor text: classify it, evaluate formulas against the
    /// current grid, and store the result. Style is kept.
    pub fn set_input(&mut self, row: usize, col: usize, input: &str) -> Result<(), GridError> {
        if !self.contains(row, col) {
            return Err(GridError::OutOfBounds { row, col, rows: self.rows(), cols: self.cols });
        }
        let patch = self.patch_for_input(input);
        self.set_cell(row, col, patch)
    }

    fn patch_for_input(&self, input: &str) -> CellPatch {
        let (value, formula, kind) = match classify_input(input) {
            Input::Empty => (CellValue::Empty, None, CellKind::Text),
            Input::Number(n) => (CellValue::Number(n), None, CellKind::Number),
            Input::Date(d) => (CellValue::Date(d.to_string()), None, CellKind::Date),
            Input::Text(s) => (CellValue::Text(s.to_string()), None, CellKind::Text),
            Input::Formula(source) => {
                let text = format!("={}", source);
                let value = match eval::evaluate(source, self) {
                    EvalResult::Number(n) => CellValue::Number(n),
                    EvalResult::Date(d) => CellValue::Date(d),
                    EvalResult::Error(_) => CellValue::Text(self.error_marker.render(&text)),
                };
                (value, Some(text), CellKind::Formula)
            }
        };
        CellPatch {
            value: Some(value),
            formula: Some(formula),
            kind: Some(kind),
            style: None,
        }
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.cell_mut(row, col)?.clear();
        Ok(())
    }

    /// Insert an empty row at `index` (0..=rows), shifting later rows down.
    pub fn insert_row(&mut self, index: usize) -> Result<(), GridError> {
        if index > self.rows() {
            return Err(GridError::RowIndex { index, rows: self.rows() });
        }
        self.cells.insert(index, vec![Cell::new(); self.cols]);
        log::debug!("inserted row {} ({} rows)", index, self.rows());
        Ok(())
    }

    /// Remove the row at `index`. The last remaining row cannot be deleted.
    pub fn delete_row(&mut self, index: usize) -> Result<(), GridError> {
        if index >= self.rows() {
            return Err(GridError::RowIndex { index, rows: self.rows() });
        }
        if self.rows() <= 1 {
            return Err(GridError::LastRow);
        }
        self.cells.remove(index);
        log::debug!("deleted row {} ({} rows)", index, self.rows());
        Ok(())
    }

    /// Insert an empty column at `index` (0..=cols), shifting later columns right.
    pub fn insert_column(&mut self, index: usize) -> Result<(), GridError> {
        if index > self.cols {
            return Err(GridError::ColumnIndex { index, cols: self.cols });
        }
        for row in &mut self.cells {
            row.insert(index, Cell::new());
        }
        self.cols += 1;
        log::debug!("inserted column {} ({} columns)", index, self.cols);
        Ok(())
    }

    /// Remove the column at `index`. The last remaining column cannot be deleted.
    pub fn delete_column(&mut self, index: usize) -> Result<(), GridError> {
        if index >= self.cols {
            return Err(GridError::ColumnIndex { index, cols: self.cols });
        }
        if self.cols <= 1 {
            return Err(GridError::LastColumn);
        }
        for row in &mut self.cells {
            row.remove(index);
        }
        self.cols -= 1;
        log::debug!("deleted column {} ({} columns)", index, self.cols);
        Ok(())
    }

    /// Tab-separated display values, one line per row.
    pub fn to_tsv(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.value.raw_display())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every row has `cols` cells and neither dimension is zero.
    pub fn is_rectangular(&self) -> bool {
        self.cols >= 1 && !self.cells.is_empty() && self.cells.iter().all(|r| r.len() == self.cols)
    }
}
