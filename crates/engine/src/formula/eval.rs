// Formula evaluator
//
// Reads the grid once at call time. No dependencies are recorded, so a stored
// result does not change when the cells it read change later.

use chrono::{Local, NaiveDate};

use super::parser::{self, Expr, Formula, Op, RangeRef};

/// Read access to grid values for formula evaluation.
pub trait CellLookup {
    /// Numeric value at (row, col), `None` for non-numeric or out-of-bounds cells.
    fn numeric_at(&self, row: usize, col: usize) -> Option<f64>;

    /// (rows, cols)
    fn dimensions(&self) -> (usize, usize);
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvalResult {
    Number(f64),
    /// `YYYY-MM-DD`
    Date(String),
    Error(String),
}

impl EvalResult {
    pub fn is_error(&self) -> bool {
        matches!(self, EvalResult::Error(_))
    }
}

/// How an evaluation error is rendered into the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMarker {
    /// `#ERROR`
    #[default]
    Plain,
    /// `#ERROR: <formula text>`
    WithSource,
}

impl ErrorMarker {
    pub fn render(&self, formula: &str) -> String {
        match self {
            ErrorMarker::Plain => "#ERROR".to_string(),
            ErrorMarker::WithSource => format!("#ERROR: {}", formula),
        }
    }
}

/// Evaluate formula source (without the leading `=`) using today's local date.
pub fn evaluate(source: &str, lookup: &impl CellLookup) -> EvalResult {
    evaluate_on(source, lookup, Local::now().date_naive())
}

/// Evaluate with an explicit date for `TODAY()`.
pub fn evaluate_on(source: &str, lookup: &impl CellLookup, today: NaiveDate) -> EvalResult {
    let formula = match parser::parse(source) {
        Ok(formula) => formula,
        Err(e) => {
            log::debug!("formula parse error in {:?}: {}", source, e);
            return EvalResult::Error(e);
        }
    };

    match formula {
        Formula::Sum(range) => EvalResult::Number(numbers_in(&range, lookup).sum()),
        Formula::Average(range) => {
            let (sum, count) = numbers_in(&range, lookup)
                .fold((0.0, 0usize), |(sum, count), n| (sum + n, count + 1));
            if count == 0 {
                EvalResult::Number(0.0)
            } else {
                EvalResult::Number(sum / count as f64)
            }
        }
        Formula::Today => EvalResult::Date(today.format("%Y-%m-%d").to_string()),
        Formula::Arithmetic(expr) => {
            let n = eval_expr(&expr);
            if n.is_finite() {
                EvalResult::Number(n)
            } else {
                log::debug!("formula {:?} produced a non-finite result", source);
                EvalResult::Error("Result is not a finite number".to_string())
            }
        }
    }
}

/// Numeric values inside the range, clipped to the grid.
fn numbers_in<'a, L: CellLookup>(range: &RangeRef, lookup: &'a L) -> impl Iterator<Item = f64> + 'a {
    let (rows, cols) = lookup.dimensions();
    let end_row = range.end_row.min(rows.saturating_sub(1));
    let end_col = range.end_col.min(cols.saturating_sub(1));
    let (start_row, start_col) = (range.start_row, range.start_col);
    let in_grid = start_row < rows && start_col < cols;

    (start_row..=end_row)
        .filter(move |_| in_grid)
        .flat_map(move |r| (start_col..=end_col).map(move |c| (r, c)))
        .filter_map(move |(r, c)| lookup.numeric_at(r, c))
}

fn eval_expr(expr: &Expr) -> f64 {
    match expr {
        Expr::Number(n) => *n,
        Expr::Neg(inner) => -eval_expr(inner),
        Expr::BinaryOp { op, left, right } => {
            let l = eval_expr(left);
            let r = eval_expr(right);
            match op {
                Op::Add => l + r,
                Op::Sub => l - r,
                Op::Mul => l * r,
                Op::Div => l / r,
            }
        }
    }
}
