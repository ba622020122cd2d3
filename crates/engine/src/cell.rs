use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Presentation-only cell attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub text_color: Option<String>,  // None = inherit
    pub background: Option<String>,
}

/// Type tag derived at commit time from the input and the evaluation result
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Text,
    Number,
    Date,
    Formula,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    /// ISO `YYYY-MM-DD` date string
    Date(String),
}

impl CellValue {
    pub fn raw_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) | CellValue::Date(s) => s.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// Integral values render without a fractional part, everything else at full precision.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// How a raw input string is interpreted at commit time.
#[derive(Debug, Clone, PartialEq)]
pub enum Input<'a> {
    Empty,
    /// Formula source without the leading `=`
    Formula(&'a str),
    Number(f64),
    Date(&'a str),
    Text(&'a str),
}

/// Classify raw editor text.
///
/// A leading `=` makes a formula. A leading digit (or `-` followed by a digit
/// or `.`) makes a number only when the whole string parses, so `"3.5abc"`
/// stays text.
pub fn classify_input(input: &str) -> Input<'_> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Input::Empty;
    }

    if let Some(source) = trimmed.strip_prefix('=') {
        return Input::Formula(source);
    }

    if looks_numeric(trimmed) {
        if let Ok(num) = trimmed.parse::<f64>() {
            if num.is_finite() {
                return Input::Number(num);
            }
        }
    }

    if is_iso_date(trimmed) {
        return Input::Date(trimmed);
    }

    Input::Text(trimmed)
}

fn looks_numeric(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-') => matches!(chars.next(), Some(c) if c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}

fn is_iso_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    /// Raw formula text including the leading `=`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    pub kind: CellKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(n: f64) -> Self {
        Self { value: CellValue::Number(n), kind: CellKind::Number, ..Self::default() }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self { value: CellValue::Text(s.into()), kind: CellKind::Text, ..Self::default() }
    }

    /// Text shown in the editor when editing starts: the formula if there is one.
    pub fn edit_text(&self) -> String {
        match &self.formula {
            Some(formula) => formula.clone(),
            None => self.value.raw_display(),
        }
    }

    /// Drop value and formula, keep style.
    pub fn clear(&mut self) {
        self.value = CellValue::Empty;
        self.formula = None;
        self.kind = CellKind::Text;
    }

    pub fn is_blank(&self) -> bool {
        self.value.is_empty() && self.formula.is_none()
    }

    pub fn apply(&mut self, patch: CellPatch) {
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(formula) = patch.formula {
            self.formula = formula;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
    }
}

/// Partial cell update. `None` leaves a field untouched; `Some(None)` clears
/// the optional fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellPatch {
    pub value: Option<CellValue>,
    pub formula: Option<Option<String>>,
    pub kind: Option<CellKind>,
    pub style: Option<Option<CellStyle>>,
}

impl CellPatch {
    pub fn value(value: CellValue) -> Self {
        Self { value: Some(value), ..Self::default() }
    }

    pub fn style(style: Option<CellStyle>) -> Self {
        Self { style: Some(style), ..Self::default() }
    }

    /// Patch that replaces everything except style with `cell`'s content.
    pub fn content_of(cell: &Cell) -> Self {
        Self {
            value: Some(cell.value.clone()),
            formula: Some(cell.formula.clone()),
            kind: Some(cell.kind),
            style: None,
        }
    }
}
