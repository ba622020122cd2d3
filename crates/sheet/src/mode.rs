use opsgrid_core::selection::{CellPos, Range};

/// The one authoritative selection/editing state of a sheet.
///
/// Editing and range selection can never be active together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetState {
    /// Nothing selected
    #[default]
    Idle,
    CellSelected(CellPos),
    /// `anchor` is the cell the range was extended from and is always a corner of `range`
    RangeSelected { anchor: CellPos, range: Range },
    /// `buffer` is the transient editor text, not yet in the grid
    Editing { pos: CellPos, buffer: String },
}

impl SheetState {
    /// The cell keyboard navigation currently targets.
    pub fn anchor(&self) -> Option<CellPos> {
        match self {
            SheetState::Idle => None,
            SheetState::CellSelected(pos) => Some(*pos),
            SheetState::RangeSelected { anchor, .. } => Some(*anchor),
            SheetState::Editing { pos, .. } => Some(*pos),
        }
    }

    /// Selected block; a single cell is a 1x1 range. `None` while idle or editing.
    pub fn selected_range(&self) -> Option<Range> {
        match self {
            SheetState::CellSelected(pos) => Some(Range::single(pos.row, pos.col)),
            SheetState::RangeSelected { range, .. } => Some(*range),
            SheetState::Idle | SheetState::Editing { .. } => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, SheetState::Editing { .. })
    }

    pub fn is_range(&self) -> bool {
        matches!(self, SheetState::RangeSelected { .. })
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        match self {
            SheetState::Editing { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    /// Pull every position back inside a `rows x cols` grid (after a
    /// structural delete). A range that collapses to one cell becomes a
    /// plain cell selection.
    pub fn clamped(self, rows: usize, cols: usize) -> Self {
        match self {
            SheetState::Idle => SheetState::Idle,
            SheetState::CellSelected(pos) => SheetState::CellSelected(pos.clamp_to(rows, cols)),
            SheetState::RangeSelected { anchor, range } => {
                let anchor = anchor.clamp_to(rows, cols);
                let range = range.clamp_to(rows, cols);
                if range.is_single() {
                    SheetState::CellSelected(anchor)
                } else {
                    SheetState::RangeSelected { anchor, range }
                }
            }
            SheetState::Editing { pos, buffer } => SheetState::Editing {
                pos: pos.clamp_to(rows, cols),
                buffer,
            },
        }
    }
}
