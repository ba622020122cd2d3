pub mod cell;
pub mod col_label;
pub mod events;
pub mod formula;
pub mod grid;
