//! Interactive sheet engine.
//!
//! Owns one [`Grid`](opsgrid_engine::grid::Grid) plus the selection/editing
//! state, the clipboard, and the context menu. Hosts feed it
//! [`InputEvent`]s and observe mutations through the change callback.

pub mod clipboard;
pub mod context_menu;
mod editing;
pub mod mode;
mod navigation;
pub mod sheet;

pub use context_menu::MenuCommand;
pub use mode::SheetState;
pub use sheet::{InputEvent, SheetEngine};
