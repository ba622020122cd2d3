pub mod keys;
pub mod selection;
