//! Per-frame draw list selection

pub mod list;

pub use list::{DrawList, DrawListBuilder, MAX_DRAW};
