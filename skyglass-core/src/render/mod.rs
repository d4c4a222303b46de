//! Incremental renderer
//!
//! Each frame touches only the screen regions that changed: old and new icon
//! boxes are collected into a dirty set, merged into disjoint rectangles,
//! restored from the static background and repainted.

pub mod dirty;
pub mod engine;
pub mod icon;

pub use dirty::{DirtySet, MAX_DIRTY};
pub use engine::DirtyRegionEngine;
pub use icon::{HeadingMap, IconRasterizer, RowRuns, SpriteError, SpriteSheet, SPRITE_COUNT};
