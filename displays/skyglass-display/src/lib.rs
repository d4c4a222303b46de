//! Display abstraction and shared drawing components for skyglass
//!
//! This crate provides:
//! - `Rect` screen rectangles with the clamp/overlap/union operations the
//!   dirty-region renderer relies on
//! - `DisplayBackend` trait for the pixel display bus (TFT over SPI, etc.)
//! - `Background` trait plus a flash-resident RGB565 raster implementation
//! - `StatusLine`, a one-line text bar repainted cell by cell
//! - `StatusSink`, the "can report a one-line status" capability handed to
//!   collaborators that must not depend on the display driver
//!
//! # Architecture
//!
//! The core crate computes which rectangles changed and paints icons through
//! `DisplayBackend`. Hardware drivers either implement the trait directly or
//! expose an `embedded-graphics` `DrawTarget`, wrapped by [`DrawTargetBackend`].
//!
//! With the `std` feature, [`mock::RecordingDisplay`] keeps an in-memory
//! framebuffer and an operation log for host-side tests.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod background;
pub mod graphics;
#[cfg(any(test, feature = "std"))]
pub mod mock;
pub mod rect;
pub mod status;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use background::{Background, RasterBackground, SolidBackground, MAX_LINE_WIDTH};
pub use graphics::DrawTargetBackend;
pub use rect::Rect;
pub use status::{
    diff_cells, CellChange, StatusBanner, StatusLayout, StatusLine, StatusSink, CELL_HEIGHT,
    CELL_WIDTH, STATUS_TEXT_LEN,
};

pub use embedded_graphics::pixelcolor::Rgb565;
