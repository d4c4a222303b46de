//! Display backend trait
//!
//! Defines the interface to the pixel display bus.

use embedded_graphics::pixelcolor::Rgb565;

use crate::rect::Rect;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Buffer overflow
    BufferOverflow,
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface to a colour pixel display.
/// Every operation draws immediately; there is no frame buffer to flush.
///
/// Implementations clip primitives that extend past the panel; callers may
/// pass coordinates partially or fully off-screen.
pub trait DisplayBackend {
    /// Start a bus transaction
    ///
    /// Everything drawn until [`end_write`](Self::end_write) belongs to one
    /// uninterrupted transfer. Other users of the bus (touch controllers,
    /// SD cards) must wait for `end_write`.
    fn begin_write(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Finish the bus transaction started by `begin_write`
    fn end_write(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Fill a rectangle with a solid colour
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError>;

    /// Draw a horizontal line of `len` pixels starting at (x, y)
    fn draw_hline(&mut self, x: i32, y: i32, len: i32, color: Rgb565) -> Result<(), DisplayError>;

    /// Write one row of pixels starting at (x, y)
    fn push_row(&mut self, x: i32, y: i32, pixels: &[Rgb565]) -> Result<(), DisplayError>;

    /// Draw one character cell with its top-left corner at (x, y)
    ///
    /// The whole cell is painted: glyph pixels in `fg`, the rest in `bg`.
    fn draw_glyph(
        &mut self,
        x: i32,
        y: i32,
        ch: char,
        fg: Rgb565,
        bg: Rgb565,
    ) -> Result<(), DisplayError>;

    /// Get the panel dimensions in pixels (width, height)
    fn dimensions(&self) -> (u16, u16);

    /// Panel bounds as a rectangle at the origin
    fn bounds(&self) -> Rect {
        let (w, h) = self.dimensions();
        Rect::with_size(i32::from(w), i32::from(h))
    }
}
