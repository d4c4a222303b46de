//! Static background restore
//!
//! The map background never changes at runtime. Restoring a region means
//! copying the matching pixels from the stored raster back to the panel.

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use crate::backend::{DisplayBackend, DisplayError};
use crate::rect::Rect;

/// Widest row the restore line buffer can hold
pub const MAX_LINE_WIDTH: usize = 480;

/// Source of background pixels
pub trait Background {
    /// Repaint `rect` with background pixels
    ///
    /// Parts of `rect` outside the background are skipped.
    fn restore<D: DisplayBackend + ?Sized>(
        &self,
        display: &mut D,
        rect: Rect,
    ) -> Result<(), DisplayError>;
}

/// Row-major RGB565 raster, typically a `static` array in flash
#[derive(Debug, Clone, Copy)]
pub struct RasterBackground<'a> {
    pixels: &'a [u16],
    width: u16,
    height: u16,
}

impl<'a> RasterBackground<'a> {
    /// Wrap a raw RGB565 raster of `width` x `height` pixels
    ///
    /// Fails if the slice length does not match the dimensions or a row is
    /// wider than the restore line buffer.
    pub fn new(pixels: &'a [u16], width: u16, height: u16) -> Result<Self, DisplayError> {
        if usize::from(width) > MAX_LINE_WIDTH {
            return Err(DisplayError::BufferOverflow);
        }
        if pixels.len() != usize::from(width) * usize::from(height) {
            return Err(DisplayError::InvalidCoordinates);
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Raster bounds
    pub fn bounds(&self) -> Rect {
        Rect::with_size(i32::from(self.width), i32::from(self.height))
    }

    /// Get one background pixel
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if !self.bounds().contains(x, y) {
            return None;
        }
        let index = y as usize * usize::from(self.width) + x as usize;
        self.pixels
            .get(index)
            .map(|&raw| Rgb565::from(RawU16::new(raw)))
    }
}

impl Background for RasterBackground<'_> {
    fn restore<D: DisplayBackend + ?Sized>(
        &self,
        display: &mut D,
        rect: Rect,
    ) -> Result<(), DisplayError> {
        let rect = rect.clamp_to(self.bounds());
        if rect.is_empty() {
            return Ok(());
        }

        let width = rect.w as usize;
        let mut line = [Rgb565::BLACK; MAX_LINE_WIDTH];

        for y in rect.y..rect.bottom() {
            let start = y as usize * usize::from(self.width) + rect.x as usize;
            let src = self
                .pixels
                .get(start..start + width)
                .ok_or(DisplayError::InvalidCoordinates)?;

            for (dst, &raw) in line.iter_mut().zip(src) {
                *dst = Rgb565::from(RawU16::new(raw));
            }
            display.push_row(rect.x, y, &line[..width])?;
        }

        Ok(())
    }
}

/// Single-colour background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidBackground(pub Rgb565);

impl Background for SolidBackground {
    fn restore<D: DisplayBackend + ?Sized>(
        &self,
        display: &mut D,
        rect: Rect,
    ) -> Result<(), DisplayError> {
        let rect = rect.clamp_to(display.bounds());
        if rect.is_empty() {
            return Ok(());
        }
        display.fill_rect(rect, self.0)
    }
}
