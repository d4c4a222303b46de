//! embedded-graphics adapter
//!
//! Wraps any RGB565 [`DrawTarget`] (panel drivers such as mipidsi/ili9488, or
//! a simulator window) as a [`DisplayBackend`].

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use crate::backend::{DisplayBackend, DisplayError};
use crate::rect::Rect;

/// [`DisplayBackend`] over an embedded-graphics draw target
///
/// Primitives are clipped to the target's bounds before they reach the
/// driver. Any driver error is reported as [`DisplayError::Communication`].
pub struct DrawTargetBackend<D> {
    target: D,
}

impl<D> DrawTargetBackend<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    /// Wrap a draw target
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// Borrow the wrapped target
    pub fn inner(&self) -> &D {
        &self.target
    }

    /// Mutably borrow the wrapped target
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Release the wrapped target
    pub fn into_inner(self) -> D {
        self.target
    }

    fn clip(&self, rect: Rect) -> Option<Rectangle> {
        let rect = rect.clamp_to(self.bounds());
        if rect.is_empty() {
            return None;
        }
        Some(Rectangle::new(
            Point::new(rect.x, rect.y),
            Size::new(rect.w as u32, rect.h as u32),
        ))
    }
}

impl<D> DisplayBackend for DrawTargetBackend<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError> {
        match self.clip(rect) {
            Some(area) => self
                .target
                .fill_solid(&area, color)
                .map_err(|_| DisplayError::Communication),
            None => Ok(()),
        }
    }

    fn draw_hline(&mut self, x: i32, y: i32, len: i32, color: Rgb565) -> Result<(), DisplayError> {
        self.fill_rect(Rect::new(x, y, len, 1), color)
    }

    fn push_row(&mut self, x: i32, y: i32, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        let requested = Rect::new(x, y, pixels.len() as i32, 1);
        let Some(area) = self.clip(requested) else {
            return Ok(());
        };

        let skip = (area.top_left.x - x) as usize;
        let take = area.size.width as usize;
        let row = pixels
            .get(skip..skip + take)
            .ok_or(DisplayError::InvalidCoordinates)?;

        self.target
            .fill_contiguous(&area, row.iter().copied())
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_glyph(
        &mut self,
        x: i32,
        y: i32,
        ch: char,
        fg: Rgb565,
        bg: Rgb565,
    ) -> Result<(), DisplayError> {
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(fg)
            .background_color(bg)
            .build();

        let mut buf = [0u8; 4];
        let text: &str = ch.encode_utf8(&mut buf);

        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| DisplayError::Communication)
    }

    fn dimensions(&self) -> (u16, u16) {
        let size = self.target.size();
        (
            u16::try_from(size.width).unwrap_or(u16::MAX),
            u16::try_from(size.height).unwrap_or(u16::MAX),
        )
    }
}
