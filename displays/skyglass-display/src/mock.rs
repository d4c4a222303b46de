//! Host-side recording backend
//!
//! Keeps an RGB565 framebuffer and a log of every call, so tests can check
//! both what ended up on screen and how much bus traffic it took.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use crate::backend::{DisplayBackend, DisplayError};
use crate::rect::Rect;
use crate::status::{CELL_HEIGHT, CELL_WIDTH};

/// One recorded backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOp {
    BeginWrite,
    EndWrite,
    FillRect { rect: Rect, color: Rgb565 },
    HLine {
        x: i32,
        y: i32,
        len: i32,
        color: Rgb565,
    },
    Row { x: i32, y: i32, len: usize },
    Glyph {
        x: i32,
        y: i32,
        ch: char,
        fg: Rgb565,
        bg: Rgb565,
    },
}

/// In-memory display that records every operation
///
/// Glyphs are not rasterized; the whole cell is filled with the background
/// colour, which is enough to observe erase/redraw traffic.
#[derive(Debug, Clone)]
pub struct RecordingDisplay {
    width: u16,
    height: u16,
    pixels: Vec<Rgb565>,
    ops: Vec<DisplayOp>,
    depth: u32,
    fail_after: Option<usize>,
}

impl RecordingDisplay {
    /// Create a black display of the given size
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; usize::from(width) * usize::from(height)],
            ops: Vec::new(),
            depth: 0,
            fail_after: None,
        }
    }

    /// Make every drawing call fail once `count` more have been recorded
    pub fn fail_after(&mut self, count: usize) {
        self.fail_after = Some(self.ops.len() + count);
    }

    /// Stop failing drawing calls
    pub fn clear_fault(&mut self) {
        self.fail_after = None;
    }

    /// Pixel colour at (x, y)
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if !self.bounds().contains(x, y) {
            return None;
        }
        let index = y as usize * usize::from(self.width) + x as usize;
        self.pixels.get(index).copied()
    }

    /// Recorded operations, oldest first
    pub fn ops(&self) -> &[DisplayOp] {
        &self.ops
    }

    /// Number of recorded operations matching `pred`
    pub fn count(&self, pred: impl Fn(&DisplayOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Drop the operation log, keeping the framebuffer
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Current `begin_write` nesting depth
    pub fn write_depth(&self) -> u32 {
        self.depth
    }

    fn record(&mut self, op: DisplayOp) -> Result<(), DisplayError> {
        if let Some(limit) = self.fail_after {
            if self.ops.len() >= limit && !matches!(op, DisplayOp::EndWrite) {
                return Err(DisplayError::Communication);
            }
        }
        self.ops.push(op);
        Ok(())
    }

    fn paint(&mut self, rect: Rect, color: Rgb565) {
        let rect = rect.clamp_to(self.bounds());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let index = y as usize * usize::from(self.width) + x as usize;
                self.pixels[index] = color;
            }
        }
    }
}

impl DisplayBackend for RecordingDisplay {
    fn begin_write(&mut self) -> Result<(), DisplayError> {
        self.record(DisplayOp::BeginWrite)?;
        self.depth += 1;
        Ok(())
    }

    fn end_write(&mut self) -> Result<(), DisplayError> {
        self.record(DisplayOp::EndWrite)?;
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError> {
        self.record(DisplayOp::FillRect { rect, color })?;
        self.paint(rect, color);
        Ok(())
    }

    fn draw_hline(&mut self, x: i32, y: i32, len: i32, color: Rgb565) -> Result<(), DisplayError> {
        self.record(DisplayOp::HLine { x, y, len, color })?;
        self.paint(Rect::new(x, y, len, 1), color);
        Ok(())
    }

    fn push_row(&mut self, x: i32, y: i32, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        self.record(DisplayOp::Row {
            x,
            y,
            len: pixels.len(),
        })?;
        for (offset, &color) in pixels.iter().enumerate() {
            self.paint(Rect::new(x + offset as i32, y, 1, 1), color);
        }
        Ok(())
    }

    fn draw_glyph(
        &mut self,
        x: i32,
        y: i32,
        ch: char,
        fg: Rgb565,
        bg: Rgb565,
    ) -> Result<(), DisplayError> {
        self.record(DisplayOp::Glyph { x, y, ch, fg, bg })?;
        self.paint(Rect::new(x, y, CELL_WIDTH, CELL_HEIGHT), bg);
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}
