//! Differential status line
//!
//! A single line of fixed-width text in a strip at the bottom of the panel.
//! After the first paint only the character cells whose byte changed are
//! redrawn, which keeps the strip flicker-free while counters tick.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};
use crate::rect::Rect;

/// Maximum status text length in bytes
pub const STATUS_TEXT_LEN: usize = 95;

/// Width of one character cell in pixels
pub const CELL_WIDTH: i32 = 6;

/// Height of one character cell in pixels
pub const CELL_HEIGHT: i32 = 10;

/// Nominal text height used to centre the line in its strip
pub const TEXT_HEIGHT: i32 = 8;

/// Where the status text lives on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusLayout {
    /// Strip cleared on the first paint
    pub strip: Rect,
    /// X of the first character cell
    pub left_margin: i32,
    /// Extra vertical offset added after centring
    pub text_y_offset: i32,
}

impl StatusLayout {
    /// Full-width strip of `strip_h` pixels at the bottom of the panel
    pub const fn bottom_strip(
        width: i32,
        height: i32,
        strip_h: i32,
        left_margin: i32,
        text_y_offset: i32,
    ) -> Self {
        Self {
            strip: Rect::new(0, height - strip_h, width, strip_h),
            left_margin,
            text_y_offset,
        }
    }

    /// Top-left corner of the first character cell
    pub const fn text_origin(&self) -> (i32, i32) {
        let y = self.strip.y + (self.strip.h - TEXT_HEIGHT) / 2 + self.text_y_offset;
        (self.left_margin, y)
    }

    /// Top-left corner of cell `index`
    pub const fn cell_origin(&self, index: usize) -> (i32, i32) {
        let (x, y) = self.text_origin();
        (x + index as i32 * CELL_WIDTH, y)
    }
}

/// One character cell whose content differs between two strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CellChange {
    /// Cell index
    pub index: usize,
    /// Byte previously shown, if the old string reached this cell
    pub old: Option<u8>,
    /// Byte to show, if the new string reaches this cell
    pub new: Option<u8>,
}

/// Cells that differ between `prev` and `next`
///
/// Covers every index below the longer of the two lengths.
pub fn diff_cells<'a>(prev: &'a str, next: &'a str) -> impl Iterator<Item = CellChange> + 'a {
    let old = prev.as_bytes();
    let new = next.as_bytes();
    (0..old.len().max(new.len())).filter_map(move |index| {
        let change = CellChange {
            index,
            old: old.get(index).copied(),
            new: new.get(index).copied(),
        };
        (change.old != change.new).then_some(change)
    })
}

fn glyph(byte: u8) -> char {
    if byte.is_ascii() && !byte.is_ascii_control() {
        char::from(byte)
    } else {
        '?'
    }
}

/// Truncate to at most `max` bytes without splitting a character
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Differential one-line text renderer
#[derive(Debug, Clone)]
pub struct StatusLine {
    layout: StatusLayout,
    prev: Option<String<STATUS_TEXT_LEN>>,
    fg: Rgb565,
    bg: Rgb565,
}

impl StatusLine {
    /// Create a status line (white text on black)
    pub fn new(layout: StatusLayout) -> Self {
        Self {
            layout,
            prev: None,
            fg: Rgb565::WHITE,
            bg: Rgb565::BLACK,
        }
    }

    /// Layout in use
    pub fn layout(&self) -> &StatusLayout {
        &self.layout
    }

    /// Text currently on screen, if anything was painted yet
    pub fn text(&self) -> Option<&str> {
        self.prev.as_ref().map(|s| s.as_str())
    }

    /// Forget what is on screen; the next update repaints the whole strip
    pub fn reset(&mut self) {
        self.prev = None;
    }

    /// Show `text`, redrawing only the cells that changed
    ///
    /// Text longer than [`STATUS_TEXT_LEN`] bytes is truncated. Returns the
    /// number of cells drawn.
    pub fn update<D: DisplayBackend + ?Sized>(
        &mut self,
        display: &mut D,
        text: &str,
    ) -> Result<usize, DisplayError> {
        let text = truncate(text, STATUS_TEXT_LEN);

        let drawn = match self.prev.as_deref() {
            None => {
                display.fill_rect(self.layout.strip, self.bg)?;
                for (index, &byte) in text.as_bytes().iter().enumerate() {
                    let (x, y) = self.layout.cell_origin(index);
                    display.draw_glyph(x, y, glyph(byte), self.fg, self.bg)?;
                }
                text.len()
            }
            Some(prev) => {
                let mut changed = 0;
                for cell in diff_cells(prev, text) {
                    let (x, y) = self.layout.cell_origin(cell.index);
                    if let Some(old) = cell.old {
                        display.draw_glyph(x, y, glyph(old), self.bg, self.bg)?;
                    }
                    if let Some(new) = cell.new {
                        display.draw_glyph(x, y, glyph(new), self.fg, self.bg)?;
                    }
                    changed += 1;
                }
                changed
            }
        };

        let mut shown = String::new();
        // Cannot fail: `text` was truncated to the capacity
        let _ = shown.push_str(text);
        self.prev = Some(shown);

        Ok(drawn)
    }
}

/// Capability to report a one-line status message
pub trait StatusSink {
    /// Show `text` on the status line
    fn show_status(&mut self, text: &str) -> Result<(), DisplayError>;
}

/// [`StatusSink`] that draws through a shared [`StatusLine`]
///
/// Each message is drawn inside its own bus transaction.
pub struct StatusBanner<'a, D: ?Sized> {
    display: &'a mut D,
    line: &'a mut StatusLine,
}

impl<'a, D: DisplayBackend + ?Sized> StatusBanner<'a, D> {
    /// Bind a display and status line
    pub fn new(display: &'a mut D, line: &'a mut StatusLine) -> Self {
        Self { display, line }
    }
}

impl<D: DisplayBackend + ?Sized> StatusSink for StatusBanner<'_, D> {
    fn show_status(&mut self, text: &str) -> Result<(), DisplayError> {
        self.display.begin_write()?;
        let drawn = self.line.update(&mut *self.display, text).map(|_| ());
        let ended = self.display.end_write();
        drawn.and(ended)
    }
}
