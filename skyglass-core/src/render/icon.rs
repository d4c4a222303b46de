//! Run-length icon rasterizer
//!
//! Icons are 1-bit masks, one per whole degree of heading, each row packed
//! MSB first. Set bits are painted as horizontal runs in the icon colour;
//! clear bits are left alone so the background shows through.

use embedded_graphics::pixelcolor::Rgb565;

use skyglass_display::{DisplayBackend, DisplayError};

use crate::config::SpriteConfig;
use crate::geo::ScreenPoint;
use crate::track::Heading;

/// Number of sprites in a sheet, one per degree
pub const SPRITE_COUNT: usize = 360;

/// Sprite sheet errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpriteError {
    /// Width or height is zero
    EmptySprite,
    /// The mask for this sprite index runs past the end of the mask data
    MaskOutOfRange(u16),
}

/// Table of 1-bit heading masks, typically `static` data in flash
#[derive(Debug, Clone, Copy)]
pub struct SpriteSheet<'a> {
    width: u16,
    height: u16,
    stride: usize,
    masks: &'a [u8],
    offsets: &'a [u32; SPRITE_COUNT],
}

impl<'a> SpriteSheet<'a> {
    /// Wrap mask data and per-heading byte offsets into it
    ///
    /// Each mask is `height` rows of `ceil(width / 8)` bytes.
    pub fn new(
        width: u16,
        height: u16,
        masks: &'a [u8],
        offsets: &'a [u32; SPRITE_COUNT],
    ) -> Result<Self, SpriteError> {
        if width == 0 || height == 0 {
            return Err(SpriteError::EmptySprite);
        }

        let stride = usize::from(width).div_ceil(8);
        let mask_len = stride * usize::from(height);

        for (index, &offset) in offsets.iter().enumerate() {
            let end = (offset as usize).checked_add(mask_len);
            if end.map_or(true, |end| end > masks.len()) {
                return Err(SpriteError::MaskOutOfRange(index as u16));
            }
        }

        Ok(Self {
            width,
            height,
            stride,
            masks,
            offsets,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Mask for sprite `index` (taken modulo [`SPRITE_COUNT`])
    pub fn mask(&self, index: u16) -> &'a [u8] {
        let start = self.offsets[usize::from(index) % SPRITE_COUNT] as usize;
        let len = self.stride * usize::from(self.height);
        // Bounds checked in `new`
        self.masks.get(start..start + len).unwrap_or(&[])
    }

    /// Set-bit runs of row `y` of sprite `index`
    pub fn row_runs(&self, index: u16, y: u16) -> RowRuns<'a> {
        let mask = self.mask(index);
        let start = usize::from(y) * self.stride;
        let row = mask.get(start..start + self.stride).unwrap_or(&[]);
        RowRuns::new(row, self.width)
    }
}

/// Iterator over runs of set bits in one MSB-first mask row
///
/// Yields `(start, len)` pairs in pixels.
#[derive(Debug, Clone)]
pub struct RowRuns<'a> {
    row: &'a [u8],
    width: u16,
    x: u16,
}

impl<'a> RowRuns<'a> {
    pub fn new(row: &'a [u8], width: u16) -> Self {
        // Never read past the row data
        let width = width.min((row.len() * 8).min(usize::from(u16::MAX)) as u16);
        Self { row, width, x: 0 }
    }

    fn bit(&self, x: u16) -> bool {
        let byte = self.row[usize::from(x >> 3)];
        byte & (0x80 >> (x & 7)) != 0
    }
}

impl Iterator for RowRuns<'_> {
    type Item = (u16, u16);

    fn next(&mut self) -> Option<Self::Item> {
        while self.x < self.width && !self.bit(self.x) {
            self.x += 1;
        }
        if self.x >= self.width {
            return None;
        }

        let start = self.x;
        while self.x < self.width && self.bit(self.x) {
            self.x += 1;
        }
        Some((start, self.x - start))
    }
}

/// Maps compass headings to sprite indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeadingMap {
    pub counter_clockwise: bool,
    pub offset_deg: i16,
    pub flip_180: bool,
}

impl Default for HeadingMap {
    fn default() -> Self {
        Self::from(&SpriteConfig::default())
    }
}

impl From<&SpriteConfig> for HeadingMap {
    fn from(config: &SpriteConfig) -> Self {
        Self {
            counter_clockwise: config.counter_clockwise,
            offset_deg: config.offset_deg,
            flip_180: config.flip_180,
        }
    }
}

impl HeadingMap {
    /// Sprite index for `heading`, in `0..360`
    pub fn sprite_index(&self, heading: Heading) -> u16 {
        let mut h = i32::from(heading.degrees()) % 360;
        if self.counter_clockwise {
            h = (360 - h) % 360;
        }
        h = (h + i32::from(self.offset_deg)).rem_euclid(360);
        if self.flip_180 {
            h = (h + 180) % 360;
        }
        h as u16
    }
}

/// Paints heading sprites as horizontal runs
#[derive(Debug, Clone, Copy)]
pub struct IconRasterizer<'a> {
    sheet: SpriteSheet<'a>,
    map: HeadingMap,
}

impl<'a> IconRasterizer<'a> {
    pub fn new(sheet: SpriteSheet<'a>, map: HeadingMap) -> Self {
        Self { sheet, map }
    }

    /// Paint the sprite for `heading` with its top-left corner at `top_left`
    ///
    /// Returns the number of runs drawn.
    pub fn paint<D: DisplayBackend + ?Sized>(
        &self,
        display: &mut D,
        top_left: ScreenPoint,
        heading: Heading,
        color: Rgb565,
    ) -> Result<u32, DisplayError> {
        let index = self.map.sprite_index(heading);
        let mut runs = 0;

        for y in 0..self.sheet.height {
            for (start, len) in self.sheet.row_runs(index, y) {
                display.draw_hline(
                    top_left.x + i32::from(start),
                    top_left.y + i32::from(y),
                    i32::from(len),
                    color,
                )?;
                runs += 1;
            }
        }

        Ok(runs)
    }
}
