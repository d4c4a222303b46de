//! Configuration type definitions
//!
//! Calibration and tuning for one display unit. The defaults describe the
//! reference device: a 480x320 panel showing a zoom-8 map window around
//! Lake Geneva.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use skyglass_display::{Rect, StatusLayout};

use crate::geo::GeoPoint;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Highest supported map zoom level
pub const MAX_ZOOM: u8 = 22;

/// Map projection calibration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapConfig {
    /// Web mercator zoom level of the background raster
    pub zoom: u8,
    /// Global pixel X of the background's left edge
    pub origin_x: f64,
    /// Global pixel Y of the background's top edge
    pub origin_y: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: 8,
            origin_x: 33707.06016028444,
            origin_y: 23031.052289240848,
        }
    }
}

/// Panel geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScreenConfig {
    /// Canvas width in pixels
    pub width: u16,
    /// Canvas height in pixels
    pub height: u16,
    /// Height of the legend bar at the top
    pub legend_h: u16,
    /// Height of the status strip at the bottom
    pub status_h: u16,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            legend_h: 18,
            status_h: 18,
        }
    }
}

/// Icon box size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IconConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
        }
    }
}

/// Orientation of the sprite table relative to compass headings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpriteConfig {
    /// Sprites were generated rotating counter-clockwise
    pub counter_clockwise: bool,
    /// Degrees added after direction correction
    pub offset_deg: i16,
    /// Sprites point the opposite way
    pub flip_180: bool,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            counter_clockwise: true,
            offset_deg: 0,
            flip_180: false,
        }
    }
}

/// Track lifecycle and refresh timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackConfig {
    /// Tracks not updated for longer than this are evicted
    pub ttl_ms: u32,
    /// Tracks not updated for longer than this are not drawn
    pub position_stale_ms: u32,
    /// Maximum icons drawn per frame
    pub max_draw: u16,
    /// Minimum time between refresh cycles
    pub refresh_interval_ms: u32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 15_000,
            position_stale_ms: 10_000,
            max_draw: 99,
            refresh_interval_ms: 1_000,
        }
    }
}

/// Reference point for distance readouts
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomeConfig {
    pub lat: f64,
    pub lon: f64,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            lat: 46.4717185,
            lon: 6.4767709,
        }
    }
}

/// Status line placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusConfig {
    /// X of the first character
    pub left_margin: u16,
    /// Vertical nudge after centring in the strip
    pub text_y_offset: i16,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            left_margin: 25,
            text_y_offset: 2,
        }
    }
}

/// Configuration rejected by [`RadarConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Zoom above [`MAX_ZOOM`]
    ZoomOutOfRange,
    /// Projection origin or home point is NaN or infinite
    NonFinite,
    /// Canvas or icon has a zero dimension
    EmptyGeometry,
    /// Legend and status strips leave no room for icons
    NoDrawingArea,
    /// Staleness threshold is looser than the TTL
    StaleAfterTtl,
    /// `max_draw` is zero or above the draw list capacity
    MaxDrawOutOfRange,
}

/// Complete display configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadarConfig {
    /// Format version
    pub version: u8,
    pub map: MapConfig,
    pub screen: ScreenConfig,
    pub icon: IconConfig,
    pub sprite: SpriteConfig,
    pub tracks: TrackConfig,
    pub home: HomeConfig,
    pub status: StatusConfig,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            map: MapConfig::default(),
            screen: ScreenConfig::default(),
            icon: IconConfig::default(),
            sprite: SpriteConfig::default(),
            tracks: TrackConfig::default(),
            home: HomeConfig::default(),
            status: StatusConfig::default(),
        }
    }
}

impl RadarConfig {
    /// Check the configuration for values the renderer cannot work with
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.map.zoom > MAX_ZOOM {
            return Err(ValidationError::ZoomOutOfRange);
        }

        let finite = [
            self.map.origin_x,
            self.map.origin_y,
            self.home.lat,
            self.home.lon,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::NonFinite);
        }

        if self.screen.width == 0
            || self.screen.height == 0
            || self.icon.width == 0
            || self.icon.height == 0
        {
            return Err(ValidationError::EmptyGeometry);
        }

        let reserved = u32::from(self.screen.legend_h) + u32::from(self.screen.status_h);
        if reserved + u32::from(self.icon.height) > u32::from(self.screen.height) {
            return Err(ValidationError::NoDrawingArea);
        }

        if self.tracks.position_stale_ms > self.tracks.ttl_ms {
            return Err(ValidationError::StaleAfterTtl);
        }

        if self.tracks.max_draw == 0
            || usize::from(self.tracks.max_draw) > crate::draw::MAX_DRAW
        {
            return Err(ValidationError::MaxDrawOutOfRange);
        }

        Ok(())
    }

    /// Whole canvas as a rectangle
    pub fn canvas(&self) -> Rect {
        Rect::with_size(i32::from(self.screen.width), i32::from(self.screen.height))
    }

    /// Home reference point
    pub fn home(&self) -> GeoPoint {
        GeoPoint::new(self.home.lat, self.home.lon)
    }

    /// Status strip layout at the bottom of the canvas
    pub fn status_layout(&self) -> StatusLayout {
        StatusLayout::bottom_strip(
            i32::from(self.screen.width),
            i32::from(self.screen.height),
            i32::from(self.screen.status_h),
            i32::from(self.status.left_margin),
            i32::from(self.status.text_y_offset),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RadarConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.canvas(), Rect::new(0, 0, 480, 320));
        assert_eq!(config.status_layout().strip, Rect::new(0, 302, 480, 18));
    }

    #[test]
    fn test_rejects_stale_looser_than_ttl() {
        let mut config = RadarConfig::default();
        config.tracks.position_stale_ms = config.tracks.ttl_ms + 1;
        assert_eq!(config.validate(), Err(ValidationError::StaleAfterTtl));

        config.tracks.position_stale_ms = config.tracks.ttl_ms;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zoom_out_of_range() {
        let mut config = RadarConfig::default();
        config.map.zoom = 23;
        assert_eq!(config.validate(), Err(ValidationError::ZoomOutOfRange));
    }

    #[test]
    fn test_rejects_non_finite_origin() {
        let mut config = RadarConfig::default();
        config.map.origin_x = f64::NAN;
        assert_eq!(config.validate(), Err(ValidationError::NonFinite));
    }

    #[test]
    fn test_rejects_missing_drawing_area() {
        let mut config = RadarConfig::default();
        config.screen.legend_h = 150;
        config.screen.status_h = 150;
        assert_eq!(config.validate(), Err(ValidationError::NoDrawingArea));
    }

    #[test]
    fn test_rejects_max_draw_out_of_range() {
        let mut config = RadarConfig::default();
        config.tracks.max_draw = 0;
        assert_eq!(config.validate(), Err(ValidationError::MaxDrawOutOfRange));
        config.tracks.max_draw = 100;
        assert_eq!(config.validate(), Err(ValidationError::MaxDrawOutOfRange));
    }
}
