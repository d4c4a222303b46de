//! Web mercator projection
//!
//! Converts geographic coordinates to screen pixels of the background raster.
//! The raster is a window of the global web mercator pixel grid at a fixed
//! zoom; the window's top-left global pixel is the calibration origin.

use core::f64::consts::PI;

use crate::config::{RadarConfig, MAX_ZOOM};

/// Latitude limit of the web mercator square
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Tile edge in pixels
pub const TILE_SIZE: f64 = 256.0;

/// Geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check that both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Integer screen position in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Projects geographic positions into the calibrated map window
///
/// A point is projectable when its centre lies within half an icon of the
/// canvas. Anything further out can never produce a visible icon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjector {
    world_px: f64,
    origin_x: f64,
    origin_y: f64,
    canvas_w: i32,
    canvas_h: i32,
    half_icon_w: i32,
    half_icon_h: i32,
}

impl GeoProjector {
    /// Create a projector from the map, screen and icon calibration
    pub fn new(config: &RadarConfig) -> Self {
        let zoom = config.map.zoom.min(MAX_ZOOM);
        Self {
            world_px: TILE_SIZE * (1u64 << zoom) as f64,
            origin_x: config.map.origin_x,
            origin_y: config.map.origin_y,
            canvas_w: i32::from(config.screen.width),
            canvas_h: i32::from(config.screen.height),
            half_icon_w: i32::from(config.icon.width) / 2,
            half_icon_h: i32::from(config.icon.height) / 2,
        }
    }

    /// Global web mercator pixel coordinates at the configured zoom
    ///
    /// Latitude is clamped to [`MAX_LATITUDE`].
    pub fn global_pixels(&self, point: GeoPoint) -> (f64, f64) {
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let lat_rad = lat.to_radians();

        let x = (point.lon + 180.0) / 360.0 * self.world_px;
        let y = (1.0 - libm::log(libm::tan(lat_rad) + 1.0 / libm::cos(lat_rad)) / PI) / 2.0
            * self.world_px;
        (x, y)
    }

    /// Screen position of `point`, or `None` when it is out of bounds
    pub fn project(&self, point: GeoPoint) -> Option<ScreenPoint> {
        if !point.is_finite() {
            return None;
        }

        let (gx, gy) = self.global_pixels(point);
        let sx = libm::round(gx - self.origin_x);
        let sy = libm::round(gy - self.origin_y);
        if !sx.is_finite() || !sy.is_finite() {
            return None;
        }

        // Saturating casts; far-away points fail the bounds check below
        let screen = ScreenPoint::new(sx as i32, sy as i32);
        self.in_bounds(screen).then_some(screen)
    }

    fn in_bounds(&self, p: ScreenPoint) -> bool {
        p.x >= -self.half_icon_w
            && p.x <= self.canvas_w + self.half_icon_w
            && p.y >= -self.half_icon_h
            && p.y <= self.canvas_h + self.half_icon_h
    }
}
