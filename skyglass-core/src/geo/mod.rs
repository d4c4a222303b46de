//! Geographic helpers
//!
//! Web mercator projection into the calibrated map window, plus great-circle
//! distance and bearing for the frame summary.

pub mod distance;
pub mod projection;

pub use distance::{bearing_deg, haversine_km, EARTH_RADIUS_KM};
pub use projection::{GeoPoint, GeoProjector, ScreenPoint, MAX_LATITUDE, TILE_SIZE};
