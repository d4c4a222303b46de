//! Great-circle distance and bearing on a spherical earth

use super::projection::GeoPoint;

/// Mean earth radius
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometres
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let s_lat = libm::sin(dlat / 2.0);
    let s_lon = libm::sin(dlon / 2.0);
    let h = s_lat * s_lat + libm::cos(lat1) * libm::cos(lat2) * s_lon * s_lon;

    2.0 * EARTH_RADIUS_KM * libm::atan2(libm::sqrt(h), libm::sqrt(1.0 - h))
}

/// Initial bearing from `a` towards `b`, degrees clockwise from north in `0..360`
pub fn bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = libm::sin(dlon) * libm::cos(lat2);
    let x = libm::cos(lat1) * libm::sin(lat2) - libm::sin(lat1) * libm::cos(lat2) * libm::cos(dlon);

    // atan2 yields -180..=180
    let deg = libm::atan2(y, x).to_degrees();
    libm::fmod(deg + 360.0, 360.0)
}
