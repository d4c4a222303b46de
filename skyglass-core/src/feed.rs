//! Feed-side input types
//!
//! The network and JSON layers live outside this crate. They hand over one
//! [`Observation`] per aircraft plus the per-fetch [`FeedCounts`].

use crate::geo::GeoPoint;
use crate::track::Altitude;

/// One aircraft as reported by the feed for the current fetch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<'a> {
    /// Hex ICAO address
    pub id: &'a str,
    /// Callsign, if broadcast
    pub label: Option<&'a str>,
    pub position: GeoPoint,
    /// Ground track in degrees
    pub heading_deg: f64,
    pub altitude: Altitude,
    /// Time of the observation
    pub timestamp_ms: u64,
}

/// Aircraft counts reported alongside a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedCounts {
    /// Aircraft entries in the fetch
    pub total: u16,
    /// Entries with a fresh position
    pub with_position: u16,
}
