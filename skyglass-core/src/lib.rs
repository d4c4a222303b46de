//! Board-agnostic core of the skyglass air traffic display
//!
//! This crate turns a stream of aircraft observations into incremental
//! redraws of a fixed map background:
//!
//! - Web mercator projection into the calibrated map window
//! - Fixed-capacity track table with TTL expiry and oldest-first recycling
//! - Per-frame draw list, ordered by ascending altitude
//! - Dirty-rectangle computation, merge and restore + redraw
//! - Run-length rasterization of 1-bit heading sprites
//! - Frame summary (nearest, farthest, highest) for the status line
//! - Configuration types, TOML subset parser and binary persistence
//!
//! Everything that must survive between refresh cycles lives in [`Radar`].
//! Nothing here allocates; every table has a compile-time capacity.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod draw;
pub mod feed;
pub mod geo;
pub mod radar;
pub mod render;
pub mod summary;
pub mod track;

pub use config::RadarConfig;
pub use feed::{FeedCounts, Observation};
pub use geo::{GeoPoint, GeoProjector, ScreenPoint};
pub use radar::{
    DropReason, FrameReport, IngestOutcome, Radar, RadarError, RefreshGate, RejectReason,
};
pub use summary::FrameSummary;
pub use track::{Altitude, AltitudeBand, Track, TrackId, TrackStore};
