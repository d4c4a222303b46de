//! Track table
//!
//! One entry per aircraft currently known, keyed by its ICAO identity.

pub mod store;
pub mod types;

pub use store::{TrackStore, MAX_TRACKS};
pub use types::*;
