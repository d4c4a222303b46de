//! Configuration
//!
//! Display calibration types, a TOML subset parser for human-edited files
//! and a postcard blob format for persisted settings.

#[cfg(feature = "serde")]
pub mod binary;
pub mod loader;
pub mod toml;
pub mod types;

pub use loader::{load_config, ConfigError, ConfigSource};
pub use toml::{parse_config, ParseError};
pub use types::*;
