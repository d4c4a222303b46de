//! Configuration loading
//!
//! Picks the configuration from whatever the board has stored: a TOML file
//! first, then the binary blob. Falls back to built-in defaults if neither
//! is present.

use core::str;

use super::toml::{parse_config, ParseError};
use super::types::{RadarConfig, ValidationError};

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML parsing failed
    TomlParse(ParseError),
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// Binary blob could not be decoded
    Deserialize,
    /// Binary blob could not be encoded
    Serialize,
    /// Binary blob does not start with the config magic
    BadMagic,
    /// Config version mismatch
    VersionMismatch,
    /// Binary blobs need the `serde` feature
    Unsupported,
    /// Parsed configuration failed validation
    Invalid(ValidationError),
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::TomlParse(e)
    }
}

impl From<ValidationError> for ConfigError {
    fn from(e: ValidationError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigSource {
    Toml,
    Binary,
    Defaults,
}

/// Load and validate the display configuration
///
/// Tries the TOML text first, falls back to the binary blob. Returns the
/// defaults when neither is supplied, and the error of the last source
/// tried when every supplied source is unusable.
pub fn load_config(
    toml: Option<&[u8]>,
    blob: Option<&[u8]>,
) -> Result<(RadarConfig, ConfigSource), ConfigError> {
    let mut last_error = None;

    if let Some(bytes) = toml {
        match load_toml(bytes) {
            Ok(config) => {
                log_config_summary(&config, ConfigSource::Toml);
                return Ok((config, ConfigSource::Toml));
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Failed to load TOML config: {:?}, trying binary", e);
                last_error = Some(e);
            }
        }
    }

    if let Some(bytes) = blob {
        match load_binary(bytes) {
            Ok(config) => {
                log_config_summary(&config, ConfigSource::Binary);
                return Ok((config, ConfigSource::Binary));
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Failed to load binary config: {:?}", e);
                last_error = Some(e);
            }
        }
    }

    if let Some(e) = last_error {
        return Err(e);
    }

    #[cfg(feature = "defmt")]
    defmt::debug!("No stored config, using defaults");
    let config = RadarConfig::default();
    log_config_summary(&config, ConfigSource::Defaults);
    Ok((config, ConfigSource::Defaults))
}

fn load_toml(bytes: &[u8]) -> Result<RadarConfig, ConfigError> {
    let text = str::from_utf8(bytes).map_err(|_| ConfigError::InvalidUtf8)?;
    let config = parse_config(text)?;
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "serde")]
fn load_binary(bytes: &[u8]) -> Result<RadarConfig, ConfigError> {
    let config = super::binary::decode(bytes)?;
    config.validate()?;
    Ok(config)
}

#[cfg(not(feature = "serde"))]
fn load_binary(_bytes: &[u8]) -> Result<RadarConfig, ConfigError> {
    Err(ConfigError::Unsupported)
}

/// Log a summary of the loaded configuration
#[allow(unused_variables)]
fn log_config_summary(config: &RadarConfig, source: ConfigSource) {
    #[cfg(feature = "defmt")]
    {
        defmt::info!("Configuration loaded from {:?}", source);
        defmt::debug!(
            "  zoom {} origin ({}, {})",
            config.map.zoom,
            config.map.origin_x,
            config.map.origin_y
        );
        defmt::debug!("  canvas {}x{}", config.screen.width, config.screen.height);
        defmt::debug!(
            "  ttl {} ms, stale {} ms, max draw {}",
            config.tracks.ttl_ms,
            config.tracks.position_stale_ms,
            config.tracks.max_draw
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_stored_uses_defaults() {
        let (config, source) = load_config(None, None).unwrap();
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config, RadarConfig::default());
    }

    #[test]
    fn test_toml_preferred() {
        let toml = b"[map]\nzoom = 7\n".as_slice();
        let (config, source) = load_config(Some(toml), Some(b"garbage".as_slice())).unwrap();
        assert_eq!(source, ConfigSource::Toml);
        assert_eq!(config.map.zoom, 7);
    }

    #[test]
    fn test_invalid_utf8_reported() {
        let toml = [0xffu8, 0xfe];
        let toml = toml.as_slice();
        assert_eq!(
            load_config(Some(toml), None),
            Err(ConfigError::InvalidUtf8)
        );
    }

    #[test]
    fn test_toml_validation_failure_reported() {
        let toml = b"[tracks]\nttl_ms = 5000\nposition_stale_ms = 6000\n".as_slice();
        assert_eq!(
            load_config(Some(toml), None),
            Err(ConfigError::Invalid(ValidationError::StaleAfterTtl))
        );
    }

    #[test]
    fn test_parse_error_converts() {
        assert_eq!(
            load_config(Some(b"[bogus]\n".as_slice()), None),
            Err(ConfigError::TomlParse(ParseError::InvalidSection))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_falls_back_to_binary() {
        use crate::config::binary::{encode, MAX_CONFIG_SIZE};

        let mut stored = RadarConfig::default();
        stored.map.zoom = 6;
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let used = encode(&stored, &mut buf).unwrap().len();

        let broken = b"[map]\nzoom = x\n".as_slice();
        let (config, source) = load_config(Some(broken), Some(&buf[..used])).unwrap();
        assert_eq!(source, ConfigSource::Binary);
        assert_eq!(config.map.zoom, 6);
    }
}
