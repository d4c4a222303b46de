//! Simple TOML parser for display configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! skyglass configuration. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - [section] headers
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys or dotted section headers
//!
//! Keys missing from the input keep their default value. Unknown keys are
//! ignored; unknown sections are rejected.

use super::types::RadarConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value does not parse as the key's type
    InvalidValue,
    /// Line is neither a header, a comment nor `key = value`
    MalformedLine,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Map,
    Screen,
    Icon,
    Sprite,
    Tracks,
    Home,
    Status,
}

/// Parse TOML configuration into RadarConfig
///
/// The result is not validated; see [`RadarConfig::validate`].
pub fn parse_config(input: &str) -> Result<RadarConfig, ParseError> {
    let mut config = RadarConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::MalformedLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

/// Parse a section header line like "[map]" or "[tracks] # timing"
fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let line = strip_comment(line);
    let header = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;

    match header.trim() {
        "map" => Ok(Section::Map),
        "screen" => Ok(Section::Screen),
        "icon" => Ok(Section::Icon),
        "sprite" => Ok(Section::Sprite),
        "tracks" => Ok(Section::Tracks),
        "home" => Ok(Section::Home),
        "status" => Ok(Section::Status),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(hash_pos) if text[..hash_pos].matches('"').count() % 2 == 0 => text[..hash_pos].trim(),
        _ => text,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for ch in value.chars().filter(|&c| c != '_') {
        digits.push(ch).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a float value from a quoted or bare number
fn parse_float(value: &str) -> Result<f64, ParseError> {
    let value: f64 = parse_string(value)
        .parse()
        .map_err(|_| ParseError::InvalidValue)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match parse_string(value) {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a rotation direction ("cw" / "ccw")
fn parse_direction(value: &str) -> Result<bool, ParseError> {
    match parse_string(value) {
        "ccw" | "counter_clockwise" => Ok(true),
        "cw" | "clockwise" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut RadarConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {
            if key == "version" {
                config.version = parse_int(value)?;
            }
        }
        Section::Map => match key {
            "zoom" => config.map.zoom = parse_int(value)?,
            "origin_x" | "px0" => config.map.origin_x = parse_float(value)?,
            "origin_y" | "py0" => config.map.origin_y = parse_float(value)?,
            _ => {} // Ignore unknown keys
        },
        Section::Screen => match key {
            "width" => config.screen.width = parse_int(value)?,
            "height" => config.screen.height = parse_int(value)?,
            "legend_h" | "legend_height" => config.screen.legend_h = parse_int(value)?,
            "status_h" | "status_height" => config.screen.status_h = parse_int(value)?,
            _ => {}
        },
        Section::Icon => match key {
            "width" => config.icon.width = parse_int(value)?,
            "height" => config.icon.height = parse_int(value)?,
            _ => {}
        },
        Section::Sprite => match key {
            "counter_clockwise" => config.sprite.counter_clockwise = parse_bool(value)?,
            "direction" => config.sprite.counter_clockwise = parse_direction(value)?,
            "offset_deg" => config.sprite.offset_deg = parse_int(value)?,
            "flip_180" => config.sprite.flip_180 = parse_bool(value)?,
            _ => {}
        },
        Section::Tracks => match key {
            "ttl_ms" => config.tracks.ttl_ms = parse_int(value)?,
            "position_stale_ms" | "stale_ms" => config.tracks.position_stale_ms = parse_int(value)?,
            "max_draw" => config.tracks.max_draw = parse_int(value)?,
            "refresh_interval_ms" | "refresh_ms" => {
                config.tracks.refresh_interval_ms = parse_int(value)?
            }
            _ => {}
        },
        Section::Home => match key {
            "lat" | "latitude" => config.home.lat = parse_float(value)?,
            "lon" | "longitude" => config.home.lon = parse_float(value)?,
            _ => {}
        },
        Section::Status => match key {
            "left_margin" => config.status.left_margin = parse_int(value)?,
            "text_y_offset" => config.status.text_y_offset = parse_int(value)?,
            _ => {}
        },
    }

    Ok(())
}
