//! Binary configuration blob
//!
//! A postcard-serialized [`RadarConfig`] behind a magic number. The config
//! carries its own format version, checked on decode.

use serde::{Deserialize, Serialize};

use super::loader::ConfigError;
use super::types::{RadarConfig, CONFIG_VERSION};

/// Magic number to identify a valid config blob
pub const CONFIG_MAGIC: u32 = 0x534B_5947; // "SKYG"

/// Upper bound of an encoded blob
pub const MAX_CONFIG_SIZE: usize = 128;

#[derive(Serialize, Deserialize)]
struct ConfigBlob {
    magic: u32,
    config: RadarConfig,
}

/// Serialize `config` into `buf`, returning the used prefix
pub fn encode<'b>(config: &RadarConfig, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
    let blob = ConfigBlob {
        magic: CONFIG_MAGIC,
        config: *config,
    };
    postcard::to_slice(&blob, buf).map_err(|_| ConfigError::Serialize)
}

/// Deserialize a blob written by [`encode`]
///
/// The result is not validated; see [`RadarConfig::validate`].
pub fn decode(bytes: &[u8]) -> Result<RadarConfig, ConfigError> {
    let blob: ConfigBlob = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

    if blob.magic != CONFIG_MAGIC {
        return Err(ConfigError::BadMagic);
    }

    if blob.config.version != CONFIG_VERSION {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "Config version mismatch: found {}, expected {}",
            blob.config.version,
            CONFIG_VERSION
        );
        return Err(ConfigError::VersionMismatch);
    }

    Ok(blob.config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_calibration() {
        let mut config = RadarConfig::default();
        config.map.zoom = 10;
        config.home.lat = -33.9;
        config.sprite.offset_deg = -45;

        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let used = encode(&config, &mut buf).unwrap().len();
        assert!(used <= MAX_CONFIG_SIZE);

        assert_eq!(decode(&buf[..used]).unwrap(), config);
    }

    #[test]
    fn test_rejects_version_mismatch() {
        let mut config = RadarConfig::default();
        config.version = CONFIG_VERSION + 1;

        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let used = encode(&config, &mut buf).unwrap().len();

        assert_eq!(decode(&buf[..used]), Err(ConfigError::VersionMismatch));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let used = encode(&RadarConfig::default(), &mut buf).unwrap().len();
        // Magic is the leading varint; corrupt its low byte
        buf[0] ^= 0x01;

        assert_eq!(decode(&buf[..used]), Err(ConfigError::BadMagic));
    }

    #[test]
    fn test_rejects_truncated_blob() {
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let used = encode(&RadarConfig::default(), &mut buf).unwrap().len();

        assert_eq!(decode(&buf[..used / 2]), Err(ConfigError::Deserialize));
    }

    #[test]
    fn test_encode_into_small_buffer_fails() {
        let mut buf = [0u8; 4];
        assert_eq!(
            encode(&RadarConfig::default(), &mut buf).err(),
            Some(ConfigError::Serialize)
        );
    }
}
