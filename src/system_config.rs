//! # JSON Panel Configuration
//!
//! Panel dimensions and key timing, loadable from a JSON file. Every field
//! is optional in the file; anything left out falls back to the DE2-115
//! reference board.
//!
//! ## Usage
//!
//! ```rust
//! use de2_panel::system_config::PanelConfig;
//!
//! let config = PanelConfig::from_json_str(r#"{ "hex_digits": 4 }"#).expect("valid config");
//! assert_eq!(config.hex_digits, 4);
//! assert_eq!(config.red_leds, 18);
//! ```
//!
//! ## Configuration File Format
//!
//! ```json
//! {
//!   "name": "DE2-115",
//!   "hex_digits": 8,
//!   "red_leds": 18,
//!   "green_leds": 9,
//!   "switches": 18,
//!   "keys": 4,
//!   "key_timing": { "min_ticks": 10, "max_ticks": 250 },
//!   "seed": null
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::types::BitBank;

pub const NUM_HEX: usize = 8;
pub const NUM_RED_LEDS: u32 = 18;
pub const NUM_GREEN_LEDS: u32 = 9;
pub const NUM_SWITCHES: u32 = 18;
pub const NUM_KEYS: u32 = 4;

/// Minimum number of ticks a pushed key stays down.
pub const KEY_PUSH_MIN_TIME: u64 = 10;
/// Width of the random window added on top of [`KEY_PUSH_MIN_TIME`].
pub const KEY_PUSH_MAX_TIME: u64 = 250;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse panel config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid panel config: {0}")]
    Invalid(String),
}

/// How long a pushed key is held, in ticks.
///
/// The hold time is drawn uniformly from `[min_ticks, min_ticks + max_ticks)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyTiming {
    pub min_ticks: u64,
    pub max_ticks: u64,
}

impl Default for KeyTiming {
    fn default() -> Self {
        Self {
            min_ticks: KEY_PUSH_MIN_TIME,
            max_ticks: KEY_PUSH_MAX_TIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub name: String,
    pub hex_digits: usize,
    pub red_leds: u32,
    pub green_leds: u32,
    pub switches: u32,
    pub keys: u32,
    pub key_timing: KeyTiming,
    /// Fixed seed for key hold times; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            name: "DE2-115".to_string(),
            hex_digits: NUM_HEX,
            red_leds: NUM_RED_LEDS,
            green_leds: NUM_GREEN_LEDS,
            switches: NUM_SWITCHES,
            keys: NUM_KEYS,
            key_timing: KeyTiming::default(),
            seed: None,
        }
    }
}

impl PanelConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PanelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        log::debug!("Loaded panel config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject dimensions the bit banks cannot represent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let banks = [
            ("red_leds", self.red_leds),
            ("green_leds", self.green_leds),
            ("switches", self.switches),
            ("keys", self.keys),
        ];
        for (field, width) in banks {
            if width == 0 || width > BitBank::MAX_WIDTH {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 1 and {}, got {}",
                    field,
                    BitBank::MAX_WIDTH,
                    width
                )));
            }
        }
        if self.hex_digits == 0 {
            return Err(ConfigError::Invalid(
                "hex_digits must be at least 1".to_string(),
            ));
        }
        if self.key_timing.max_ticks == 0 {
            return Err(ConfigError::Invalid(
                "key_timing.max_ticks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_reference_board() {
        let config = PanelConfig::default();
        assert_eq!(config.hex_digits, 8);
        assert_eq!(config.red_leds, 18);
        assert_eq!(config.green_leds, 9);
        assert_eq!(config.switches, 18);
        assert_eq!(config.keys, 4);
        assert_eq!(config.key_timing, KeyTiming { min_ticks: 10, max_ticks: 250 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            PanelConfig::from_json_str(r#"{"keys": 2, "key_timing": {"min_ticks": 1}}"#).unwrap();
        assert_eq!(config.keys, 2);
        assert_eq!(config.switches, NUM_SWITCHES);
        assert_eq!(config.key_timing.min_ticks, 1);
        assert_eq!(config.key_timing.max_ticks, KEY_PUSH_MAX_TIME);
    }

    #[test]
    fn test_rejects_oversized_bank() {
        let err = PanelConfig::from_json_str(r#"{"red_leds": 33}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("red_leds"));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = PanelConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PanelConfig::from_json_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
