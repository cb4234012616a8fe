//! Bridge configuration supplied by the host at attach time
//!
//! The bridge reads no files or environment on its own; the host builds a
//! `BridgeConfig` (or loads one via [`BridgeConfig::from_json`]) and hands it
//! to [`crate::BridgeSession::attach`].

use crate::error::ConfigError;
use crate::pip::AspectRatio;
use serde::{Deserialize, Serialize};

/// Default platform level at which windowed (PiP) mode becomes available
pub const DEFAULT_MIN_WINDOWED_LEVEL: u32 = 26;
/// Default platform level at which auto-enter on leave becomes available
pub const DEFAULT_MIN_AUTO_ENTER_LEVEL: u32 = 31;
/// Default bound on queued commands awaiting the session task
pub const DEFAULT_COMMAND_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub audio: AudioConfig,
    pub pip: PipConfig,
    /// Maximum number of commands queued for the session task
    pub command_queue_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Playback volume applied to both output channels, 0.0-1.0
    pub volume: f32,
    /// Loop the alert sound until stopped
    pub looping: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipConfig {
    pub min_windowed_level: u32,
    pub min_auto_enter_level: u32,
    /// Aspect ratio used for missing or non-positive dimensions
    pub default_aspect: AspectRatio,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            pip: PipConfig::default(),
            command_queue_capacity: DEFAULT_COMMAND_QUEUE_CAPACITY,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looping: true,
        }
    }
}

impl Default for PipConfig {
    fn default() -> Self {
        Self {
            min_windowed_level: DEFAULT_MIN_WINDOWED_LEVEL,
            min_auto_enter_level: DEFAULT_MIN_AUTO_ENTER_LEVEL,
            default_aspect: AspectRatio::DEFAULT,
        }
    }
}

impl BridgeConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let volume = self.audio.volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(ConfigError::InvalidVolume(volume));
        }

        let aspect = self.pip.default_aspect;
        if aspect.width == 0 || aspect.height == 0 {
            return Err(ConfigError::InvalidAspectRatio(aspect.width, aspect.height));
        }

        if self.pip.min_auto_enter_level < self.pip.min_windowed_level {
            return Err(ConfigError::InvalidTierThresholds {
                windowed: self.pip.min_windowed_level,
                auto_enter: self.pip.min_auto_enter_level,
            });
        }

        if self.command_queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity);
        }

        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
