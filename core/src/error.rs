//! Error taxonomy for the bridge
//!
//! Every failure that reaches the caller carries a stable wire code (see
//! [`BridgeError::code`]) plus a human-readable message. Soft-unsupported
//! conditions are not errors; they surface as `Success(false)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// WIRE CODES
// ============================================================================

pub const ERR_PLAY: &str = "ERR_PLAY";
pub const ERR_STOP: &str = "ERR_STOP";
pub const ERR_PIP: &str = "ERR_PIP";
pub const NOT_SUPPORTED: &str = "NOT_SUPPORTED";
pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
pub const ERR_DETACHED: &str = "ERR_DETACHED";

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Failure reported by a native primitive (audio output, window manager).
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostError {
    #[error("Resource unavailable: {0}")]
    Unavailable(String),

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Errors surfaced across the dispatcher boundary
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Native audio primitive failed while starting playback
    #[error("Playback failed: {0}")]
    Playback(String),

    /// Teardown of the audio session faulted outside its best-effort steps
    #[error("Stop failed: {0}")]
    Stop(String),

    /// OS tier too low for a hard-gated operation
    #[error("{operation} requires capability tier {required}, device is {actual}")]
    UnsupportedCapability {
        operation: String,
        required: String,
        actual: String,
    },

    /// Host rejected a window mode request
    #[error("PiP request failed: {0}")]
    PipRequest(String),

    /// Method name not recognised on a known channel
    #[error("Unknown method `{method}` on channel `{channel}`")]
    UnknownMethod { channel: String, method: String },

    /// The session was detached before the command could run
    #[error("Bridge session is detached")]
    Detached,
}

impl BridgeError {
    /// Stable code delivered to the caller alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            Self::Playback(_) => ERR_PLAY,
            Self::Stop(_) => ERR_STOP,
            Self::UnsupportedCapability { .. } => NOT_SUPPORTED,
            Self::PipRequest(_) => ERR_PIP,
            Self::UnknownMethod { .. } => NOT_IMPLEMENTED,
            Self::Detached => ERR_DETACHED,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Invalid volume: must be within 0.0-1.0, got {0}")]
    InvalidVolume(f32),

    #[error("Invalid aspect ratio: {0}x{1}")]
    InvalidAspectRatio(u32, u32),

    #[error("Invalid tier thresholds: auto-enter level {auto_enter} is below windowed level {windowed}")]
    InvalidTierThresholds { windowed: u32, auto_enter: u32 },

    #[error("Invalid command queue capacity: must be > 0")]
    InvalidQueueCapacity,

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(BridgeError::Playback("x".into()).code(), "ERR_PLAY");
        assert_eq!(BridgeError::Stop("x".into()).code(), "ERR_STOP");
        assert_eq!(BridgeError::PipRequest("x".into()).code(), "ERR_PIP");
        assert_eq!(BridgeError::Detached.code(), "ERR_DETACHED");
        let unsupported = BridgeError::UnsupportedCapability {
            operation: "enterPip".into(),
            required: "Windowed".into(),
            actual: "Baseline".into(),
        };
        assert_eq!(unsupported.code(), "NOT_SUPPORTED");
        assert!(unsupported.to_string().contains("enterPip"));
    }
}
