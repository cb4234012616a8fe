// callbridge-mobile — Native mobile bindings for iOS and Android
// This crate exports the bridge via UniFFI. The host app implements the
// callback interfaces (audio output, window manager, listener) and drives
// a `NativeBridge` per attached activity.

mod callbacks;
mod native_bridge;

pub use callbacks::{AlertAudioCallback, BridgeListener, WindowCallback};
pub use native_bridge::NativeBridge;

use callbridge_core::{AspectRatio, AudioConfig, BridgeConfig, CommandResult, PipConfig};

uniffi::include_scaffolding!("bridge");

/// Error code used when the argument document cannot be parsed
pub const ERR_ARGUMENTS: &str = "ERR_ARGUMENTS";

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Failure thrown by a host callback
#[derive(Debug, thiserror::Error)]
pub enum NativeError {
    #[error("{message}")]
    Failed { message: String },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for NativeError {
    fn from(err: uniffi::UnexpectedUniFFICallbackError) -> Self {
        NativeError::Failed {
            message: err.reason,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeInitError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
    #[error("Runtime unavailable: {reason}")]
    Runtime { reason: String },
}

// ============================================================================
// DATA TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Success,
    Error,
    NotImplemented,
}

/// Response to one `invoke`, delivered through `BridgeListener::on_response`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeReply {
    pub status: ReplyStatus,
    pub value_json: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl BridgeReply {
    pub(crate) fn error(code: &str, message: String) -> Self {
        Self {
            status: ReplyStatus::Error,
            value_json: None,
            error_code: Some(code.to_string()),
            error_message: Some(message),
        }
    }
}

impl From<CommandResult> for BridgeReply {
    fn from(result: CommandResult) -> Self {
        match result {
            CommandResult::Success(value) => Self {
                status: ReplyStatus::Success,
                value_json: Some(value.to_string()),
                error_code: None,
                error_message: None,
            },
            CommandResult::Failure { code, message } => Self::error(&code, message),
            CommandResult::NotImplemented => Self {
                status: ReplyStatus::NotImplemented,
                value_json: None,
                error_code: None,
                error_message: None,
            },
        }
    }
}

/// Host-facing flattening of [`BridgeConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeSettings {
    pub volume: f32,
    pub looping: bool,
    pub min_windowed_level: u32,
    pub min_auto_enter_level: u32,
    pub default_aspect_width: u32,
    pub default_aspect_height: u32,
}

impl From<BridgeSettings> for BridgeConfig {
    fn from(settings: BridgeSettings) -> Self {
        BridgeConfig {
            audio: AudioConfig {
                volume: settings.volume,
                looping: settings.looping,
            },
            pip: PipConfig {
                min_windowed_level: settings.min_windowed_level,
                min_auto_enter_level: settings.min_auto_enter_level,
                default_aspect: AspectRatio::new(
                    settings.default_aspect_width,
                    settings.default_aspect_height,
                ),
            },
            ..BridgeConfig::default()
        }
    }
}

pub fn default_settings() -> BridgeSettings {
    let config = BridgeConfig::default();
    BridgeSettings {
        volume: config.audio.volume,
        looping: config.audio.looping,
        min_windowed_level: config.pip.min_windowed_level,
        min_auto_enter_level: config.pip.min_auto_enter_level,
        default_aspect_width: config.pip.default_aspect.width,
        default_aspect_height: config.pip.default_aspect.height,
    }
}

pub fn init_logging(filter: Option<String>) {
    callbridge_core::init_logging(filter.as_deref());
}
