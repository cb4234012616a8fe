// Callback interfaces implemented by the host platform, and their adapters
// onto the core primitive traits.

use crate::{BridgeReply, NativeError};
use callbridge_core::host::{AlertAudioHost, AlertPlayer, WindowHost};
use callbridge_core::{AspectRatio, HostError};
use std::sync::Arc;

/// Platform audio output (e.g. a MediaPlayer wrapper on Android).
/// Players are addressed by the id returned from `create_default_alert`.
pub trait AlertAudioCallback: Send + Sync {
    fn create_default_alert(&self) -> Result<u64, NativeError>;
    fn set_looping(&self, player_id: u64, looping: bool) -> Result<(), NativeError>;
    fn set_volume(&self, player_id: u64, left: f32, right: f32) -> Result<(), NativeError>;
    fn start(&self, player_id: u64) -> Result<(), NativeError>;
    fn is_playing(&self, player_id: u64) -> Result<bool, NativeError>;
    fn stop(&self, player_id: u64) -> Result<(), NativeError>;
    fn reset(&self, player_id: u64) -> Result<(), NativeError>;
    fn release(&self, player_id: u64) -> Result<(), NativeError>;
}

/// Platform window manager for the hosting activity
pub trait WindowCallback: Send + Sync {
    fn platform_level(&self) -> u32;
    fn enter_pip(&self, width: u32, height: u32) -> Result<(), NativeError>;
    fn set_auto_enter(&self, enabled: bool, width: u32, height: u32) -> Result<(), NativeError>;
    fn move_to_back(&self) -> Result<(), NativeError>;
}

/// Receives responses and push events
pub trait BridgeListener: Send + Sync {
    fn on_response(&self, request_id: u64, reply: BridgeReply);
    fn on_push(&self, channel: String, event: String, payload_json: String);
}

fn host_error(err: NativeError) -> HostError {
    match err {
        NativeError::Failed { message } => HostError::IllegalState(message),
    }
}

pub(crate) struct CallbackAudioHost {
    pub(crate) callback: Arc<dyn AlertAudioCallback>,
}

impl AlertAudioHost for CallbackAudioHost {
    fn acquire_default_alert(&mut self) -> Result<Box<dyn AlertPlayer>, HostError> {
        let id = self
            .callback
            .create_default_alert()
            .map_err(|NativeError::Failed { message }| HostError::Unavailable(message))?;
        Ok(Box::new(CallbackPlayer {
            id,
            callback: self.callback.clone(),
        }))
    }
}

struct CallbackPlayer {
    id: u64,
    callback: Arc<dyn AlertAudioCallback>,
}

impl AlertPlayer for CallbackPlayer {
    fn set_looping(&mut self, looping: bool) -> Result<(), HostError> {
        self.callback.set_looping(self.id, looping).map_err(host_error)
    }

    fn set_volume(&mut self, left: f32, right: f32) -> Result<(), HostError> {
        self.callback.set_volume(self.id, left, right).map_err(host_error)
    }

    fn start(&mut self) -> Result<(), HostError> {
        self.callback.start(self.id).map_err(host_error)
    }

    fn is_playing(&self) -> Result<bool, HostError> {
        self.callback.is_playing(self.id).map_err(host_error)
    }

    fn stop(&mut self) -> Result<(), HostError> {
        self.callback.stop(self.id).map_err(host_error)
    }

    fn reset(&mut self) -> Result<(), HostError> {
        self.callback.reset(self.id).map_err(host_error)
    }

    fn release(&mut self) -> Result<(), HostError> {
        self.callback.release(self.id).map_err(host_error)
    }
}

pub(crate) struct CallbackWindowHost {
    pub(crate) callback: Arc<dyn WindowCallback>,
}

impl WindowHost for CallbackWindowHost {
    fn platform_level(&self) -> u32 {
        self.callback.platform_level()
    }

    fn request_enter_pip(&mut self, aspect: AspectRatio) -> Result<(), HostError> {
        self.callback
            .enter_pip(aspect.width, aspect.height)
            .map_err(|NativeError::Failed { message }| HostError::Rejected(message))
    }

    fn set_auto_enter(&mut self, enabled: bool, aspect: AspectRatio) -> Result<(), HostError> {
        self.callback
            .set_auto_enter(enabled, aspect.width, aspect.height)
            .map_err(|NativeError::Failed { message }| HostError::Rejected(message))
    }

    fn move_to_back(&mut self) -> Result<(), HostError> {
        self.callback.move_to_back().map_err(host_error)
    }
}
