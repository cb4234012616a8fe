//! Routes commands to their controllers and shapes every outcome into a
//! [`CommandResult`]
//!
//! The dispatcher is synchronous and owns both controllers; the session task
//! in [`crate::session`] gives it its single execution context.

use crate::audio::AudioController;
use crate::command::{AudioRequest, Command, CommandResult, PipRequest, Request};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::events::EventSink;
use crate::host::{AlertAudioHost, WindowHost};
use crate::pip::{PipController, PipState};
use std::panic::{catch_unwind, AssertUnwindSafe};

pub struct CommandDispatcher {
    audio: AudioController,
    pip: PipController,
}

impl CommandDispatcher {
    pub fn new(
        config: &BridgeConfig,
        audio_host: Box<dyn AlertAudioHost>,
        window_host: Box<dyn WindowHost>,
        events: EventSink,
    ) -> Self {
        Self {
            audio: AudioController::new(audio_host, config.audio.clone()),
            pip: PipController::new(window_host, config.pip.clone(), events),
        }
    }

    /// Handle one command. Always produces exactly one result.
    pub fn dispatch(&mut self, command: &Command) -> CommandResult {
        let request = match command.parse() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("{}", e);
                return e.into();
            }
        };
        tracing::debug!("Dispatching {}.{}", command.channel, command.method);

        match request {
            Request::Audio(audio) => {
                guard(|| self.handle_audio(audio), |msg| audio.fault(msg)).into()
            }
            Request::Pip(pip) => guard(|| self.handle_pip(pip), BridgeError::PipRequest).into(),
        }
    }

    fn handle_audio(&mut self, request: AudioRequest) -> Result<bool, BridgeError> {
        match request {
            AudioRequest::Play => self.audio.play(),
            AudioRequest::Stop => Ok(self.audio.stop()),
        }
    }

    fn handle_pip(&mut self, request: PipRequest) -> Result<bool, BridgeError> {
        match request {
            PipRequest::Enter { width, height } => self.pip.enter_pip(width, height),
            PipRequest::SetAutoEnter {
                enabled,
                width,
                height,
            } => self.pip.set_auto_pip(enabled, width, height),
            PipRequest::Close => Ok(self.pip.close_pip()),
        }
    }

    /// Relay an OS-reported PiP transition.
    pub fn on_pip_mode_changed(&mut self, is_in_pip_mode: bool) {
        let pip = &mut self.pip;
        let outcome = catch_unwind(AssertUnwindSafe(|| pip.on_mode_changed(is_in_pip_mode)));
        if let Err(payload) = outcome {
            tracing::error!("PiP mode report panicked: {}", panic_message(payload));
        }
    }

    /// Tear down session state: release any audio resource.
    pub fn detach(&mut self) {
        self.audio.stop();
        tracing::info!("Dispatcher detached");
    }

    pub fn is_playing(&self) -> bool {
        self.audio.is_playing()
    }

    pub fn pip_state(&self) -> PipState {
        self.pip.state()
    }
}

/// Run a handler, converting a panic raised inside a native primitive into a
/// typed failure.
fn guard<F, E>(f: F, on_panic: E) -> Result<bool, BridgeError>
where
    F: FnOnce() -> Result<bool, BridgeError>,
    E: FnOnce(String) -> BridgeError,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let msg = panic_message(payload);
            tracing::error!("Native primitive panicked: {}", msg);
            Err(on_panic(format!("native fault: {msg}")))
        }
    }
}

/// Extract a human-readable message from a panic payload.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}
