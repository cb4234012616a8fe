// NativeBridge — the object the host creates on attach and detaches on teardown.
//
// Calls from the host return immediately; results come back through the
// listener. A private single-worker runtime runs the session task plus the
// per-request and event-forwarding tasks.

use crate::callbacks::{
    AlertAudioCallback, BridgeListener, CallbackAudioHost, CallbackWindowHost, WindowCallback,
};
use crate::{BridgeInitError, BridgeReply, BridgeSettings, ERR_ARGUMENTS};
use callbridge_core::{
    BridgeConfig, BridgeError, BridgeHandle, BridgeSession, Channel, Command, CommandResult,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Runtime;

pub struct NativeBridge {
    /// `None` only while dropping
    runtime: Option<Runtime>,
    session: Mutex<Option<BridgeHandle>>,
    listener: Arc<dyn BridgeListener>,
}

impl NativeBridge {
    pub fn new(
        settings: BridgeSettings,
        audio: Box<dyn AlertAudioCallback>,
        window: Box<dyn WindowCallback>,
        listener: Box<dyn BridgeListener>,
    ) -> Result<Self, BridgeInitError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("callbridge")
            .enable_all()
            .build()
            .map_err(|e| BridgeInitError::Runtime {
                reason: e.to_string(),
            })?;

        let listener: Arc<dyn BridgeListener> = Arc::from(listener);
        let audio_host = CallbackAudioHost {
            callback: Arc::from(audio),
        };
        let window_host = CallbackWindowHost {
            callback: Arc::from(window),
        };

        let (handle, mut events) = {
            let _guard = runtime.enter();
            BridgeSession::attach(
                BridgeConfig::from(settings),
                Box::new(audio_host),
                Box::new(window_host),
            )
            .map_err(|e| BridgeInitError::InvalidConfig {
                reason: e.to_string(),
            })?
        };

        let push_listener = listener.clone();
        runtime.spawn(async move {
            while let Some(event) = events.recv().await {
                push_listener.on_push(
                    event.channel().to_string(),
                    event.name().to_string(),
                    event.payload().to_string(),
                );
            }
        });

        tracing::info!("NativeBridge attached");
        Ok(Self {
            runtime: Some(runtime),
            session: Mutex::new(Some(handle)),
            listener,
        })
    }

    fn handle(&self) -> Option<BridgeHandle> {
        self.session.lock().clone()
    }

    /// Queue a command. Exactly one `on_response(request_id, ..)` follows.
    pub fn invoke(&self, request_id: u64, channel: String, method: String, arguments_json: String) {
        let channel = match channel.parse::<Channel>() {
            Ok(channel) => channel,
            Err(e) => {
                tracing::warn!("{}", e);
                self.listener
                    .on_response(request_id, CommandResult::NotImplemented.into());
                return;
            }
        };

        let command = match Command::from_json_arguments(channel, method, &arguments_json) {
            Ok(command) => command,
            Err(e) => {
                self.listener.on_response(
                    request_id,
                    BridgeReply::error(ERR_ARGUMENTS, format!("Invalid arguments: {e}")),
                );
                return;
            }
        };

        let Some(handle) = self.handle() else {
            let reply = CommandResult::from(BridgeError::Detached);
            self.listener.on_response(request_id, reply.into());
            return;
        };

        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };
        let listener = self.listener.clone();
        runtime.spawn(async move {
            let result = handle.invoke(command).await;
            listener.on_response(request_id, result.into());
        });
    }

    /// Called by the host whenever the OS reports a PiP mode change.
    pub fn report_pip_mode_changed(&self, is_in_pip_mode: bool) {
        if let Some(handle) = self.handle() {
            handle.report_pip_mode_changed(is_in_pip_mode);
        }
    }

    /// Release audio and stop accepting commands.
    ///
    /// Blocks until done, except when called from a listener callback (or any
    /// other async context), where the detach is queued instead.
    pub fn detach(&self) {
        let Some(handle) = self.session.lock().take() else {
            return;
        };
        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };

        if tokio::runtime::Handle::try_current().is_ok() {
            runtime.spawn(async move { handle.detach().await });
            tracing::info!("NativeBridge detach queued from async context");
        } else {
            runtime.block_on(handle.detach());
            tracing::info!("NativeBridge detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.handle().is_some_and(|handle| handle.is_attached())
    }
}

impl Drop for NativeBridge {
    fn drop(&mut self) {
        self.detach();
        // A runtime cannot be dropped, which blocks, from inside async code.
        // Shutting it down in the background drops the session task, whose
        // controllers release audio on drop.
        if tokio::runtime::Handle::try_current().is_ok() {
            if let Some(runtime) = self.runtime.take() {
                runtime.shutdown_background();
            }
        }
    }
}
