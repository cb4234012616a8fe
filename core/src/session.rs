//! Per-attach bridge session
//!
//! `attach` creates the dispatcher and spawns the one task that owns it. All
//! commands and OS reports for both channels are handled on that task, one at
//! a time. `detach` (or dropping every handle) releases the audio resource,
//! closes the event stream and ends the task.

use crate::command::{Command, CommandResult};
use crate::config::BridgeConfig;
use crate::dispatcher::CommandDispatcher;
use crate::error::{BridgeError, ConfigError};
use crate::events::{EventSink, EventStream};
use crate::host::{AlertAudioHost, WindowHost};
use crate::pip::PipState;
use tokio::sync::{mpsc, oneshot};

/// Messages processed by the session task
#[derive(Debug)]
enum SessionMessage {
    Invoke {
        command: Command,
        reply: oneshot::Sender<CommandResult>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Detach {
        reply: oneshot::Sender<()>,
    },
}

/// Point-in-time view of both controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub playing: bool,
    pub pip: PipState,
}

pub struct BridgeSession;

impl BridgeSession {
    /// Validate `config`, build the controllers and start the session task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach(
        config: BridgeConfig,
        audio_host: Box<dyn AlertAudioHost>,
        window_host: Box<dyn WindowHost>,
    ) -> Result<(BridgeHandle, EventStream), ConfigError> {
        config.validate()?;

        let (sink, events) = EventSink::channel();
        let dispatcher = CommandDispatcher::new(&config, audio_host, window_host, sink);

        let (command_tx, command_rx) = mpsc::channel(config.command_queue_capacity);
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_session(dispatcher, command_rx, report_rx));

        tracing::info!("Bridge session attached");
        Ok((
            BridgeHandle {
                command_tx,
                report_tx,
            },
            events,
        ))
    }
}

/// Handle to communicate with the running session task
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    command_tx: mpsc::Sender<SessionMessage>,
    report_tx: mpsc::UnboundedSender<bool>,
}

impl BridgeHandle {
    /// Run a command and wait for its result.
    ///
    /// Resolves to `Failure(ERR_DETACHED)` if the session is gone.
    pub async fn invoke(&self, command: Command) -> CommandResult {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .command_tx
            .send(SessionMessage::Invoke {
                command,
                reply: reply_tx,
            })
            .await
            .is_err()
        {
            return BridgeError::Detached.into();
        }

        reply_rx
            .await
            .unwrap_or_else(|_| BridgeError::Detached.into())
    }

    /// Report an OS-level PiP transition. Never blocks.
    pub fn report_pip_mode_changed(&self, is_in_pip_mode: bool) {
        if self.report_tx.send(is_in_pip_mode).is_err() {
            tracing::debug!("PiP mode report after detach dropped");
        }
    }

    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(SessionMessage::Snapshot { reply: reply_tx })
            .await
            .ok()?;
        reply_rx.await.ok()
    }

    /// Stop the session and wait until its resources are released.
    pub async fn detach(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .command_tx
            .send(SessionMessage::Detach { reply: reply_tx })
            .await
            .is_ok()
        {
            let _ = reply_rx.await;
        }
    }

    pub fn is_attached(&self) -> bool {
        !self.command_tx.is_closed()
    }
}

async fn run_session(
    mut dispatcher: CommandDispatcher,
    mut command_rx: mpsc::Receiver<SessionMessage>,
    mut report_rx: mpsc::UnboundedReceiver<bool>,
) {
    loop {
        tokio::select! {
            // Reports already queued are handled before the next command, so a
            // detach never overtakes transitions reported ahead of it.
            biased;

            Some(is_in_pip_mode) = report_rx.recv() => {
                dispatcher.on_pip_mode_changed(is_in_pip_mode);
            }
            message = command_rx.recv() => {
                match message {
                    Some(SessionMessage::Invoke { command, reply }) => {
                        let result = dispatcher.dispatch(&command);
                        if reply.send(result).is_err() {
                            tracing::debug!("Caller went away before {}.{} completed", command.channel, command.method);
                        }
                    }
                    Some(SessionMessage::Snapshot { reply }) => {
                        let _ = reply.send(SessionSnapshot {
                            playing: dispatcher.is_playing(),
                            pip: dispatcher.pip_state(),
                        });
                    }
                    Some(SessionMessage::Detach { reply }) => {
                        drain_reports(&mut dispatcher, &mut report_rx);
                        dispatcher.detach();
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        drain_reports(&mut dispatcher, &mut report_rx);
                        dispatcher.detach();
                        break;
                    }
                }
            }
        }
    }
    tracing::info!("Bridge session detached");
}

/// Deliver every transition reported before the session stops.
fn drain_reports(dispatcher: &mut CommandDispatcher, report_rx: &mut mpsc::UnboundedReceiver<bool>) {
    while let Ok(is_in_pip_mode) = report_rx.try_recv() {
        dispatcher.on_pip_mode_changed(is_in_pip_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Channel;
    use crate::host::{MockAlertAudioHost, MockWindowHost};

    fn window_at(level: u32) -> Box<MockWindowHost> {
        let mut host = MockWindowHost::new();
        host.expect_platform_level().return_const(level);
        host.expect_move_to_back().returning(|| Ok(()));
        Box::new(host)
    }

    #[tokio::test]
    async fn test_attach_rejects_invalid_config() {
        let mut config = BridgeConfig::default();
        config.audio.volume = -0.1;
        let result = BridgeSession::attach(config, Box::new(MockAlertAudioHost::new()), window_at(31));
        assert!(matches!(result, Err(ConfigError::InvalidVolume(_))));
    }

    #[tokio::test]
    async fn test_invoke_after_detach_is_detached_failure() {
        let (handle, mut events) = BridgeSession::attach(
            BridgeConfig::default(),
            Box::new(MockAlertAudioHost::new()),
            window_at(31),
        )
        .unwrap();

        let result = handle.invoke(Command::new(Channel::Pip, "closePip")).await;
        assert_eq!(result, CommandResult::success(true));

        handle.detach().await;
        assert!(events.recv().await.is_none());

        let result = handle.invoke(Command::new(Channel::Audio, "stop")).await;
        assert_eq!(result.code(), Some("ERR_DETACHED"));
        assert!(handle.snapshot().await.is_none());
        assert!(!handle.is_attached());
    }

    #[tokio::test]
    async fn test_snapshot_reflects_reported_mode() {
        let (handle, mut events) = BridgeSession::attach(
            BridgeConfig::default(),
            Box::new(MockAlertAudioHost::new()),
            window_at(31),
        )
        .unwrap();

        handle.report_pip_mode_changed(true);
        assert!(events.recv().await.is_some());

        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.pip.active);
        assert!(!snapshot.playing);
        handle.detach().await;
    }

    #[tokio::test]
    async fn test_detach_delivers_reports_queued_before_it() {
        for _ in 0..50 {
            let (handle, mut events) = BridgeSession::attach(
                BridgeConfig::default(),
                Box::new(MockAlertAudioHost::new()),
                window_at(31),
            )
            .unwrap();

            let reports = [true, false, true, false, true];
            for report in reports {
                handle.report_pip_mode_changed(report);
            }
            handle.detach().await;

            let mut seen = Vec::new();
            while let Some(event) = events.recv().await {
                seen.push(event);
            }
            let expected: Vec<_> = reports
                .iter()
                .map(|&is_in_pip_mode| crate::events::BridgeEvent::PipModeChanged { is_in_pip_mode })
                .collect();
            assert_eq!(seen, expected);
        }
    }
}
