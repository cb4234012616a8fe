//! Unsolicited push events flowing from controllers back to the caller
//!
//! Events travel over an unbounded FIFO channel, so they reach the caller in
//! the order the controllers emitted them.

use crate::command::Channel;
use serde_json::{json, Value};
use tokio::sync::mpsc;

/// Event emitted without a correlated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// The OS entered or left windowed mode
    PipModeChanged { is_in_pip_mode: bool },
}

impl BridgeEvent {
    /// Channel the event is pushed on
    pub fn channel(&self) -> Channel {
        match self {
            Self::PipModeChanged { .. } => Channel::Pip,
        }
    }

    /// Event name as seen on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::PipModeChanged { .. } => "modeChanged",
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Self::PipModeChanged { is_in_pip_mode } => json!({ "isInPipMode": is_in_pip_mode }),
        }
    }
}

/// Sending half held by controllers
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<BridgeEvent>,
}

/// Receiving half handed to the caller
pub type EventStream = mpsc::UnboundedReceiver<BridgeEvent>;

impl EventSink {
    pub fn channel() -> (Self, EventStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: BridgeEvent) {
        tracing::debug!("Pushing {} on {}", event.name(), event.channel());
        if self.tx.send(event).is_err() {
            tracing::debug!("Event stream closed, dropping event");
        }
    }
}
