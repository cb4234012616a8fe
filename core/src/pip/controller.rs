//! PiP mode tracking and window requests

use super::aspect::AspectRatio;
use super::capability::{gate, CapabilityTier, GateDecision, GatedOperation};
use crate::config::PipConfig;
use crate::error::BridgeError;
use crate::events::{BridgeEvent, EventSink};
use crate::host::WindowHost;
use serde::Serialize;

/// Snapshot of the window mode as the bridge last observed it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipState {
    /// Updated only by OS transition reports, never by requests
    pub active: bool,
    pub auto_enter_enabled: bool,
    pub aspect_ratio: AspectRatio,
    pub capability_tier: CapabilityTier,
}

pub struct PipController {
    host: Box<dyn WindowHost>,
    config: PipConfig,
    state: PipState,
    events: EventSink,
}

impl PipController {
    /// The capability tier is sampled once, here.
    pub fn new(host: Box<dyn WindowHost>, config: PipConfig, events: EventSink) -> Self {
        let level = host.platform_level();
        let capability_tier = CapabilityTier::from_platform_level(level, &config);
        tracing::info!(
            "PiP controller attached (platform level {}, tier {})",
            level,
            capability_tier
        );
        Self {
            host,
            state: PipState {
                active: false,
                auto_enter_enabled: false,
                aspect_ratio: config.default_aspect,
                capability_tier,
            },
            config,
            events,
        }
    }

    pub fn state(&self) -> PipState {
        self.state
    }

    /// Explicit coercion of caller dimensions against the configured default.
    pub fn coerce_aspect(&self, width: Option<i64>, height: Option<i64>) -> AspectRatio {
        AspectRatio::coerce(width, height, self.config.default_aspect)
    }

    /// Ask the OS to enter windowed mode.
    ///
    /// `Ok(true)` means the request was accepted; the transition itself is
    /// reported later through [`PipController::on_mode_changed`].
    pub fn enter_pip(&mut self, width: Option<i64>, height: Option<i64>) -> Result<bool, BridgeError> {
        let operation = GatedOperation::EnterPip;
        if gate(operation, self.state.capability_tier) == GateDecision::UnsupportedHard {
            tracing::warn!(
                "enterPip refused: device tier {} below {}",
                self.state.capability_tier,
                operation.required_tier()
            );
            return Err(self.unsupported(operation));
        }

        let aspect = self.coerce_aspect(width, height);
        self.host
            .request_enter_pip(aspect)
            .map_err(|e| BridgeError::PipRequest(e.to_string()))?;
        self.state.aspect_ratio = aspect;
        tracing::info!("PiP entry requested ({})", aspect);
        Ok(true)
    }

    /// Configure automatic entry. Returns `Ok(false)` on devices without
    /// auto-enter support.
    pub fn set_auto_pip(
        &mut self,
        enabled: bool,
        width: Option<i64>,
        height: Option<i64>,
    ) -> Result<bool, BridgeError> {
        if gate(GatedOperation::AutoEnter, self.state.capability_tier) != GateDecision::Supported {
            tracing::debug!(
                "setAutoPip ignored: auto-enter unavailable on tier {}",
                self.state.capability_tier
            );
            return Ok(false);
        }

        let aspect = self.coerce_aspect(width, height);
        self.host
            .set_auto_enter(enabled, aspect)
            .map_err(|e| BridgeError::PipRequest(e.to_string()))?;
        self.state.auto_enter_enabled = enabled;
        self.state.aspect_ratio = aspect;
        tracing::info!("PiP auto-enter {} ({})", if enabled { "enabled" } else { "disabled" }, aspect);
        Ok(true)
    }

    /// Background the host surface. Never fails from the caller's view.
    pub fn close_pip(&mut self) -> bool {
        if let Err(e) = self.host.move_to_back() {
            tracing::warn!("Failed to background host surface (ignored): {}", e);
        }
        true
    }

    /// Record an OS-reported mode change. Emits one `modeChanged` event per
    /// actual transition; a report matching the current state is ignored.
    pub fn on_mode_changed(&mut self, is_in_pip_mode: bool) -> bool {
        if self.state.active == is_in_pip_mode {
            tracing::debug!("Duplicate PiP mode report ({}), no transition", is_in_pip_mode);
            return false;
        }
        self.state.active = is_in_pip_mode;
        tracing::info!("PiP mode changed: active={}", is_in_pip_mode);
        self.events.emit(BridgeEvent::PipModeChanged { is_in_pip_mode });
        true
    }

    fn unsupported(&self, operation: GatedOperation) -> BridgeError {
        BridgeError::UnsupportedCapability {
            operation: operation.method_name().to_string(),
            required: operation.required_tier().to_string(),
            actual: self.state.capability_tier.to_string(),
        }
    }
}
