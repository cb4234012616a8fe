//! Capability tiers and the gate deciding which window operations a device supports

use crate::config::PipConfig;
use serde::{Deserialize, Serialize};

/// Ordered classification of the platform's windowing features
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CapabilityTier {
    /// No floating window support
    Baseline,
    /// Explicit entry into windowed mode
    Windowed,
    /// Windowed mode plus automatic entry when the user leaves the app
    AutoEnter,
}

impl CapabilityTier {
    /// Classify a raw platform level against the configured thresholds.
    pub fn from_platform_level(level: u32, config: &PipConfig) -> Self {
        if level >= config.min_auto_enter_level {
            Self::AutoEnter
        } else if level >= config.min_windowed_level {
            Self::Windowed
        } else {
            Self::Baseline
        }
    }
}

impl std::fmt::Display for CapabilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Baseline => write!(f, "Baseline"),
            Self::Windowed => write!(f, "Windowed"),
            Self::AutoEnter => write!(f, "AutoEnter"),
        }
    }
}

/// Window operations subject to gating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedOperation {
    EnterPip,
    AutoEnter,
}

impl GatedOperation {
    /// Lowest tier on which the operation is available
    pub fn required_tier(self) -> CapabilityTier {
        match self {
            Self::EnterPip => CapabilityTier::Windowed,
            Self::AutoEnter => CapabilityTier::AutoEnter,
        }
    }

    /// Method name as seen on the wire
    pub fn method_name(self) -> &'static str {
        match self {
            Self::EnterPip => "enterPip",
            Self::AutoEnter => "setAutoPip",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Supported,
    /// Optional enhancement not available; reported as `Success(false)`
    UnsupportedSoft,
    /// Required feature not available; reported as `NOT_SUPPORTED`
    UnsupportedHard,
}

/// Decide whether `operation` may run on a device of `tier`.
pub fn gate(operation: GatedOperation, tier: CapabilityTier) -> GateDecision {
    if tier >= operation.required_tier() {
        return GateDecision::Supported;
    }
    match operation {
        GatedOperation::AutoEnter => GateDecision::UnsupportedSoft,
        GatedOperation::EnterPip => GateDecision::UnsupportedHard,
    }
}
