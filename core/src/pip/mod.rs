//! Picture-in-picture: capability gating, aspect ratio coercion and mode tracking

pub mod aspect;
pub mod capability;
pub mod controller;

pub use aspect::AspectRatio;
pub use capability::{gate, CapabilityTier, GateDecision, GatedOperation};
pub use controller::{PipController, PipState};
