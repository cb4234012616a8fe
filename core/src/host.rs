//! Native primitives the bridge drives
//!
//! These traits are the seam between the bridge and the operating system.
//! Mobile platforms implement them through the callback interfaces in
//! `callbridge-mobile`; the [`crate::sim`] module provides an in-memory
//! device for the CLI and integration tests.

use crate::error::HostError;
use crate::pip::AspectRatio;

/// Audio output capable of producing the system's default alert sound
#[cfg_attr(test, mockall::automock)]
pub trait AlertAudioHost: Send {
    /// Acquire a fresh output resource bound to the default alert sound.
    fn acquire_default_alert(&mut self) -> Result<Box<dyn AlertPlayer>, HostError>;
}

/// A single acquired audio-output resource.
///
/// `release` is called exactly once by the owning [`crate::audio::ResourceHandle`];
/// no other method is called afterwards.
#[cfg_attr(test, mockall::automock)]
pub trait AlertPlayer: Send {
    fn set_looping(&mut self, looping: bool) -> Result<(), HostError>;
    fn set_volume(&mut self, left: f32, right: f32) -> Result<(), HostError>;
    fn start(&mut self) -> Result<(), HostError>;
    fn is_playing(&self) -> Result<bool, HostError>;
    fn stop(&mut self) -> Result<(), HostError>;
    fn reset(&mut self) -> Result<(), HostError>;
    fn release(&mut self) -> Result<(), HostError>;
}

/// Window manager controlling the host surface
#[cfg_attr(test, mockall::automock)]
pub trait WindowHost: Send {
    /// Raw platform level (e.g. an OS API level) used to derive the capability tier.
    fn platform_level(&self) -> u32;

    /// Ask the OS to move the surface into windowed mode. Acceptance does not
    /// mean the transition has completed; completion is reported separately.
    fn request_enter_pip(&mut self, aspect: AspectRatio) -> Result<(), HostError>;

    /// Update the parameters used when the OS auto-enters windowed mode.
    fn set_auto_enter(&mut self, enabled: bool, aspect: AspectRatio) -> Result<(), HostError>;

    /// Background the host surface, closing the floating window if present.
    fn move_to_back(&mut self) -> Result<(), HostError>;
}
