//! Alert audio: the single playback session and the handle that owns its resource

pub mod controller;
pub mod handle;

pub use controller::{AudioController, AudioSession};
pub use handle::ResourceHandle;
