// Callbridge Core — alert audio and picture-in-picture over two channels
//
// The caller speaks to the bridge through named commands on the "audio" and
// "pip" channels. Each command gets exactly one result; PiP mode transitions
// come back as unsolicited push events.

pub mod audio;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod pip;
pub mod session;
pub mod sim;

pub use audio::{AudioController, ResourceHandle};
pub use command::{Channel, Command, CommandResult};
pub use config::{AudioConfig, BridgeConfig, PipConfig};
pub use dispatcher::CommandDispatcher;
pub use error::{BridgeError, ConfigError, HostError};
pub use events::{BridgeEvent, EventSink, EventStream};
pub use host::{AlertAudioHost, AlertPlayer, WindowHost};
pub use logging::init_logging;
pub use pip::{AspectRatio, CapabilityTier, PipController, PipState};
pub use session::{BridgeHandle, BridgeSession, SessionSnapshot};
