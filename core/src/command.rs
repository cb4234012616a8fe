//! Commands arriving on the two channels and the results sent back
//!
//! A [`Command`] is the untyped wire form (channel, method name, argument
//! map). [`Command::parse`] turns it into a typed [`Request`] that the
//! dispatcher routes to a controller.

use crate::error::BridgeError;
use crate::pip::aspect::integer_argument;
use serde_json::{Map, Value};
use std::str::FromStr;

// ============================================================================
// CHANNELS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Audio,
    Pip,
}

impl Channel {
    pub fn name(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Pip => "pip",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(Self::Audio),
            "pip" => Ok(Self::Pip),
            other => Err(format!("unknown channel: {other}")),
        }
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

/// One invocation received from the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub channel: Channel,
    pub method: String,
    pub arguments: Map<String, Value>,
}

impl Command {
    pub fn new(channel: Channel, method: impl Into<String>) -> Self {
        Self {
            channel,
            method: method.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Build a command from a JSON argument document. `null` and empty input
    /// mean "no arguments"; any other non-object is rejected.
    pub fn from_json_arguments(
        channel: Channel,
        method: impl Into<String>,
        arguments_json: &str,
    ) -> Result<Self, serde_json::Error> {
        let mut command = Self::new(channel, method);
        if arguments_json.trim().is_empty() {
            return Ok(command);
        }
        match serde_json::from_str::<Value>(arguments_json)? {
            Value::Object(map) => command.arguments = map,
            Value::Null => {}
            other => {
                return Err(serde::de::Error::custom(format!(
                    "arguments must be an object, got {other}"
                )))
            }
        }
        Ok(command)
    }

    fn integer(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(integer_argument)
    }

    fn flag(&self, key: &str) -> bool {
        self.arguments
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Resolve the method name into a typed request.
    pub fn parse(&self) -> Result<Request, BridgeError> {
        let request = match (self.channel, self.method.as_str()) {
            (Channel::Audio, "play") => Request::Audio(AudioRequest::Play),
            (Channel::Audio, "stop") => Request::Audio(AudioRequest::Stop),
            (Channel::Pip, "enterPip") => Request::Pip(PipRequest::Enter {
                width: self.integer("width"),
                height: self.integer("height"),
            }),
            (Channel::Pip, "setAutoPip") => Request::Pip(PipRequest::SetAutoEnter {
                enabled: self.flag("enabled"),
                width: self.integer("width"),
                height: self.integer("height"),
            }),
            (Channel::Pip, "closePip") => Request::Pip(PipRequest::Close),
            (channel, method) => {
                return Err(BridgeError::UnknownMethod {
                    channel: channel.name().to_string(),
                    method: method.to_string(),
                })
            }
        };
        Ok(request)
    }
}

/// Typed form of a recognised command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Audio(AudioRequest),
    Pip(PipRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioRequest {
    Play,
    Stop,
}

impl AudioRequest {
    /// Code reported if the handler faults outright
    pub(crate) fn fault(self, message: String) -> BridgeError {
        match self {
            Self::Play => BridgeError::Playback(message),
            Self::Stop => BridgeError::Stop(message),
        }
    }
}

/// Dimensions are kept raw here; the PiP controller coerces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipRequest {
    Enter {
        width: Option<i64>,
        height: Option<i64>,
    },
    SetAutoEnter {
        enabled: bool,
        width: Option<i64>,
        height: Option<i64>,
    },
    Close,
}

// ============================================================================
// RESULTS
// ============================================================================

/// Exactly one of these is produced per [`Command`]
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Success(Value),
    Failure { code: String, message: String },
    NotImplemented,
}

impl CommandResult {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success(value.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Success value, if any
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Failure code, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Failure { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<BridgeError> for CommandResult {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::UnknownMethod { .. } => Self::NotImplemented,
            other => Self::Failure {
                code: other.code().to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<Result<bool, BridgeError>> for CommandResult {
    fn from(result: Result<bool, BridgeError>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_audio_methods() {
        assert_eq!(
            Command::new(Channel::Audio, "play").parse(),
            Ok(Request::Audio(AudioRequest::Play))
        );
        assert_eq!(
            Command::new(Channel::Audio, "stop").parse(),
            Ok(Request::Audio(AudioRequest::Stop))
        );
    }

    #[test]
    fn test_parse_pip_arguments() {
        let command = Command::new(Channel::Pip, "enterPip")
            .with_argument("width", 4)
            .with_argument("height", 3);
        assert_eq!(
            command.parse(),
            Ok(Request::Pip(PipRequest::Enter {
                width: Some(4),
                height: Some(3)
            }))
        );

        let command = Command::new(Channel::Pip, "setAutoPip").with_argument("enabled", "yes");
        assert_eq!(
            command.parse(),
            Ok(Request::Pip(PipRequest::SetAutoEnter {
                enabled: false,
                width: None,
                height: None
            }))
        );
    }

    #[test]
    fn test_methods_are_channel_scoped() {
        let err = Command::new(Channel::Audio, "enterPip").parse().unwrap_err();
        assert_eq!(
            err,
            BridgeError::UnknownMethod {
                channel: "audio".into(),
                method: "enterPip".into()
            }
        );
        assert_eq!(CommandResult::from(err), CommandResult::NotImplemented);
    }

    #[test]
    fn test_from_json_arguments() {
        let command =
            Command::from_json_arguments(Channel::Pip, "enterPip", r#"{"width": 4}"#).unwrap();
        assert_eq!(command.arguments.get("width"), Some(&json!(4)));

        assert!(Command::from_json_arguments(Channel::Pip, "closePip", "")
            .unwrap()
            .arguments
            .is_empty());
        assert!(Command::from_json_arguments(Channel::Pip, "closePip", "null").is_ok());
        assert!(Command::from_json_arguments(Channel::Pip, "enterPip", "[1, 2]").is_err());
        assert!(Command::from_json_arguments(Channel::Pip, "enterPip", "{").is_err());
    }

    #[test]
    fn test_channel_round_trip_names() {
        assert_eq!("audio".parse::<Channel>(), Ok(Channel::Audio));
        assert_eq!("pip".parse::<Channel>(), Ok(Channel::Pip));
        assert!("video".parse::<Channel>().is_err());
    }

    #[test]
    fn test_failure_carries_code_and_message() {
        let result = CommandResult::from(BridgeError::Playback("no output".into()));
        assert_eq!(result.code(), Some("ERR_PLAY"));
        match result {
            CommandResult::Failure { message, .. } => assert!(message.contains("no output")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
