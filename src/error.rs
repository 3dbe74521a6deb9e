use std::fmt;

use crate::models::TurnOutput;

#[derive(Debug)]
pub enum LumoError {
    ApiError {
        status: u16,
        message: String,
    },
    NetworkError(reqwest::Error),
    ConfigError(String),
    DuplicateTool(String),
    UnknownTool(String),
    ToolExecution {
        tool: String,
        message: String,
    },
    /// The cancellation token fired before a transport round-trip. Answers
    /// accumulated up to that point ride along.
    Cancelled {
        partial: TurnOutput,
    },
    /// The model kept requesting tool rounds past the configured bound.
    RoundLimit {
        rounds: usize,
        partial: TurnOutput,
    },
    /// A tool-result resubmission failed mid-conversation. The initial send
    /// already succeeded, so partial progress is preserved.
    Interrupted {
        partial: TurnOutput,
        source: Box<LumoError>,
    },
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    IoError(std::io::Error),
    Other(String),
}

impl LumoError {
    /// Answers accumulated before this error occurred, if the variant
    /// carries any.
    pub fn partial_output(&self) -> Option<&TurnOutput> {
        match self {
            LumoError::Cancelled { partial }
            | LumoError::RoundLimit { partial, .. }
            | LumoError::Interrupted { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

impl fmt::Display for LumoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LumoError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            LumoError::NetworkError(e) => write!(f, "Network error: {}", e),
            LumoError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            LumoError::DuplicateTool(name) => {
                write!(f, "Tool '{}' is already registered", name)
            }
            LumoError::UnknownTool(name) => write!(f, "Tool '{}' not found", name),
            LumoError::ToolExecution { tool, message } => {
                write!(f, "Tool '{}' failed: {}", tool, message)
            }
            LumoError::Cancelled { .. } => write!(f, "Conversation cancelled"),
            LumoError::RoundLimit { rounds, .. } => {
                write!(f, "Tool-call round limit exceeded ({} rounds)", rounds)
            }
            LumoError::Interrupted { source, .. } => {
                write!(f, "Conversation interrupted: {}", source)
            }
            LumoError::JsonError(e) => write!(f, "JSON error: {}", e),
            LumoError::YamlError(e) => write!(f, "YAML error: {}", e),
            LumoError::IoError(e) => write!(f, "IO error: {}", e),
            LumoError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for LumoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LumoError::NetworkError(e) => Some(e),
            LumoError::Interrupted { source, .. } => Some(source.as_ref()),
            LumoError::JsonError(e) => Some(e),
            LumoError::YamlError(e) => Some(e),
            LumoError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LumoError {
    fn from(err: reqwest::Error) -> Self {
        LumoError::NetworkError(err)
    }
}

impl From<serde_json::Error> for LumoError {
    fn from(err: serde_json::Error) -> Self {
        LumoError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for LumoError {
    fn from(err: serde_yaml::Error) -> Self {
        LumoError::YamlError(err)
    }
}

impl From<std::io::Error> for LumoError {
    fn from(err: std::io::Error) -> Self {
        LumoError::IoError(err)
    }
}

impl From<anyhow::Error> for LumoError {
    fn from(err: anyhow::Error) -> Self {
        LumoError::Other(err.to_string())
    }
}

impl From<String> for LumoError {
    fn from(msg: String) -> Self {
        LumoError::Other(msg)
    }
}

pub type Result<T> = std::result::Result<T, LumoError>;
