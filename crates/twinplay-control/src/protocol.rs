use reqwest::Method;
use serde::{Deserialize, Serialize};
use twinplay_core::{Applied, Command, PlaybackPosition};

use crate::SyncError;

/// Reply status field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
}

/// JSON body returned by every control server route.
///
/// Successful replies carry `action` (and `time` for seeks, `file_loaded`
/// for readiness queries); errors carry `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlReply {
    pub status: ReplyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_loaded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ControlReply {
    fn success() -> Self {
        Self {
            status: ReplyStatus::Success,
            action: None,
            time: None,
            file_loaded: None,
            message: None,
        }
    }

    pub fn action(action: &str) -> Self {
        Self {
            action: Some(action.to_string()),
            ..Self::success()
        }
    }

    pub fn seek(position: PlaybackPosition) -> Self {
        Self {
            action: Some("seek".to_string()),
            time: Some(position.as_secs()),
            ..Self::success()
        }
    }

    pub fn readiness(file_loaded: bool) -> Self {
        Self {
            file_loaded: Some(file_loaded),
            ..Self::success()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Error,
            message: Some(message.into()),
            ..Self::success()
        }
    }

    pub fn from_applied(applied: Applied) -> Self {
        match applied {
            Applied::Play => Self::action("play"),
            Applied::Pause => Self::action("pause"),
            Applied::Stop => Self::action("stop"),
            Applied::Seek(position) => Self::seek(position),
            Applied::Readiness(loaded) => Self::readiness(loaded),
            Applied::Loaded => Self::action("file loaded"),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ReplyStatus::Success
    }
}

/// Outcome of delivering one command to the partner
#[derive(Debug)]
pub enum CommandResult {
    Success(ControlReply),
    Failure(SyncError),
}

/// HTTP method and path for a command on the partner's control server.
///
/// Seeks always encode the absolute target in whole seconds.
pub fn route_for(command: &Command) -> (Method, String) {
    match command {
        Command::Play => (Method::GET, "/play".to_string()),
        Command::Pause => (Method::GET, "/pause".to_string()),
        Command::Stop => (Method::GET, "/stop".to_string()),
        Command::Seek(position) => (Method::GET, format!("/seek/{}", position.as_secs())),
        Command::QueryReadiness => (Method::GET, "/is_file_loaded".to_string()),
        Command::NotifyLoaded => (Method::POST, "/load_file".to_string()),
    }
}
