//! Inbound command contract: `{"action": "..."}` in, `{"status": ...}` out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::state::ShieldMode;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub action: String,
}

impl CommandRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn success() -> Self {
        Self {
            status: CommandStatus::Success,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }
}

/// Recognised actions. Anything else parses to `None` and is acknowledged without effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShieldCommand {
    SimpleMode,
    FocusMode,
    NormalMode,
}

impl ShieldCommand {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "simpleMode" | "simplifyMode" => Some(ShieldCommand::SimpleMode),
            "focusMode" => Some(ShieldCommand::FocusMode),
            "normalMode" => Some(ShieldCommand::NormalMode),
            _ => None,
        }
    }

    pub fn target(&self) -> ShieldMode {
        match self {
            ShieldCommand::SimpleMode => ShieldMode::Simple,
            ShieldCommand::FocusMode => ShieldMode::Focus,
            ShieldCommand::NormalMode => ShieldMode::None,
        }
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, request: CommandRequest) -> CommandResponse;

    /// Decodes a raw JSON request; a malformed payload becomes an error response.
    async fn handle_json(&self, raw: &str) -> CommandResponse {
        match serde_json::from_str::<CommandRequest>(raw) {
            Ok(request) => self.handle(request).await,
            Err(err) => CommandResponse::error(format!("malformed command: {err}")),
        }
    }
}
