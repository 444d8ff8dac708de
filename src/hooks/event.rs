//! Incoming hook event payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{HookGateError, Result};
use crate::types::UNKNOWN_SESSION;

/// Lifecycle point the event was raised at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEventKind {
    UserPromptSubmit,
    PreToolUse,
    SessionStart,
    SessionEnd,
    /// Any event hookgate has no handler for, including a missing name.
    Other(String),
}

impl HookEventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "UserPromptSubmit" => Self::UserPromptSubmit,
            "PreToolUse" => Self::PreToolUse,
            "SessionStart" => Self::SessionStart,
            "SessionEnd" => Self::SessionEnd,
            other => Self::Other(other.to_string()),
        }
    }

    /// Session boundaries reset all flags.
    pub fn is_session_boundary(&self) -> bool {
        matches!(self, Self::SessionStart | Self::SessionEnd)
    }
}

/// The JSON object Claude Code pipes to stdin. Camel-case field names from
/// older hook payloads are accepted as aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct HookEvent {
    /// `null` and `""` are treated like a missing id.
    #[serde(
        default = "unknown_session",
        alias = "sessionId",
        deserialize_with = "session_id_or_unknown"
    )]
    pub session_id: String,

    #[serde(default, alias = "hookEventName")]
    pub hook_event_name: Option<String>,

    #[serde(default, alias = "userPrompt")]
    pub prompt: Option<String>,

    #[serde(default, alias = "toolName")]
    pub tool_name: Option<String>,

    #[serde(default, alias = "toolInput")]
    pub tool_input: Value,
}

impl HookEvent {
    /// Parse a complete stdin payload. Anything but a JSON object with
    /// correctly typed fields is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(HookGateError::InvalidEvent(
                "expected a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn kind(&self) -> HookEventKind {
        HookEventKind::from_name(self.hook_event_name.as_deref().unwrap_or(""))
    }

    /// Event name for logs; empty when the payload carried none.
    pub fn name(&self) -> &str {
        self.hook_event_name.as_deref().unwrap_or("")
    }
}

fn unknown_session() -> String {
    UNKNOWN_SESSION.to_string()
}

fn session_id_or_unknown<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<String>::deserialize(deserializer)?;
    Ok(id.filter(|id| !id.is_empty()).unwrap_or_else(unknown_session))
}
