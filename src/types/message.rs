//! Conversation messages.
//!
//! A conversation is an append-only `Vec<Message>`; the vector order is the
//! conversation order. Messages are never mutated in place.

use serde::{Deserialize, Serialize};

/// One turn in the exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// Correlates a `tool`-role result to the call that requested it.
    /// Decimal string of the per-loop call counter, starting at "1".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: text.into(),
            tool_call_id: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: text.into(),
            tool_call_id: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: text.into(),
            tool_call_id: None,
        }
    }

    /// A tool result turn. Must always immediately follow the assistant
    /// message that requested the call.
    pub fn tool(text: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: text.into(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}
