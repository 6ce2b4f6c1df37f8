//! Unified message format

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::tool::ToolCall;

/// Unified message structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedMessage {
    #[serde(default)]
    pub role: MessageRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl UnifiedMessage {
    pub fn with_content(role: MessageRole, content: MessageContent) -> Self {
        Self {
            role,
            content: Some(content),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::with_content(MessageRole::System, MessageContent::text(text))
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::with_content(MessageRole::User, MessageContent::text(text))
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self::with_content(MessageRole::User, MessageContent::Parts(parts))
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::with_content(MessageRole::Assistant, MessageContent::text(text))
    }

    /// Assistant turn that only carries tool calls.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: None,
            name: None,
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    /// Tool result answering the call identified by `tool_call_id`.
    pub fn tool_result(tool_call_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::with_content(MessageRole::Tool, MessageContent::text(text))
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Message role.
///
/// Deserialization is total: any role outside the closed set, including a
/// non-string or missing one, becomes [`MessageRole::User`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    #[default]
    User,
    Assistant,
    Tool,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        }
    }
}

impl From<&str> for MessageRole {
    fn from(role: &str) -> Self {
        match role {
            "system" => MessageRole::System,
            "user" => MessageRole::User,
            "assistant" => MessageRole::Assistant,
            "tool" => MessageRole::Tool,
            other => {
                tracing::debug!(role = other, "unrecognized message role, coercing to user");
                MessageRole::User
            }
        }
    }
}

impl<'de> Deserialize<'de> for MessageRole {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(role) => Ok(MessageRole::from(role.as_str())),
            other => {
                tracing::debug!(role = %other, "non-string message role, coercing to user");
                Ok(MessageRole::User)
            }
        }
    }
}

/// Message content (can be string or array of content parts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        MessageContent::Text(text.into())
    }

    pub fn parts(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// A single content part.
///
/// Recognized parts are typed; anything else is kept as raw JSON so newer part
/// kinds survive a trip through the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Block(ContentBlock),
    Other(Value),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Block(ContentBlock::Text { text: text.into() })
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::Block(ContentBlock::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
