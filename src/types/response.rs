//! Normalized response shapes (non-streamed and streamed)
//!
//! Provider values are carried as [`serde_json::Value`] so whatever the provider
//! sent (a part array for `content`, a float `created`, an object `arguments`)
//! reaches the caller unchanged. Defaults apply only to absent or falsy values.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Normalized non-streamed chat response.
///
/// Top-level fields are always serialized (as `null` when the provider omitted
/// them); `usage` is always an object whose members are omitted when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedResponse {
    pub id: Option<Value>,
    pub choices: Vec<Choice>,
    pub created: Option<Value>,
    pub model: Option<Value>,
    pub object: Option<Value>,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub finish_reason: Option<Value>,
    pub index: Value,
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<Value>,
    pub role: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub call_type: Option<Value>,
    pub function: ToolCallFunction,
}

/// Function half of a tool call as seen on the response side.
///
/// `arguments` is the provider's value as sent (normally a JSON-encoded
/// string), never re-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallFunction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default)]
    pub arguments: Value,
}

/// Token usage. Members stay `None` when the provider did not report them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub completion_tokens: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub prompt_tokens: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub total_tokens: Option<Value>,
}

/// Normalized payload of one streamed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub id: Option<Value>,
    pub object: Option<Value>,
    pub created: Option<Value>,
    pub model: Option<Value>,
    pub choices: Vec<DeltaChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaChoice {
    pub index: Value,
    pub delta: Delta,
    pub finish_reason: Option<Value>,
}

/// Partial message fragment.
///
/// `None` means the provider left the field out; `Some(Value::Null)` is an
/// explicit `null`, which providers send on continuation chunks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub role: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "explicit_null")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<DeltaToolCall>>,
}

/// Tool call fragment; `index` lets the consumer stitch argument pieces together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub call_type: Option<Value>,
    pub function: ToolCallFunction,
}

fn explicit_null<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
