//! Unified chat request

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::UnifiedMessage;
use super::tool::ToolDefinition;

/// Caller-side chat request, read-only input to the request mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedChatRequest {
    pub messages: Vec<UnifiedMessage>,
    pub model: String,
    #[serde(default)]
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

impl UnifiedChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<UnifiedMessage>) -> Self {
        Self {
            messages,
            model: model.into(),
            stream: false,
            max_tokens: None,
            temperature: None,
            tool_choice: None,
            tools: None,
        }
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn tool_choice(mut self, tool_choice: Value) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }
}
