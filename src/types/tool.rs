//! Tool calling definitions for the unified format

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition (for function calling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type", default = "default_tool_type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

impl ToolDefinition {
    pub fn function(
        name: impl Into<String>,
        description: Option<String>,
        parameters: Option<Value>,
    ) -> Self {
        Self {
            tool_type: default_tool_type(),
            function: FunctionDefinition {
                name: name.into(),
                description,
                parameters,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>, // JSON Schema
}

/// Tool call carried by an assistant message.
///
/// `id` may be missing on caller-built messages; `arguments` may be either an
/// already-encoded JSON string or a structured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default = "default_tool_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

impl ToolCall {
    pub fn function(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: None,
            call_type: default_tool_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: Some(arguments),
            },
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

fn default_tool_type() -> String {
    "function".to_string()
}
