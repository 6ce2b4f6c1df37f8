//! Unified request → wire request mapping

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::is_truthy;
use crate::config::ProviderConfig;
use crate::types::message::{ContentBlock, ContentPart, MessageContent, UnifiedMessage};
use crate::types::request::UnifiedChatRequest;
use crate::types::tool::{ToolCall, ToolDefinition};
use crate::wire::{
    WireContentBlock, WireContentPart, WireFunctionCall, WireImageUrl, WireMessage, WireRequest,
    WireToolCall,
};
use crate::{Error, ErrorContext, Result};

/// Produces ids for tool calls that arrive without one.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// Transport settings for the outbound call. The endpoint path is appended by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub url: url::Url,
    pub headers: HashMap<String, String>,
}

impl TransportConfig {
    /// Join an endpoint path (e.g. `/v1/chat/completions`) onto the base URL.
    pub fn endpoint_url(&self, path: &str) -> Result<url::Url> {
        let base = self.url.as_str().trim_end_matches('/');
        Ok(url::Url::parse(&format!("{}{}", base, path))?)
    }
}

/// Wire body plus the transport settings needed to send it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub body: WireRequest,
    pub config: TransportConfig,
}

/// Maps a [`UnifiedChatRequest`] onto the chat-completions wire body.
///
/// Pure: no I/O, and the only failure is an unparseable provider base URL.
#[derive(Clone)]
pub struct RequestMapper {
    id_generator: IdGenerator,
}

impl RequestMapper {
    pub fn new() -> Self {
        Self {
            id_generator: Arc::new(generate_call_id),
        }
    }

    /// Replace the tool-call id source (deterministic ids in tests, tracing ids, ...).
    pub fn with_id_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.id_generator = Arc::new(generator);
        self
    }

    pub fn map(
        &self,
        request: &UnifiedChatRequest,
        provider: &ProviderConfig,
    ) -> Result<OutboundRequest> {
        let body = self.map_body(request);
        let config = transport_config(provider)?;
        Ok(OutboundRequest { body, config })
    }

    pub fn map_body(&self, request: &UnifiedChatRequest) -> WireRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| self.map_message(m))
            .collect();

        let tools: Option<Vec<ToolDefinition>> = request
            .tools
            .as_ref()
            .filter(|t| !t.is_empty())
            .cloned();

        // Falsy values are treated as absent, including `temperature == 0.0`.
        WireRequest {
            messages,
            model: request.model.clone(),
            stream: request.stream,
            max_tokens: request.max_tokens.filter(|&n| n > 0),
            temperature: request.temperature.filter(|&t| t != 0.0 && !t.is_nan()),
            tool_choice: request.tool_choice.clone().filter(is_truthy),
            tools,
        }
    }

    pub fn map_message(&self, message: &UnifiedMessage) -> WireMessage {
        let content = match &message.content {
            Some(MessageContent::Text(text)) => vec![WireContentPart::Block(
                WireContentBlock::Text { text: text.clone() },
            )],
            Some(MessageContent::Parts(parts)) => parts.iter().map(map_content_part).collect(),
            None => Vec::new(),
        };

        let tool_calls = message
            .tool_calls
            .as_ref()
            .map(|calls| calls.iter().map(|c| self.map_tool_call(c)).collect());

        WireMessage {
            role: message.role.as_str().to_string(),
            content: if content.is_empty() { None } else { Some(content) },
            tool_calls,
            tool_call_id: message.tool_call_id.clone().filter(|s| !s.is_empty()),
            name: message.name.clone().filter(|s| !s.is_empty()),
        }
    }

    pub fn map_tool_call(&self, call: &ToolCall) -> WireToolCall {
        let id = match call.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => (self.id_generator)(),
        };

        WireToolCall {
            id,
            call_type: "function".to_string(),
            function: WireFunctionCall {
                name: call.function.name.clone(),
                arguments: encode_arguments(call.function.arguments.as_ref()),
            },
        }
    }
}

impl Default for RequestMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestMapper").finish_non_exhaustive()
    }
}

/// Default id source: `call_` followed by 13 lowercase alphanumerics.
pub fn generate_call_id() -> String {
    let simple = uuid::Uuid::new_v4().simple().to_string();
    format!("call_{}", &simple[..13])
}

fn transport_config(provider: &ProviderConfig) -> Result<TransportConfig> {
    let url = url::Url::parse(&provider.base_url).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid provider base URL '{}'", provider.base_url),
            ErrorContext::new()
                .with_field_path("provider.base_url")
                .with_details(e.to_string())
                .with_source("request_mapper"),
        )
    })?;

    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert(
        "Authorization".to_string(),
        format!("Bearer {}", provider.api_key),
    );

    Ok(TransportConfig { url, headers })
}

fn map_content_part(part: &ContentPart) -> WireContentPart {
    match part {
        ContentPart::Block(ContentBlock::Text { text }) => {
            WireContentPart::Block(WireContentBlock::Text { text: text.clone() })
        }
        ContentPart::Block(ContentBlock::ImageUrl { image_url }) => {
            WireContentPart::Block(WireContentBlock::ImageUrl {
                image_url: WireImageUrl {
                    url: image_url.url.clone(),
                },
            })
        }
        ContentPart::Other(raw) => WireContentPart::Passthrough(raw.clone()),
    }
}

/// Strings pass through verbatim; anything else is JSON-encoded, `{}` when absent.
fn encode_arguments(arguments: Option<&Value>) -> String {
    match arguments {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "{}".to_string(),
        Some(other) => other.to_string(),
    }
}
