//! Transformer 抽象层：统一格式与厂商线协议之间的双向转换
//!
//! Transformer abstraction. A transformer owns one provider wire format: it maps
//! unified requests outward and provider responses (JSON or SSE) back inward.
//! The caller routes to a transformer, sends the request over its own transport,
//! and hands the raw response back through [`Transformer::transform_response`].

pub mod request;
pub mod response;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_LENGTH;

use crate::config::ProviderConfig;
use crate::pipeline::StreamReassembler;
use crate::transport::{ProviderResponse, ResponseBody};
use crate::types::request::UnifiedChatRequest;
use crate::Result;

pub use request::{generate_call_id, IdGenerator, OutboundRequest, RequestMapper, TransportConfig};
pub use response::ResponseMapper;

/// Core trait for provider wire-format adaptation.
///
/// The trait is object-safe so a routing layer can hold `Box<dyn Transformer>`.
#[async_trait]
pub trait Transformer: Send + Sync + std::fmt::Debug {
    /// Unique transformer identifier.
    fn name(&self) -> &str;

    /// Endpoint path the caller appends to the provider base URL.
    fn endpoint(&self) -> &str;

    /// Build the provider request body and transport settings.
    fn transform_request(
        &self,
        request: &UnifiedChatRequest,
        provider: &ProviderConfig,
    ) -> Result<OutboundRequest>;

    /// Normalize a provider response, keeping its status and headers.
    async fn transform_response(&self, response: ProviderResponse) -> Result<ProviderResponse>;
}

/// OpenAI chat-completions transformer, also used for OpenAI-compatible providers.
#[derive(Debug, Clone, Default)]
pub struct OpenAiTransformer {
    request_mapper: RequestMapper,
    response_mapper: ResponseMapper,
    reassembler: StreamReassembler,
}

impl OpenAiTransformer {
    pub const NAME: &'static str = "openai";
    pub const ENDPOINT: &'static str = "/v1/chat/completions";

    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom request mapper (e.g. with a deterministic tool-call id generator).
    pub fn with_request_mapper(mut self, mapper: RequestMapper) -> Self {
        self.request_mapper = mapper;
        self
    }

    pub fn request_mapper(&self) -> &RequestMapper {
        &self.request_mapper
    }

    pub fn response_mapper(&self) -> &ResponseMapper {
        &self.response_mapper
    }

    pub fn reassembler(&self) -> &StreamReassembler {
        &self.reassembler
    }
}

#[async_trait]
impl Transformer for OpenAiTransformer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn endpoint(&self) -> &str {
        Self::ENDPOINT
    }

    fn transform_request(
        &self,
        request: &UnifiedChatRequest,
        provider: &ProviderConfig,
    ) -> Result<OutboundRequest> {
        self.request_mapper.map(request, provider)
    }

    async fn transform_response(&self, response: ProviderResponse) -> Result<ProviderResponse> {
        let content_type = response.content_type().unwrap_or_default().to_string();

        if content_type.contains("application/json") {
            let ProviderResponse {
                status,
                mut headers,
                body,
            } = response;
            let raw: serde_json::Value = serde_json::from_slice(&body.into_bytes().await?)?;
            let unified = self.response_mapper.map(&raw);
            let encoded = serde_json::to_vec(&unified)?;
            // Body was rewritten.
            headers.remove(CONTENT_LENGTH);
            Ok(ProviderResponse::new(
                status,
                headers,
                ResponseBody::Full(Bytes::from(encoded)),
            ))
        } else if content_type.contains("stream") {
            let ProviderResponse {
                status,
                headers,
                body,
            } = response;
            let stream = self.reassembler.reassemble(body.into_stream());
            Ok(ProviderResponse::new(
                status,
                headers,
                ResponseBody::Stream(stream),
            ))
        } else {
            tracing::debug!(content_type = %content_type, "passing response through untouched");
            Ok(response)
        }
    }
}

/// Falsy JSON values (`null`, `false`, `0`, `""`) count as "not provided".
pub(crate) fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{stream, StreamExt};
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    fn response(content_type: &str, body: ResponseBody) -> ProviderResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        if content_type.starts_with("application/json") {
            headers.insert(CONTENT_LENGTH, HeaderValue::from_static("999"));
        }
        headers.insert("x-request-id", HeaderValue::from_static("req-1"));
        ProviderResponse::new(StatusCode::OK, headers, body)
    }

    #[test]
    fn test_name_and_endpoint() {
        let t = OpenAiTransformer::new();
        assert_eq!(t.name(), "openai");
        assert_eq!(t.endpoint(), "/v1/chat/completions");
    }

    #[test]
    fn test_is_object_safe() {
        let t: Box<dyn Transformer> = Box::new(OpenAiTransformer::new());
        assert_eq!(t.name(), "openai");
    }

    #[tokio::test]
    async fn test_json_response_is_normalized() {
        let body = json!({
            "id": "1",
            "choices": [{"message": {"role": "assistant", "content": "hello"}}],
            "created": 1,
            "model": "gpt-4",
            "object": "chat.completion"
        });
        let resp = response(
            "application/json; charset=utf-8",
            ResponseBody::Full(Bytes::from(body.to_string())),
        );

        let out = OpenAiTransformer::new()
            .transform_response(resp)
            .await
            .unwrap();
        assert_eq!(out.status, StatusCode::OK);
        assert_eq!(out.headers["x-request-id"], "req-1");
        assert!(out.headers.get(CONTENT_LENGTH).is_none());

        let v: Value = serde_json::from_str(&out.text().await.unwrap()).unwrap();
        assert_eq!(v["choices"][0]["message"]["content"], "hello");
        assert_eq!(v["choices"][0]["index"], 0);
        assert_eq!(v["usage"], json!({}));
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_an_error() {
        let resp = response("application/json", ResponseBody::Full(Bytes::from("{oops")));
        let err = OpenAiTransformer::new()
            .transform_response(resp)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_stream_response_is_reassembled() {
        let chunks = vec![
            "data: {\"id\":\"1\",\"choices\":[{\"delta\":{\"content\":\"a",
            "\"}}]}\n\ndata: [DONE]\n\n",
        ];
        let body = ResponseBody::Stream(Box::pin(
            stream::iter(chunks).map(|s| Ok::<_, crate::Error>(Bytes::from(s))),
        ));
        let out = OpenAiTransformer::new()
            .transform_response(response("text/event-stream", body))
            .await
            .unwrap();
        assert_eq!(out.headers["x-request-id"], "req-1");

        let text = out.text().await.unwrap();
        let frames: Vec<&str> = text.split_terminator("\n\n").collect();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].contains("\"content\":\"a\""));
        assert_eq!(frames[1], "data: [DONE]");
    }

    #[tokio::test]
    async fn test_other_content_types_pass_through() {
        let resp = response("text/plain", ResponseBody::Full(Bytes::from("raw")));
        let out = OpenAiTransformer::new()
            .transform_response(resp)
            .await
            .unwrap();
        assert_eq!(out.text().await.unwrap(), "raw");
    }
}
