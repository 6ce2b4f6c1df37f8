//! # ai-lib-transformer
//!
//! Bidirectional adapter between the provider-agnostic *unified* chat format and the
//! OpenAI chat-completions wire API.
//!
//! ## Overview
//!
//! The crate translates in both directions:
//!
//! - **Outbound**: a [`UnifiedChatRequest`] becomes a wire request body plus the
//!   transport configuration (base URL, headers) needed to send it.
//! - **Inbound (JSON)**: a complete provider response becomes a [`UnifiedResponse`].
//! - **Inbound (stream)**: a raw SSE byte stream is reassembled into lines across
//!   arbitrary chunk boundaries, each `data:` frame is remapped, and a normalized
//!   SSE byte stream is emitted in arrival order.
//!
//! Transport, credential storage and routing are the caller's business: this crate
//! only shapes the data flowing through them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_lib_transformer::{OpenAiTransformer, ProviderConfig, Transformer, UnifiedChatRequest};
//!
//! # fn main() -> ai_lib_transformer::Result<()> {
//! let provider = ProviderConfig::new("https://api.openai.com", "sk-...");
//! let request: UnifiedChatRequest = serde_json::from_str(
//!     r#"{"messages":[{"role":"user","content":"hi"}],"model":"gpt-4o","stream":true}"#,
//! )?;
//!
//! let transformer = OpenAiTransformer::new();
//! let outbound = transformer.transform_request(&request, &provider)?;
//! let url = outbound.config.endpoint_url(transformer.endpoint())?;
//! // send `outbound.body` to `url`, then hand the response to `transform_response`
//! # let _ = url;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Unified request/response/stream types |
//! | [`wire`] | Provider wire request types |
//! | [`config`] | Provider configuration |
//! | [`transformer`] | Request/response mappers and the [`Transformer`] trait |
//! | [`pipeline`] | Streaming reassembly (line decoding, frame remapping) |
//! | [`transport`] | Boundary types for provider responses and `reqwest` glue |

pub mod config;
pub mod pipeline;
pub mod transformer;
pub mod transport;
pub mod types;
pub mod wire;

pub use config::ProviderConfig;
pub use pipeline::{LineDecoder, StreamReassembler};
pub use transformer::{
    OpenAiTransformer, OutboundRequest, RequestMapper, ResponseMapper, Transformer,
    TransportConfig,
};
pub use transport::{ProviderResponse, ResponseBody};
pub use types::{
    message::{MessageRole, UnifiedMessage},
    request::UnifiedChatRequest,
    response::UnifiedResponse,
    tool::ToolCall,
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
