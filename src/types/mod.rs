//! 类型系统模块：统一格式（unified format）的数据类型定义。
//!
//! # Types Module
//!
//! Strongly-typed representations of the provider-agnostic chat schema that this
//! crate normalizes to and from.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`UnifiedMessage`] | Chat message with role, content and tool plumbing |
//! | [`MessageRole`] | Closed role set with a lenient fallback |
//! | [`UnifiedChatRequest`] | Caller-side request |
//! | [`UnifiedResponse`] | Normalized non-streamed response |
//! | [`StreamChunk`] | Normalized streamed frame payload |
//!
//! ## Example
//!
//! ```rust
//! use ai_lib_transformer::types::{ContentPart, MessageContent, UnifiedMessage};
//!
//! let system = UnifiedMessage::system("You are a helpful assistant");
//! let user = UnifiedMessage::user_parts(vec![
//!     ContentPart::text("What is in this image?"),
//!     ContentPart::image_url("https://example.com/cat.png"),
//! ]);
//! assert!(matches!(user.content, Some(MessageContent::Parts(_))));
//! # let _ = system;
//! ```

pub mod message;
pub mod request;
pub mod response;
pub mod tool;

pub use message::{ContentBlock, ContentPart, ImageUrl, MessageContent, MessageRole, UnifiedMessage};
pub use request::UnifiedChatRequest;
pub use response::{
    Choice, Delta, DeltaChoice, DeltaToolCall, ResponseMessage, ResponseToolCall, StreamChunk,
    ToolCallFunction, UnifiedResponse, Usage,
};
pub use tool::{FunctionCall, FunctionDefinition, ToolCall, ToolDefinition};
