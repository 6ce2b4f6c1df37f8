//! 流式重组模块：把上游 SSE 字节流还原为逐行帧并重新映射为统一格式。
//!
//! # Stream Reassembly Layer
//!
//! Turns a raw provider byte stream into a normalized SSE byte stream.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Raw Bytes → LineDecoder → Frame classification → ResponseMapper::map_chunk → data: <json>\n\n
//!     │            │                 │                        │
//!   HTTP      carry-over        data:/[DONE]/            delta defaults,
//!             buffer, UTF-8     malformed (dropped)      tool-call index
//! ```
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`LineDecoder`] | Explicit cross-chunk state: splits bytes into complete lines |
//! | [`frame`] | Per-line classification and frame encoding |
//! | [`StreamReassembler`] | Pull-based stream transform tying the two together |
//!
//! Each stream owns its own decoder; nothing is shared between in-flight streams.

pub mod decode;
pub mod frame;
pub mod reassemble;

pub use decode::LineDecoder;
pub use frame::{FrameOutcome, DONE_FRAME};
pub use reassemble::StreamReassembler;

/// Pipeline error types
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Malformed stream frame: {reason}{}", .hint.as_ref().map(|h| format!("\n Hint: {}", h)).unwrap_or_default())]
    MalformedFrame {
        payload: String,
        reason: String,
        hint: Option<String>,
    },

    #[error("Frame encoding error: {0}")]
    Encoding(String),
}

impl PipelineError {
    /// Attach an actionable hint to the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        let hint_val = Some(hint.into());
        if let PipelineError::MalformedFrame { ref mut hint, .. } = self {
            *hint = hint_val;
        }
        self
    }
}
