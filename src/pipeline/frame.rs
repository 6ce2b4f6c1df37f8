//! Per-line SSE frame handling (line -> outcome -> bytes)

use bytes::Bytes;
use serde_json::Value;

use crate::pipeline::PipelineError;
use crate::transformer::ResponseMapper;
use crate::types::response::StreamChunk;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SIGNAL: &str = "[DONE]";

/// The terminal sentinel frame, re-emitted verbatim.
pub const DONE_FRAME: &[u8] = b"data: [DONE]\n\n";

/// What a single reconstructed line turned into.
#[derive(Debug)]
pub enum FrameOutcome {
    /// Not a `data: ` line, or an empty payload.
    Skip,
    /// `data: [DONE]`.
    Done,
    /// Parsed and remapped payload.
    Chunk(StreamChunk),
    /// Payload that is not JSON. Recoverable: the caller drops the line.
    Malformed(PipelineError),
}

impl FrameOutcome {
    pub fn classify(line: &str, mapper: &ResponseMapper) -> Self {
        let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
            return FrameOutcome::Skip;
        };
        let payload = rest.trim();
        if payload == DONE_SIGNAL {
            return FrameOutcome::Done;
        }
        if payload.is_empty() {
            return FrameOutcome::Skip;
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(raw) => FrameOutcome::Chunk(mapper.map_chunk(&raw)),
            Err(e) => FrameOutcome::Malformed(
                PipelineError::MalformedFrame {
                    payload: payload.to_string(),
                    reason: e.to_string(),
                    hint: None,
                }
                .with_hint(malformed_hint(payload)),
            ),
        }
    }
}

fn malformed_hint(payload: &str) -> &'static str {
    if payload.starts_with('{') || payload.starts_with('[') {
        "payload looks truncated; the provider may have split one event across several data: lines"
    } else {
        "data: payload is not JSON; check that the endpoint speaks the OpenAI streaming format"
    }
}

/// Serialize a chunk into `data: <json>\n\n` framing.
pub fn encode_chunk(chunk: &StreamChunk) -> Result<Bytes, PipelineError> {
    let json = serde_json::to_string(chunk).map_err(|e| PipelineError::Encoding(e.to_string()))?;
    Ok(Bytes::from(format!("{}{}\n\n", DATA_PREFIX, json)))
}
