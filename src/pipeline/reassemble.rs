//! Streaming reassembly (Bytes -> normalized SSE Bytes)

use bytes::Bytes;
use futures::{stream, StreamExt};
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::pipeline::frame::{encode_chunk, FrameOutcome, DONE_FRAME};
use crate::pipeline::LineDecoder;
use crate::transformer::ResponseMapper;
use crate::BoxStream;

/// Re-frames a provider SSE byte stream into the unified streaming format.
///
/// Pull-based: the upstream is only polled once every frame produced by the
/// previous read has been taken by the consumer. Dropping the output stream
/// drops the upstream reader; reaching the end or an upstream error releases it
/// immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamReassembler {
    mapper: ResponseMapper,
}

struct ReassemblyState {
    input: Option<BoxStream<'static, Bytes>>,
    decoder: LineDecoder,
    ready: VecDeque<Bytes>,
    mapper: ResponseMapper,
}

impl StreamReassembler {
    pub fn new() -> Self {
        Self {
            mapper: ResponseMapper::new(),
        }
    }

    /// Turn one complete line into an output frame, if it yields one.
    ///
    /// Malformed payloads are logged and dropped; they never fail the stream.
    pub fn process_line(&self, line: &str) -> Option<Bytes> {
        process_line(&self.mapper, line)
    }

    /// Feed one upstream read through `decoder` and collect the frames it completes.
    pub fn process_bytes(&self, decoder: &mut LineDecoder, bytes: &[u8]) -> Vec<Bytes> {
        decoder
            .push(bytes)
            .iter()
            .filter_map(|line| self.process_line(line))
            .collect()
    }

    /// Flush whatever the stream left unterminated.
    pub fn finish(&self, decoder: &mut LineDecoder) -> Option<Bytes> {
        decoder.finish().and_then(|line| self.process_line(&line))
    }

    pub fn reassemble(&self, input: BoxStream<'static, Bytes>) -> BoxStream<'static, Bytes> {
        let state = ReassemblyState {
            input: Some(input),
            decoder: LineDecoder::new(),
            ready: VecDeque::new(),
            mapper: self.mapper,
        };

        let stream = stream::unfold(state, |mut state| async move {
            loop {
                if let Some(frame) = state.ready.pop_front() {
                    return Some((Ok(frame), state));
                }

                let input = state.input.as_mut()?;
                match input.next().await {
                    Some(Ok(bytes)) => {
                        let mapper = state.mapper;
                        for line in state.decoder.push(&bytes) {
                            if let Some(frame) = process_line(&mapper, &line) {
                                state.ready.push_back(frame);
                            }
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "upstream stream failed, terminating");
                        state.input = None;
                        return Some((Err(e), state));
                    }
                    None => {
                        debug!("upstream stream ended");
                        state.input = None;
                        if let Some(last) = state.decoder.finish() {
                            if let Some(frame) = process_line(&state.mapper, &last) {
                                state.ready.push_back(frame);
                            }
                        }
                    }
                }
            }
        });

        Box::pin(stream)
    }
}

fn process_line(mapper: &ResponseMapper, line: &str) -> Option<Bytes> {
    match FrameOutcome::classify(line, mapper) {
        FrameOutcome::Skip => None,
        FrameOutcome::Done => Some(Bytes::from_static(DONE_FRAME)),
        FrameOutcome::Chunk(chunk) => {
            debug!(id = ?chunk.id, "openai stream chunk");
            match encode_chunk(&chunk) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(error = %e, "dropping stream chunk that failed to encode");
                    None
                }
            }
        }
        FrameOutcome::Malformed(e) => {
            warn!(error = %e, "error parsing OpenAI stream chunk, dropping frame");
            None
        }
    }
}
