//! Transport boundary types
//!
//! Sending requests is the caller's job. This module only defines what a provider
//! response looks like when it is handed to the transformer, plus `reqwest` glue in
//! [`http`].

pub mod http;

use bytes::{Bytes, BytesMut};
use futures::{stream, TryStreamExt};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use std::fmt;

use crate::{BoxStream, Result};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

/// Response body as delivered by the transport.
pub enum ResponseBody {
    Full(Bytes),
    Stream(BoxStream<'static, Bytes>),
}

impl ResponseBody {
    /// Buffer the whole body. Upstream errors are returned as-is.
    pub async fn into_bytes(self) -> Result<Bytes> {
        match self {
            ResponseBody::Full(bytes) => Ok(bytes),
            ResponseBody::Stream(stream) => {
                let buf = stream
                    .try_fold(BytesMut::new(), |mut acc, chunk| async move {
                        acc.extend_from_slice(&chunk);
                        Ok(acc)
                    })
                    .await?;
                Ok(buf.freeze())
            }
        }
    }

    pub fn into_stream(self) -> BoxStream<'static, Bytes> {
        match self {
            ResponseBody::Full(bytes) => Box::pin(stream::once(async move { Ok(bytes) })),
            ResponseBody::Stream(stream) => stream,
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Full(bytes) => f.debug_tuple("Full").field(&bytes.len()).finish(),
            ResponseBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Provider response: status, headers and body.
#[derive(Debug)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl ProviderResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: ResponseBody) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Canonical reason phrase for the status, e.g. `"OK"`.
    pub fn status_text(&self) -> Option<&'static str> {
        self.status.canonical_reason()
    }

    /// Collect a streamed body; convenient for tests and non-streaming callers.
    pub async fn text(self) -> Result<String> {
        let bytes = self.body.into_bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
