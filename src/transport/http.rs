use crate::transformer::OutboundRequest;
use crate::transport::{ProviderResponse, ResponseBody, TransportError};
use crate::Result;
use futures::TryStreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

impl ProviderResponse {
    /// Wrap a live `reqwest` response without buffering its body.
    pub fn from_reqwest(response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)));

        Self {
            status,
            headers,
            body: ResponseBody::Stream(Box::pin(body)),
        }
    }
}

impl OutboundRequest {
    /// Build the POST for `endpoint` (e.g. `/v1/chat/completions`) on `client`.
    pub fn to_reqwest(
        &self,
        client: &reqwest::Client,
        endpoint: &str,
    ) -> Result<reqwest::RequestBuilder> {
        let url = self.config.endpoint_url(endpoint)?;
        let mut headers = HeaderMap::new();
        for (k, v) in &self.config.headers {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
                crate::Error::Transport(TransportError::Other(format!(
                    "invalid header name {}: {}",
                    k, e
                )))
            })?;
            // Value is not echoed: it may be the credential.
            let value = HeaderValue::from_str(v).map_err(|e| {
                crate::Error::Transport(TransportError::Other(format!(
                    "invalid value for header {}: {}",
                    k, e
                )))
            })?;
            headers.insert(name, value);
        }
        let mut req = client.post(url).headers(headers).json(&self.body);
        if self.body.stream {
            // Prefer SSE for providers that support it
            req = req.header("accept", "text/event-stream");
        }
        Ok(req)
    }

    /// Send with `client` and wrap the reply. No retries, no timeouts beyond the client's own.
    pub async fn send(
        &self,
        client: &reqwest::Client,
        endpoint: &str,
    ) -> Result<ProviderResponse> {
        let response = self
            .to_reqwest(client, endpoint)?
            .send()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;
        Ok(ProviderResponse::from_reqwest(response))
    }
}
