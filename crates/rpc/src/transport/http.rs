// crates/rpc/src/transport/http.rs

use std::time::Duration;

use async_trait::async_trait;
use color_eyre::eyre::{self, eyre};
use reqwest::{Client, header::CONTENT_TYPE};
use url::Url;

use super::{JsonRpcRequest, JsonRpcResponse, Transport};

// Tracing calls on a freshly sealed block can take a while on debug builds.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC over HTTP POST. The underlying connection pool is reused across calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
}

impl HttpTransport {
    pub fn new(url: Url) -> eyre::Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &JsonRpcRequest) -> eyre::Result<JsonRpcResponse> {
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| eyre!(e))?;

        // Servers reply to JSON-RPC errors with 200 or with 4xx/5xx depending on the stack; the
        // body is the only thing that matters as long as it parses as an envelope.
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| eyre!(e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            eyre!("invalid JSON-RPC response (HTTP {status}): {e}: {}", String::from_utf8_lossy(&bytes))
        })
    }
}
