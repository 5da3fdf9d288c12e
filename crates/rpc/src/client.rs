use std::{fmt, sync::Arc};

use color_eyre::eyre;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{
    error::{RpcError, RpcResult},
    namespaces::{engine::EngineClient, eth::EthClient},
    transport::{
        DEFAULT_REQUEST_ID, JsonRpcRequest, JsonRpcResponse, Transport, TransportKind,
        http::HttpTransport, ws::WsTransport,
    },
};

/// Sends single JSON-RPC requests over the active transport.
///
/// The client is a cheap handle: clones share the same transport. Calls are awaited one at a
/// time by the harness, so request ids are echoed rather than used for correlation.
#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn Transport>,
}

impl RpcClient {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self { transport: Arc::new(transport) }
    }

    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client speaking HTTP to `url`.
    pub fn http(url: Url) -> eyre::Result<Self> {
        Ok(Self::new(HttpTransport::new(url)?))
    }

    /// Client holding one WebSocket to `url`.
    pub async fn ws(url: Url) -> eyre::Result<Self> {
        Ok(Self::new(WsTransport::connect(url).await?))
    }

    /// Connects with the requested transport kind, picking the matching endpoint.
    pub async fn connect(kind: TransportKind, http_url: Url, ws_url: Url) -> eyre::Result<Self> {
        match kind {
            TransportKind::Http => Self::http(http_url),
            TransportKind::Ws => Self::ws(ws_url).await,
        }
    }

    /// Sends `method` with positional `params` using the default id.
    ///
    /// Returns the raw envelope: a JSON-RPC error from the node is an `Ok` response with the
    /// `error` field set. Only transport failures map to `Err`.
    pub async fn send(&self, method: &str, params: Vec<Value>) -> RpcResult<JsonRpcResponse> {
        self.send_with_id(DEFAULT_REQUEST_ID, method, params).await
    }

    /// Like [`RpcClient::send`] with a caller-chosen id.
    pub async fn send_with_id(
        &self,
        id: u64,
        method: &str,
        params: Vec<Value>,
    ) -> RpcResult<JsonRpcResponse> {
        let req = JsonRpcRequest::with_id(id, method, params);
        debug!(method, id, params = %format_params(&req.params), "sending request");

        match self.transport.send(&req).await {
            Ok(resp) => {
                debug!(method, id = resp.id, failed = resp.error.is_some(), "received response");
                Ok(resp)
            }
            Err(report) => Err(RpcError::Transport {
                method: method.to_string(),
                params: format_params(&req.params),
                message: report.chain().map(ToString::to_string).join(": "),
            }),
        }
    }

    /// Sends `method` and decodes the result into `R`.
    ///
    /// A JSON-RPC error envelope becomes [`RpcError::JsonRpc`] with the node's code and message.
    /// A `null` result is decoded as `null`, so `Option<_>` targets work for lookups.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> RpcResult<R> {
        let value = self.send(method, params).await?.into_result().map_err(|err| {
            RpcError::JsonRpc {
                method: method.to_string(),
                code: err.code,
                message: err.message,
                data: err.data,
            }
        })?;

        serde_json::from_value(value).map_err(|e| RpcError::Deserialize {
            method: method.to_string(),
            message: e.to_string(),
        })
    }

    /// The manual-seal `engine_*` methods.
    pub fn engine(&self) -> EngineClient<'_> {
        EngineClient::new(self)
    }

    /// The subset of `eth_*` the harness itself relies on.
    pub fn eth(&self) -> EthClient<'_> {
        EthClient::new(self)
    }
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient").field("transport", &"<dyn Transport>").finish()
    }
}

/// Renders params the way they show up in transport error messages: `a,b,c`.
pub(crate) fn format_params(params: &[Value]) -> String {
    params.iter().join(",")
}
