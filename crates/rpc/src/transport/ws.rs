// crates/rpc/src/transport/ws.rs

use std::time::Duration;

use async_trait::async_trait;
use color_eyre::eyre::{self, bail, eyre};
use futures::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::Mutex};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::trace;
use url::Url;

use super::{JsonRpcRequest, JsonRpcResponse, Transport};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// JSON-RPC over a single long-lived WebSocket.
///
/// The socket sits behind an async mutex, so at most one call is in flight. Every request goes
/// out under a fresh wire id and the caller's id is restored on the matching response. A call
/// that timed out or was dropped can leave its answer on the socket; that answer carries a
/// stale wire id and is skipped like pings and subscription notifications.
pub struct WsTransport {
    url: Url,
    request_timeout: Duration,
    conn: Mutex<Connection>,
}

struct Connection {
    stream: WsStream,
    next_id: u64,
}

impl WsTransport {
    pub async fn connect(url: Url) -> eyre::Result<Self> {
        let (stream, _response) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(url.as_str()))
            .await
            .map_err(|_| eyre!("timed out connecting to {url}"))??;
        Ok(Self {
            url,
            request_timeout: REQUEST_TIMEOUT,
            conn: Mutex::new(Connection { stream, next_id: 1 }),
        })
    }

    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport").field("url", &self.url.as_str()).finish()
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&self, req: &JsonRpcRequest) -> eyre::Result<JsonRpcResponse> {
        let mut conn = self.conn.lock().await;
        let wire_id = conn.next_id;
        conn.next_id += 1;
        let stream = &mut conn.stream;

        let wire = JsonRpcRequest { id: wire_id, ..req.clone() };
        stream.send(Message::text(serde_json::to_string(&wire)?)).await?;

        let read = async {
            while let Some(message) = stream.next().await {
                let bytes: Vec<u8> = match message? {
                    Message::Text(text) => text.as_bytes().to_vec(),
                    Message::Binary(data) => data.to_vec(),
                    Message::Close(frame) => bail!("socket closed by node: {frame:?}"),
                    _ => continue,
                };
                match serde_json::from_slice::<JsonRpcResponse>(&bytes) {
                    Ok(resp) if resp.id == wire_id => {
                        return Ok(JsonRpcResponse { id: req.id, ..resp });
                    }
                    Ok(resp) => trace!(id = resp.id, wire_id, "skipping response for another request"),
                    Err(_) => trace!("skipping non-response frame"),
                }
            }
            Err::<JsonRpcResponse, eyre::Report>(eyre!(
                "socket closed before a response to {} arrived",
                req.method
            ))
        };

        tokio::time::timeout(self.request_timeout, read)
            .await
            .map_err(|_| eyre!("timed out waiting for {} response", req.method))?
    }
}
