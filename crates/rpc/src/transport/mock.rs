//! A mock transport for exercising clients without a live node.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use color_eyre::eyre::{self, eyre};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Transport};

/// What the mock answers for a single call.
#[derive(Debug)]
pub enum MockReply {
    /// A successful envelope carrying this result.
    Result(Value),
    /// A JSON-RPC error envelope.
    Error(JsonRpcError),
    /// A connection-level failure.
    Transport(String),
}

/// A mock transport that can be programmed with expected responses for testing.
///
/// Replies are queued per method and consumed in order. Every request is recorded so tests
/// can assert on exactly what went over the wire.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<MockReply>>>,
    requests: Mutex<Vec<JsonRpcRequest>>,
}

impl MockTransport {
    /// Creates a new, empty mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for the next call to `method`.
    pub async fn push(&self, method: impl Into<String>, reply: MockReply) {
        self.replies.lock().await.entry(method.into()).or_default().push_back(reply);
    }

    /// Queues a successful result for the next call to `method`.
    pub async fn push_result(&self, method: impl Into<String>, result: Value) {
        self.push(method, MockReply::Result(result)).await;
    }

    /// Returns a copy of every request received so far.
    pub async fn requests(&self) -> Vec<JsonRpcRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &JsonRpcRequest) -> eyre::Result<JsonRpcResponse> {
        self.requests.lock().await.push(request.clone());

        let reply = self
            .replies
            .lock()
            .await
            .get_mut(&request.method)
            .and_then(|queue| queue.pop_front());

        match reply {
            Some(MockReply::Result(result)) => Ok(JsonRpcResponse::success(request.id, result)),
            Some(MockReply::Error(error)) => Ok(JsonRpcResponse::failure(request.id, error)),
            Some(MockReply::Transport(message)) => Err(eyre!(message)),
            // Nothing was programmed for this method, it's an unexpected call.
            None => Err(eyre!(
                "MockTransport: received unexpected call to method '{}'",
                request.method
            )),
        }
    }
}
