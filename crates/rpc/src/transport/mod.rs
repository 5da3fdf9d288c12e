// crates/rpc/src/transport/mod.rs
#![allow(missing_docs)]

pub mod http;
pub mod mock;
pub mod ws;

use std::fmt;

use async_trait::async_trait;
use color_eyre::eyre;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Id used when the caller does not pick one. Transports that keep a connection open correlate
/// responses with ids of their own, so the caller's id is only echoed back.
pub const DEFAULT_REQUEST_ID: u64 = 1;

/// A generic transport for sending JSON-RPC requests.
///
/// Any `Err` returned here is a connection-level failure. A well-formed JSON-RPC error
/// envelope is a successful send and comes back inside [`JsonRpcResponse::error`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a JSON-RPC request and returns the response.
    async fn send(&self, req: &JsonRpcRequest) -> eyre::Result<JsonRpcResponse>;
}

/// Selects how a client reaches the node. The node is started the same way for both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Http,
    Ws,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Ws => f.write_str("ws"),
        }
    }
}

/// Represents a JSON-RPC request object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self::with_id(DEFAULT_REQUEST_ID, method, params)
    }

    pub fn with_id(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, method: method.into(), params }
    }
}

/// Represents a JSON-RPC response object.
///
/// A `null` result deserializes as `None`, the same as an absent one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: u64, result: Value) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    pub fn failure(id: u64, error: JsonRpcError) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) }
    }

    /// Splits the envelope into its payload. A missing result reads as `null`.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Represents a JSON-RPC error object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_serializes_as_json_rpc_envelope() {
        let req = JsonRpcRequest::new("engine_createBlock", vec![json!(true), json!(true), Value::Null]);
        let encoded = serde_json::to_value(&req).unwrap();
        assert_eq!(
            encoded,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "engine_createBlock",
                "params": [true, true, null],
            })
        );
    }

    #[test]
    fn response_with_error_decodes_code_and_message() {
        let raw = r#"{"jsonrpc":"2.0","id":7,"error":{"code":-32601,"message":"Method not found"}}"#;
        let resp: JsonRpcResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.id, 7);
        assert!(resp.result.is_none());
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.code, -32601);
        assert_eq!(err.message, "Method not found");
    }

    #[test]
    fn null_result_reads_as_null_value() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        let resp: JsonRpcResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.into_result().unwrap(), Value::Null);
    }
}
