#![allow(missing_docs)]

use serde_json::Value;
use thiserror::Error;

/// Convenience alias for results produced by the RPC clients.
pub type RpcResult<T> = Result<T, RpcError>;

/// Classifies failures of a single JSON-RPC call.
///
/// Transport failures carry the method and parameters so a failing test step can be replayed by
/// hand. JSON-RPC errors keep the node's code and message untouched so tests can assert on them.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Failed to send custom request ({method} ({params})): {message}")]
    Transport { method: String, params: String, message: String },

    #[error("JSON-RPC error from {method} (code {code}): {message}")]
    JsonRpc { method: String, code: i64, message: String, data: Option<Value> },

    #[error("Invalid {method} response: {message}")]
    Deserialize { method: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown method {name} in namespace {namespace}")]
    UnknownMethod { namespace: String, name: String },
}

impl RpcError {
    /// The node's JSON-RPC error code, when the node answered with an error envelope.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::JsonRpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
