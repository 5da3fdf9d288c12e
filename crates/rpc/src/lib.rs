// crates/rpc/src/lib.rs

pub mod client;
pub mod error;
pub mod extension;
pub mod namespaces;
pub mod transport;

pub use client::RpcClient;
pub use error::{RpcError, RpcResult};
pub use extension::{ExtendedClient, MethodSpec, Namespace, NamespaceDescriptor};
pub use transport::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Transport, TransportKind};
