//! Typed clients for the RPC namespaces a manual-seal node exposes.
//!
//! Each namespace pairs a declarative [`NamespaceDescriptor`] (method name, RPC call, arity)
//! with a struct whose methods are wired to the same call names. The descriptor drives the
//! dynamic [`crate::ExtendedClient`] surface, the struct gives call sites compile-time checks.

pub mod debug;
pub mod engine;
pub mod eth;
pub mod trace;
pub mod txpool;

use serde::Serialize;
use serde_json::Value;

pub use crate::extension::{MethodSpec, NamespaceDescriptor};
use crate::error::RpcResult;

/// Every namespace the harness installs on top of the base client, in installation order.
pub const EXTENDED_NAMESPACES: [NamespaceDescriptor; 3] =
    [trace::NAMESPACE, debug::NAMESPACE, txpool::NAMESPACE];

pub(crate) fn param(value: impl Serialize) -> RpcResult<Value> {
    Ok(serde_json::to_value(value)?)
}
