use serde::Serialize;
use serde_json::Value;

use super::{MethodSpec, NamespaceDescriptor, param};
use crate::{client::RpcClient, error::RpcResult};

pub const DEBUG_TRACE_BLOCK_BY_NUMBER: &str = "debug_traceBlockByNumber";
pub const DEBUG_TRACE_BLOCK_BY_HASH: &str = "debug_traceBlockByHash";
pub const DEBUG_TRACE_TRANSACTION: &str = "debug_traceTransaction";

pub const NAMESPACE: NamespaceDescriptor = NamespaceDescriptor {
    property: "debug",
    methods: &[
        MethodSpec { name: "traceBlockByNumber", call: DEBUG_TRACE_BLOCK_BY_NUMBER, params: 2 },
        MethodSpec { name: "traceBlockByHash", call: DEBUG_TRACE_BLOCK_BY_HASH, params: 2 },
        MethodSpec { name: "traceTransaction", call: DEBUG_TRACE_TRANSACTION, params: 2 },
    ],
};

/// Geth-style `debug_trace*` methods. `options` is the tracer config object, `None` sends
/// `null` and lets the node pick its default tracer.
#[derive(Clone, Copy, Debug)]
pub struct DebugClient<'a> {
    client: &'a RpcClient,
}

impl<'a> DebugClient<'a> {
    pub(crate) fn new(client: &'a RpcClient) -> Self {
        Self { client }
    }

    pub async fn trace_block_by_number(
        &self,
        block: impl Serialize,
        options: Option<Value>,
    ) -> RpcResult<Value> {
        self.client.request(DEBUG_TRACE_BLOCK_BY_NUMBER, vec![param(block)?, param(options)?]).await
    }

    pub async fn trace_block_by_hash(
        &self,
        hash: impl Serialize,
        options: Option<Value>,
    ) -> RpcResult<Value> {
        self.client.request(DEBUG_TRACE_BLOCK_BY_HASH, vec![param(hash)?, param(options)?]).await
    }

    pub async fn trace_transaction(
        &self,
        hash: impl Serialize,
        options: Option<Value>,
    ) -> RpcResult<Value> {
        self.client.request(DEBUG_TRACE_TRANSACTION, vec![param(hash)?, param(options)?]).await
    }
}
