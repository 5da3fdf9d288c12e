use serde::Serialize;
use serde_json::Value;

use super::{MethodSpec, NamespaceDescriptor, param};
use crate::{client::RpcClient, error::RpcResult};

pub const TRACE_CALL: &str = "trace_call";
pub const TRACE_CALL_MANY: &str = "trace_callMany";
pub const TRACE_RAW_TRANSACTION: &str = "trace_rawTransaction";
pub const TRACE_REPLAY_BLOCK_TRANSACTIONS: &str = "trace_replayBlockTransactions";
pub const TRACE_REPLAY_TRANSACTION: &str = "trace_replayTransaction";
pub const TRACE_BLOCK: &str = "trace_block";
pub const TRACE_FILTER: &str = "trace_filter";
pub const TRACE_GET: &str = "trace_get";
pub const TRACE_TRANSACTION: &str = "trace_transaction";

/// Parity-style `trace_*` methods.
pub const NAMESPACE: NamespaceDescriptor = NamespaceDescriptor {
    property: "trace",
    methods: &[
        MethodSpec { name: "call", call: TRACE_CALL, params: 2 },
        MethodSpec { name: "callMany", call: TRACE_CALL_MANY, params: 2 },
        MethodSpec { name: "rawTransaction", call: TRACE_RAW_TRANSACTION, params: 2 },
        MethodSpec {
            name: "replayBlockTransactions",
            call: TRACE_REPLAY_BLOCK_TRANSACTIONS,
            params: 2,
        },
        MethodSpec { name: "replayTransaction", call: TRACE_REPLAY_TRANSACTION, params: 2 },
        MethodSpec { name: "block", call: TRACE_BLOCK, params: 1 },
        MethodSpec { name: "filter", call: TRACE_FILTER, params: 1 },
        MethodSpec { name: "get", call: TRACE_GET, params: 2 },
        MethodSpec { name: "transaction", call: TRACE_TRANSACTION, params: 1 },
    ],
};

/// Typed view of the `trace` namespace. Arguments are serialized as given; results are raw
/// JSON since trace shapes depend on the tracer.
#[derive(Clone, Copy, Debug)]
pub struct TraceClient<'a> {
    client: &'a RpcClient,
}

impl<'a> TraceClient<'a> {
    pub(crate) fn new(client: &'a RpcClient) -> Self {
        Self { client }
    }

    pub async fn call(&self, request: impl Serialize, trace_types: impl Serialize) -> RpcResult<Value> {
        self.client.request(TRACE_CALL, vec![param(request)?, param(trace_types)?]).await
    }

    pub async fn call_many(&self, calls: impl Serialize, block: impl Serialize) -> RpcResult<Value> {
        self.client.request(TRACE_CALL_MANY, vec![param(calls)?, param(block)?]).await
    }

    pub async fn raw_transaction(
        &self,
        raw: impl Serialize,
        trace_types: impl Serialize,
    ) -> RpcResult<Value> {
        self.client.request(TRACE_RAW_TRANSACTION, vec![param(raw)?, param(trace_types)?]).await
    }

    pub async fn replay_block_transactions(
        &self,
        block: impl Serialize,
        trace_types: impl Serialize,
    ) -> RpcResult<Value> {
        self.client
            .request(TRACE_REPLAY_BLOCK_TRANSACTIONS, vec![param(block)?, param(trace_types)?])
            .await
    }

    pub async fn replay_transaction(
        &self,
        hash: impl Serialize,
        trace_types: impl Serialize,
    ) -> RpcResult<Value> {
        self.client.request(TRACE_REPLAY_TRANSACTION, vec![param(hash)?, param(trace_types)?]).await
    }

    pub async fn block(&self, block: impl Serialize) -> RpcResult<Value> {
        self.client.request(TRACE_BLOCK, vec![param(block)?]).await
    }

    pub async fn filter(&self, filter: impl Serialize) -> RpcResult<Value> {
        self.client.request(TRACE_FILTER, vec![param(filter)?]).await
    }

    pub async fn get(&self, hash: impl Serialize, indices: impl Serialize) -> RpcResult<Value> {
        self.client.request(TRACE_GET, vec![param(hash)?, param(indices)?]).await
    }

    pub async fn transaction(&self, hash: impl Serialize) -> RpcResult<Value> {
        self.client.request(TRACE_TRANSACTION, vec![param(hash)?]).await
    }
}
