use std::collections::BTreeMap;

use alloy_primitives::Address;
pub use alloy_rpc_types_txpool::TxpoolStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{MethodSpec, NamespaceDescriptor};
use crate::{client::RpcClient, error::RpcResult};

pub const TXPOOL_CONTENT: &str = "txpool_content";
pub const TXPOOL_INSPECT: &str = "txpool_inspect";
pub const TXPOOL_STATUS: &str = "txpool_status";

pub const NAMESPACE: NamespaceDescriptor = NamespaceDescriptor {
    property: "txpool",
    methods: &[
        MethodSpec { name: "content", call: TXPOOL_CONTENT, params: 0 },
        MethodSpec { name: "inspect", call: TXPOOL_INSPECT, params: 0 },
        MethodSpec { name: "status", call: TXPOOL_STATUS, params: 0 },
    ],
};

/// Sender address to hex nonce (`"0x1"`) to entry.
pub type TransactionMap<T> = BTreeMap<Address, BTreeMap<String, T>>;

/// Pool contents split into ready (`pending`) and nonce-gapped (`queued`) transactions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TxpoolResult<T> {
    pub pending: T,
    pub queued: T,
}

/// `txpool_content`: full transaction objects.
pub type TxpoolContent = TxpoolResult<TransactionMap<Value>>;

/// `txpool_inspect`: one-line summaries such as `0x..: 0 wei + 21000 gas x 1000000000 wei`.
pub type TxpoolInspect = TxpoolResult<TransactionMap<String>>;

impl<T> TxpoolResult<TransactionMap<T>> {
    /// Nonces of `sender` in the pending set, ascending.
    pub fn pending_nonces(&self, sender: &Address) -> Vec<u64> {
        nonces(&self.pending, sender)
    }

    /// Nonces of `sender` in the queued set, ascending.
    pub fn queued_nonces(&self, sender: &Address) -> Vec<u64> {
        nonces(&self.queued, sender)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.values().all(BTreeMap::is_empty) && self.queued.values().all(BTreeMap::is_empty)
    }
}

fn nonces<T>(map: &TransactionMap<T>, sender: &Address) -> Vec<u64> {
    let mut nonces: Vec<u64> = map
        .get(sender)
        .into_iter()
        .flat_map(|by_nonce| by_nonce.keys())
        .filter_map(|key| u64::from_str_radix(key.trim_start_matches("0x"), 16).ok())
        .collect();
    nonces.sort_unstable();
    nonces
}

/// Pending-pool inspection.
#[derive(Clone, Copy, Debug)]
pub struct TxpoolClient<'a> {
    client: &'a RpcClient,
}

impl<'a> TxpoolClient<'a> {
    pub(crate) fn new(client: &'a RpcClient) -> Self {
        Self { client }
    }

    pub async fn content(&self) -> RpcResult<TxpoolContent> {
        self.client.request(TXPOOL_CONTENT, vec![]).await
    }

    pub async fn inspect(&self) -> RpcResult<TxpoolInspect> {
        self.client.request(TXPOOL_INSPECT, vec![]).await
    }

    pub async fn status(&self) -> RpcResult<TxpoolStatus> {
        self.client.request(TXPOOL_STATUS, vec![]).await
    }
}
