use alloy_primitives::{Address, B256, Bytes, U64, U256};
use serde_json::Value;

use super::param;
use crate::{client::RpcClient, error::RpcResult};

pub const ETH_CHAIN_ID: &str = "eth_chainId";
pub const ETH_BLOCK_NUMBER: &str = "eth_blockNumber";
pub const ETH_GET_BALANCE: &str = "eth_getBalance";
pub const ETH_GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
pub const ETH_GET_TRANSACTION_COUNT: &str = "eth_getTransactionCount";
pub const ETH_SEND_RAW_TRANSACTION: &str = "eth_sendRawTransaction";
pub const ETH_GET_TRANSACTION_BY_HASH: &str = "eth_getTransactionByHash";
pub const ETH_GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";

/// The handful of standard `eth_*` calls used by the harness and its scenarios.
///
/// Blocks, transactions and receipts are returned as raw JSON; the harness never interprets
/// chain data beyond counters and hashes.
#[derive(Clone, Copy, Debug)]
pub struct EthClient<'a> {
    client: &'a RpcClient,
}

impl<'a> EthClient<'a> {
    pub(crate) fn new(client: &'a RpcClient) -> Self {
        Self { client }
    }

    pub async fn chain_id(&self) -> RpcResult<u64> {
        let id: U64 = self.client.request(ETH_CHAIN_ID, vec![]).await?;
        Ok(id.to())
    }

    pub async fn block_number(&self) -> RpcResult<u64> {
        let number: U64 = self.client.request(ETH_BLOCK_NUMBER, vec![]).await?;
        Ok(number.to())
    }

    pub async fn get_balance(&self, address: Address, block: &str) -> RpcResult<U256> {
        self.client.request(ETH_GET_BALANCE, vec![param(address)?, param(block)?]).await
    }

    /// `block` is a tag (`latest`, `pending`, ...) or a hex number.
    pub async fn get_block_by_number(&self, block: &str, full: bool) -> RpcResult<Option<Value>> {
        self.client.request(ETH_GET_BLOCK_BY_NUMBER, vec![param(block)?, param(full)?]).await
    }

    pub async fn get_transaction_count(&self, address: Address, block: &str) -> RpcResult<u64> {
        let count: U64 = self
            .client
            .request(ETH_GET_TRANSACTION_COUNT, vec![param(address)?, param(block)?])
            .await?;
        Ok(count.to())
    }

    pub async fn send_raw_transaction(&self, raw: Bytes) -> RpcResult<B256> {
        self.client.request(ETH_SEND_RAW_TRANSACTION, vec![param(raw)?]).await
    }

    pub async fn get_transaction_by_hash(&self, hash: B256) -> RpcResult<Option<Value>> {
        self.client.request(ETH_GET_TRANSACTION_BY_HASH, vec![param(hash)?]).await
    }

    pub async fn get_transaction_receipt(&self, hash: B256) -> RpcResult<Option<Value>> {
        self.client.request(ETH_GET_TRANSACTION_RECEIPT, vec![param(hash)?]).await
    }
}
