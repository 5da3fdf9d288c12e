//! On-demand block production.
//!
//! Sealing is the only way the chain moves forward in manual-seal mode, so every test step that
//! submits transactions ends with one of these calls. A seal request that produces nothing is a
//! hard failure: whatever the test asserts next would be meaningless.

use std::time::Duration;

use alloy_primitives::B256;
use sealkit_rpc::{
    RpcClient, RpcError,
    namespaces::engine::{CreatedBlock, ENGINE_CREATE_BLOCK},
};
use serde_json::Value;
use tracing::debug;

use crate::{
    config::SETTLE_DELAY,
    error::{HarnessError, HarnessResult},
};

/// Triggers `engine_createBlock` and waits for the chain head to settle.
#[derive(Clone, Debug)]
pub struct BlockProducer {
    client: RpcClient,
    settle_delay: Duration,
}

impl BlockProducer {
    pub fn new(client: RpcClient) -> Self {
        Self { client, settle_delay: SETTLE_DELAY }
    }

    #[must_use]
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Seals a block (empty if the pool is empty) and waits the settle delay before returning.
    pub async fn create_block(&self, finalize: bool) -> HarnessResult<CreatedBlock> {
        self.create_block_with(true, finalize, None).await
    }

    /// Like [`BlockProducer::create_block`] without the settle delay.
    pub async fn create_block_nowait(&self, finalize: bool) -> HarnessResult<CreatedBlock> {
        self.seal(true, finalize, None).await
    }

    /// Full control over the seal request. Settles like [`BlockProducer::create_block`].
    pub async fn create_block_with(
        &self,
        create_empty: bool,
        finalize: bool,
        parent_hash: Option<B256>,
    ) -> HarnessResult<CreatedBlock> {
        let block = self.seal(create_empty, finalize, parent_hash).await?;
        tokio::time::sleep(self.settle_delay).await;
        Ok(block)
    }

    /// Finalizes a block sealed with `finalize = false`.
    pub async fn finalize_block(&self, hash: B256) -> HarnessResult<bool> {
        Ok(self.client.engine().finalize_block(hash, None).await?)
    }

    async fn seal(
        &self,
        create_empty: bool,
        finalize: bool,
        parent_hash: Option<B256>,
    ) -> HarnessResult<CreatedBlock> {
        let response = self.client.engine().create_block(create_empty, finalize, parent_hash).await?;

        let result = match (&response.error, &response.result) {
            (None, Some(result)) if is_truthy(result) => result.clone(),
            _ => return Err(HarnessError::block_not_produced(&response)),
        };

        let block: CreatedBlock =
            serde_json::from_value(result).map_err(|e| RpcError::Deserialize {
                method: ENGINE_CREATE_BLOCK.to_string(),
                message: e.to_string(),
            })?;
        debug!(hash = %block.hash, finalize, "sealed block");
        Ok(block)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
