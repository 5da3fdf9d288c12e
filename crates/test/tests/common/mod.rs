//! Shared helpers for the end-to-end scenarios.
//!
//! Every scenario launches its own node through `with_node`, so the tests are serialized: they
//! all bind the same fixed ports.

#![allow(dead_code)]

use color_eyre::eyre::{Result, eyre};
use sealkit_harness::TestContext;
use serde_json::Value;

pub(crate) fn init() {
    let _ = color_eyre::install();
    sealkit_harness::logging::init_test_logging();
}

/// Number of transactions in the block at `tag`.
pub(crate) async fn block_tx_count(ctx: &TestContext, tag: &str) -> Result<usize> {
    let block = ctx
        .client()
        .eth()
        .get_block_by_number(tag, false)
        .await?
        .ok_or_else(|| eyre!("block {tag} not found"))?;
    block
        .get("transactions")
        .and_then(Value::as_array)
        .map(Vec::len)
        .ok_or_else(|| eyre!("block {tag} has no transactions field"))
}
