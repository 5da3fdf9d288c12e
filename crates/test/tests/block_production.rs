//! Manual sealing against a live node.
//!
//! Requires a built node binary, see `FRONTIER_BUILD` / `SEALKIT_NODE_BINARY`.

mod common;

use std::time::Instant;

use color_eyre::eyre::{Result, ensure};
use sealkit_harness::{SETTLE_DELAY, TestContext, TransportKind, with_node};
use sealkit_test::{GENESIS_ACCOUNT, genesis_signer, send_transfer};
use serial_test::serial;

#[tokio::test]
#[serial]
#[ignore = "integration test - run with: cargo test -p sealkit-test -- --ignored"]
async fn empty_block_is_produced_and_settles() -> Result<()> {
    common::init();
    with_node("Manual seal (empty block)", TransportKind::Http, empty_block).await
}

async fn empty_block(ctx: TestContext) -> Result<()> {
    let eth = ctx.client().eth();
    let before = eth.block_number().await?;

    let start = Instant::now();
    ctx.blocks().create_block(true).await?;
    ensure!(start.elapsed() >= SETTLE_DELAY, "returned before the settle delay");

    assert_eq!(eth.block_number().await?, before + 1);
    assert_eq!(common::block_tx_count(&ctx, "latest").await?, 0);
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "integration test - run with: cargo test -p sealkit-test -- --ignored"]
async fn consecutive_nonces_land_in_one_block() -> Result<()> {
    common::init();
    with_node("Manual seal (pending pool)", TransportKind::Http, three_transfers).await
}

async fn three_transfers(ctx: TestContext) -> Result<()> {
    let signer = genesis_signer()?;
    let eth = ctx.client().eth();
    let first = eth.get_transaction_count(GENESIS_ACCOUNT, "latest").await?;
    let nonces: Vec<u64> = (first..first + 3).collect();

    for &nonce in &nonces {
        send_transfer(ctx.client(), &signer, nonce).await?;
    }
    assert_eq!(ctx.txpool()?.content().await?.pending_nonces(&GENESIS_ACCOUNT), nonces);

    ctx.blocks().create_block(true).await?;

    let content = ctx.txpool()?.content().await?;
    assert!(content.pending_nonces(&GENESIS_ACCOUNT).is_empty());
    assert!(content.queued_nonces(&GENESIS_ACCOUNT).is_empty());
    assert_eq!(common::block_tx_count(&ctx, "latest").await?, 3);
    assert_eq!(eth.get_transaction_count(GENESIS_ACCOUNT, "latest").await?, first + 3);
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "integration test - run with: cargo test -p sealkit-test -- --ignored"]
async fn unfinalized_block_can_be_finalized_later() -> Result<()> {
    common::init();
    with_node("Manual seal (finalize)", TransportKind::Http, finalize_later).await
}

async fn finalize_later(ctx: TestContext) -> Result<()> {
    let block = ctx.blocks().create_block_nowait(false).await?;
    assert!(block.aux.is_new_best);
    assert!(ctx.blocks().finalize_block(block.hash).await?);
    Ok(())
}
