//! `txpool_*` against a live node: nonce-gapped transactions wait in the queued set.

mod common;

use color_eyre::eyre::Result;
use sealkit_harness::{TestContext, TransportKind, with_node};
use sealkit_test::{GENESIS_ACCOUNT, genesis_signer, send_transfer};
use serial_test::serial;

#[tokio::test]
#[serial]
#[ignore = "integration test - run with: cargo test -p sealkit-test -- --ignored"]
async fn txpool_splits_pending_and_queued() -> Result<()> {
    common::init();
    with_node("Txpool RPC", TransportKind::Http, pending_and_queued).await
}

async fn pending_and_queued(ctx: TestContext) -> Result<()> {
    let signer = genesis_signer()?;
    let txpool = ctx.txpool()?;

    let empty = txpool.content().await?;
    assert!(empty.is_empty());

    // Nonces 0 and 1 are executable, 3 waits for the missing 2.
    for nonce in [0, 1, 3] {
        send_transfer(ctx.client(), &signer, nonce).await?;
    }

    let content = txpool.content().await?;
    assert_eq!(content.pending_nonces(&GENESIS_ACCOUNT), vec![0, 1]);
    assert_eq!(content.queued_nonces(&GENESIS_ACCOUNT), vec![3]);

    let status = txpool.status().await?;
    assert_eq!((status.pending, status.queued), (2, 1));

    let inspect = txpool.inspect().await?;
    let summary = &inspect.pending[&GENESIS_ACCOUNT]["0x0"];
    assert!(summary.contains(" wei + ") && summary.contains(" gas x "), "{summary}");

    ctx.blocks().create_block(true).await?;
    let content = txpool.content().await?;
    assert!(content.pending_nonces(&GENESIS_ACCOUNT).is_empty());
    assert_eq!(content.queued_nonces(&GENESIS_ACCOUNT), vec![3]);
    Ok(())
}
