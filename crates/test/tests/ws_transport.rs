//! The same node reached over WebSocket.

mod common;

use color_eyre::eyre::Result;
use sealkit_harness::{TestContext, TransportKind, with_node};
use sealkit_test::CHAIN_ID;
use serde_json::json;
use serial_test::serial;

#[tokio::test]
#[serial]
#[ignore = "integration test - run with: cargo test -p sealkit-test -- --ignored"]
async fn ws_client_seals_and_reads() -> Result<()> {
    common::init();
    with_node("Manual seal over WebSocket", TransportKind::Ws, seal_over_ws).await
}

async fn seal_over_ws(ctx: TestContext) -> Result<()> {
    let eth = ctx.client().eth();
    assert_eq!(eth.chain_id().await?, CHAIN_ID);

    let before = eth.block_number().await?;
    ctx.blocks().create_block(true).await?;
    assert_eq!(eth.block_number().await?, before + 1);

    // Protocol errors come back untouched.
    let resp = ctx.client().send_with_id(42, "eth_notAMethod", vec![json!(1)]).await?;
    assert_eq!(resp.id, 42);
    let err = resp.error.expect("unknown method must fail");
    assert_eq!(err.code, -32601);
    Ok(())
}
