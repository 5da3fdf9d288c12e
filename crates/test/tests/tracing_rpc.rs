//! `trace_*` and `debug_*` namespaces against a live node.

mod common;

use color_eyre::eyre::Result;
use sealkit_harness::{TestContext, TransportKind, with_node};
use sealkit_test::{genesis_signer, send_transfer};
use serde_json::{Value, json};
use serial_test::serial;

#[tokio::test]
#[serial]
#[ignore = "integration test - run with: cargo test -p sealkit-test -- --ignored"]
async fn trace_and_debug_namespaces_answer() -> Result<()> {
    common::init();
    with_node("Trace and debug RPC", TransportKind::Http, trace_transfer).await
}

async fn trace_transfer(ctx: TestContext) -> Result<()> {
    let signer = genesis_signer()?;
    let hash = send_transfer(ctx.client(), &signer, 0).await?;
    ctx.blocks().create_block(true).await?;

    let traces = ctx.trace()?.transaction(hash).await?;
    assert!(traces.is_array(), "{traces}");

    let block_traces = ctx.trace()?.block("latest").await?;
    assert!(block_traces.is_array());

    let debug = ctx.debug()?.trace_transaction(hash, None).await?;
    assert!(debug.is_object(), "{debug}");

    // The dynamic path goes through the same method table.
    let raw = ctx
        .client()
        .namespace("debug")
        .expect("debug namespace installed")
        .send("traceTransaction", vec![json!(hash)])
        .await?;
    assert!(raw.error.is_none());
    assert_ne!(raw.result, Some(Value::Null));
    Ok(())
}
