//! Node-backed test contexts.
//!
//! A context owns one node process for its whole lifetime. [`with_node`] spawns it, waits for
//! readiness, hands the body a client with the `trace`, `debug` and `txpool` namespaces
//! installed, and stops the node exactly once afterwards, whether the body returned or panicked.

use std::{future::Future, panic::AssertUnwindSafe};

use futures::FutureExt;
use sealkit_node::{NodeProcess, launch};
use sealkit_rpc::{
    ExtendedClient, RpcClient, TransportKind,
    namespaces::{debug::DebugClient, trace::TraceClient, txpool::TxpoolClient},
};
use tracing::{Instrument, info, info_span};

use crate::{
    block::BlockProducer,
    config::HarnessConfig,
    error::{HarnessError, HarnessResult, fatal},
};

/// What a test body gets to work with.
#[derive(Clone, Debug)]
pub struct TestContext {
    client: ExtendedClient,
    blocks: BlockProducer,
}

impl TestContext {
    /// Installs the extra namespaces on `base` and wires block production to it.
    pub fn new(base: RpcClient, config: &HarnessConfig) -> Self {
        let blocks = BlockProducer::new(base.clone()).with_settle_delay(config.settle_delay);
        Self { client: ExtendedClient::with_tracing(base), blocks }
    }

    pub fn client(&self) -> &ExtendedClient {
        &self.client
    }

    pub fn blocks(&self) -> &BlockProducer {
        &self.blocks
    }

    pub fn trace(&self) -> HarnessResult<TraceClient<'_>> {
        self.client.trace().ok_or(HarnessError::MissingNamespace("trace"))
    }

    pub fn debug(&self) -> HarnessResult<DebugClient<'_>> {
        self.client.debug().ok_or(HarnessError::MissingNamespace("debug"))
    }

    pub fn txpool(&self) -> HarnessResult<TxpoolClient<'_>> {
        self.client.txpool().ok_or(HarnessError::MissingNamespace("txpool"))
    }
}

/// A live node paired with the context that talks to it.
#[derive(Debug)]
pub struct NodeFixture {
    process: NodeProcess,
    context: TestContext,
}

impl NodeFixture {
    /// Launches the node described by `config` and connects a client with the configured
    /// transport. Unlike [`with_node`], failures are returned instead of ending the run.
    pub async fn start(config: &HarnessConfig) -> HarnessResult<Self> {
        let process = launch(&config.node).await?;
        Self::attach(process, config).await
    }

    /// Connects to an already running process. The process is stopped if connecting fails.
    pub async fn attach(mut process: NodeProcess, config: &HarnessConfig) -> HarnessResult<Self> {
        match connect(&process, config).await {
            Ok(base) => Ok(Self { process, context: TestContext::new(base, config) }),
            Err(e) => {
                process.stop().await;
                Err(e)
            }
        }
    }

    pub fn context(&self) -> TestContext {
        self.context.clone()
    }

    pub fn process(&self) -> &NodeProcess {
        &self.process
    }

    /// Runs `body` and stops the node afterwards. A panic in `body` is re-raised once the
    /// node is down.
    pub async fn run<F, Fut, T>(mut self, body: F) -> T
    where
        F: FnOnce(TestContext) -> Fut,
        Fut: Future<Output = T>,
    {
        let outcome = AssertUnwindSafe(body(self.context())).catch_unwind().await;
        self.stop().await;
        match outcome {
            Ok(value) => value,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    pub async fn stop(&mut self) {
        self.process.stop().await;
    }
}

async fn connect(process: &NodeProcess, config: &HarnessConfig) -> HarnessResult<RpcClient> {
    let connect_error = |message: String| HarnessError::Connect {
        transport: config.transport,
        binary: process.binary().to_path_buf(),
        args: process.args().to_vec(),
        message,
    };

    let rpc_url = config.node.rpc_url()?;
    let ws_url = config.node.ws_url()?;
    RpcClient::connect(config.transport, rpc_url, ws_url)
        .await
        .map_err(|e| connect_error(format!("{e:#}")))
}

/// Runs `body` against a fresh node reached over `transport`, with node settings from the
/// environment.
///
/// A node that cannot be started ends the whole run with a non-zero exit status after printing
/// the command line and whatever the node logged.
pub async fn with_node<F, Fut, T>(title: &str, transport: TransportKind, body: F) -> T
where
    F: FnOnce(TestContext) -> Fut,
    Fut: Future<Output = T>,
{
    with_node_config(title, HarnessConfig::from_env().with_transport(transport), body).await
}

/// [`with_node`] with explicit settings.
pub async fn with_node_config<F, Fut, T>(title: &str, config: HarnessConfig, body: F) -> T
where
    F: FnOnce(TestContext) -> Fut,
    Fut: Future<Output = T>,
{
    let span = info_span!("with_node", title, transport = %config.transport);
    async move {
        info!("starting node");
        let fixture = match NodeFixture::start(&config).await {
            Ok(fixture) => fixture,
            Err(e) => fatal(e),
        };
        fixture.run(body).await
    }
    .instrument(span)
    .await
}
