use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use sealkit_harness::fatal;
use sealkit_node::{NodeConfig, launch};
use tracing::info;

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct NodeCmd {
    /// Node binary (defaults to SEALKIT_NODE_BINARY, then ../target/$FRONTIER_BUILD/amax-eva)
    #[clap(long)]
    binary: Option<PathBuf>,
    /// Echo node output to the log
    #[clap(long)]
    display_log: bool,
    /// Skip the eth_chainId warmup after the node reports ready
    #[clap(long)]
    no_warmup: bool,
}

impl NodeCmd {
    pub async fn run(&self) -> Result<()> {
        let mut config = NodeConfig::from_env();
        if let Some(binary) = &self.binary {
            config.binary = binary.clone();
        }
        config.display_log |= self.display_log;
        config.warmup.enabled = !self.no_warmup;

        let mut process = match launch(&config).await {
            Ok(process) => process,
            Err(e) => fatal(e),
        };

        info!(rpc = %config.rpc_url()?, ws = %config.ws_url()?, "node running, press Ctrl-C to stop");
        let signal = tokio::signal::ctrl_c().await;
        process.stop().await;
        Ok(signal?)
    }
}
