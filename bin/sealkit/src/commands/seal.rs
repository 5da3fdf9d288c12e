use std::time::Duration;

use clap::{ArgAction, Parser};
use color_eyre::eyre::Result;
use sealkit_harness::BlockProducer;
use tracing::info;
use url::Url;

use super::{DEFAULT_RPC_URL, connect};

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SealCmd {
    /// URL of the node's RPC endpoint (http or ws)
    #[clap(long, default_value = DEFAULT_RPC_URL)]
    rpc_url: Url,
    /// Number of blocks to seal
    #[clap(short, long, default_value = "1")]
    count: u64,
    /// Finalize each block as it is sealed
    #[clap(long, default_value_t = true, action = ArgAction::Set)]
    finalize: bool,
    /// Refuse to seal when the pool is empty
    #[clap(long)]
    no_empty: bool,
    /// Wait after each block, in milliseconds
    #[clap(long, default_value = "500")]
    settle_ms: u64,
}

impl SealCmd {
    pub async fn run(&self) -> Result<()> {
        let client = connect(&self.rpc_url).await?;
        let producer =
            BlockProducer::new(client).with_settle_delay(Duration::from_millis(self.settle_ms));

        for n in 1..=self.count {
            let block = producer.create_block_with(!self.no_empty, self.finalize, None).await?;
            info!(n, hash = %block.hash, new_best = block.aux.is_new_best, "sealed block");
            println!("{:#x}", block.hash);
        }
        Ok(())
    }
}
