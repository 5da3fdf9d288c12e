use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use sealkit_rpc::ExtendedClient;
use url::Url;

use super::{DEFAULT_RPC_URL, connect};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxpoolQuery {
    /// Pending and queued counts
    Status,
    /// Full transactions by sender and nonce
    Content,
    /// One-line summaries by sender and nonce
    Inspect,
}

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TxpoolCmd {
    #[clap(value_enum)]
    query: TxpoolQuery,
    /// URL of the node's RPC endpoint (http or ws)
    #[clap(long, default_value = DEFAULT_RPC_URL)]
    rpc_url: Url,
}

impl TxpoolCmd {
    pub async fn run(&self) -> Result<()> {
        let client = ExtendedClient::with_tracing(connect(&self.rpc_url).await?);
        let txpool = client.txpool().ok_or_else(|| eyre!("txpool namespace not installed"))?;

        let out = match self.query {
            TxpoolQuery::Status => serde_json::to_string_pretty(&txpool.status().await?)?,
            TxpoolQuery::Content => serde_json::to_string_pretty(&txpool.content().await?)?,
            TxpoolQuery::Inspect => serde_json::to_string_pretty(&txpool.inspect().await?)?,
        };
        println!("{out}");
        Ok(())
    }
}
