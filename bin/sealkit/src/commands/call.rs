use clap::Parser;
use color_eyre::eyre::Result;
use serde_json::Value;
use url::Url;

use super::{DEFAULT_RPC_URL, connect};

#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CallCmd {
    /// JSON-RPC method, e.g. engine_createBlock
    method: String,
    /// Positional params; each is parsed as JSON and sent as a string otherwise
    params: Vec<String>,
    /// URL of the node's RPC endpoint (http or ws)
    #[clap(long, default_value = DEFAULT_RPC_URL)]
    rpc_url: Url,
    /// Request id to send
    #[clap(long, default_value = "1")]
    id: u64,
}

impl CallCmd {
    pub async fn run(&self) -> Result<()> {
        let client = connect(&self.rpc_url).await?;
        let params = self.params.iter().map(|p| parse_param(p)).collect();

        let response = client.send_with_id(self.id, &self.method, params).await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        Ok(())
    }
}

fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
