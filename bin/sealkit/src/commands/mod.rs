pub mod call;
pub mod node;
pub mod seal;
pub mod txpool;

use call::CallCmd;
use clap::Subcommand;
use color_eyre::eyre::Result;
use node::NodeCmd;
use sealkit_rpc::RpcClient;
use seal::SealCmd;
use txpool::TxpoolCmd;
use url::Url;

pub(crate) const DEFAULT_RPC_URL: &str = "http://127.0.0.1:19932";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch a supervised dev node and keep it running until Ctrl-C
    Node(NodeCmd),
    /// Seal one or more blocks on demand
    Seal(SealCmd),
    /// Inspect the node's transaction pool
    #[command(arg_required_else_help = true)]
    Txpool(TxpoolCmd),
    /// Send a single JSON-RPC call and print the response envelope
    #[command(arg_required_else_help = true)]
    Call(CallCmd),
}

/// HTTP client, or a WebSocket client for `ws://` and `wss://` urls.
pub(crate) async fn connect(url: &Url) -> Result<RpcClient> {
    match url.scheme() {
        "ws" | "wss" => RpcClient::ws(url.clone()).await,
        _ => RpcClient::http(url.clone()),
    }
}
