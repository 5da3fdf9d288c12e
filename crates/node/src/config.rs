#![allow(missing_docs)]
use std::{path::PathBuf, time::Duration};

use url::Url;

use crate::error::SupervisorError;

pub const NODE_BINARY_NAME: &str = "amax-eva";

/// Line the node prints once its manual-seal RPC surface accepts calls.
pub const READY_SENTINEL: &str = "Manual Seal Ready";

pub const P2P_PORT: u16 = 19931;
pub const RPC_PORT: u16 = 19932;
pub const WS_PORT: u16 = 19933;

/// Total time budget for bringing a node up.
pub const SPAWNING_TIME: Duration = Duration::from_secs(60);

/// Slack kept between the readiness timeout and [`SPAWNING_TIME`] for teardown and reporting.
const TIMEOUT_MARGIN: Duration = Duration::from_secs(2);

pub const LOG_ENV: &str = "FRONTIER_LOG";
pub const BUILD_ENV: &str = "FRONTIER_BUILD";
pub const BINARY_ENV: &str = "SEALKIT_NODE_BINARY";

const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_BUILD: &str = "release";
const LOCALHOST: &str = "127.0.0.1";

/// Bounded `eth_chainId` polling issued once the node reports ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupConfig {
    pub enabled: bool,
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self { enabled: true, max_attempts: 10, delay: Duration::from_millis(200) }
    }
}

/// Everything needed to launch one supervised node. Read once, never re-read mid-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub binary: PathBuf,
    /// Echo node output to the log, and keep buffering it after readiness.
    pub display_log: bool,
    /// Value for the node's `-l` flag.
    pub log_filter: String,
    pub p2p_port: u16,
    pub rpc_port: u16,
    pub ws_port: u16,
    pub spawning_time: Duration,
    pub sentinel: String,
    pub warmup: WarmupConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(DEFAULT_BUILD),
            display_log: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            p2p_port: P2P_PORT,
            rpc_port: RPC_PORT,
            ws_port: WS_PORT,
            spawning_time: SPAWNING_TIME,
            sentinel: READY_SENTINEL.to_string(),
            warmup: WarmupConfig::default(),
        }
    }
}

fn default_binary(build: &str) -> PathBuf {
    PathBuf::from("..").join("target").join(build).join(NODE_BINARY_NAME)
}

impl NodeConfig {
    /// Reads `FRONTIER_LOG`, `FRONTIER_BUILD` and `SEALKIT_NODE_BINARY` from the environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`NodeConfig::from_env`] with an arbitrary variable source. Empty values count as
    /// unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let log = var(LOG_ENV);
        let build = var(BUILD_ENV).unwrap_or_else(|| DEFAULT_BUILD.to_string());
        let binary = var(BINARY_ENV).map(PathBuf::from).unwrap_or_else(|| default_binary(&build));

        Self {
            binary,
            display_log: log.is_some(),
            log_filter: log.unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            ..Self::default()
        }
    }

    /// How long to wait for the sentinel.
    pub fn readiness_timeout(&self) -> Duration {
        self.spawning_time.saturating_sub(TIMEOUT_MARGIN)
    }

    /// The fixed flag set: dev chain, manual sealing as a forced authoring validator, no
    /// telemetry or finality gadget, external RPC/WS, and the extra `trace`, `txpool` and
    /// `debug` APIs on a throwaway database.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "--chain=dev",
            "--validator",
            "--execution=Native",
            "--no-telemetry",
            "--no-prometheus",
            "--sealing=Manual",
            "--unsafe-ws-external",
            "--unsafe-rpc-external",
            "--no-grandpa",
            "--force-authoring",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        args.push(format!("-l{}", self.log_filter));
        args.push(format!("--port={}", self.p2p_port));
        args.push(format!("--rpc-port={}", self.rpc_port));
        args.push(format!("--ws-port={}", self.ws_port));
        for api in ["trace", "txpool", "debug"] {
            args.push("--ethapi".to_string());
            args.push(api.to_string());
        }
        args.push("--tmp".to_string());
        args
    }

    pub fn rpc_url(&self) -> Result<Url, SupervisorError> {
        self.endpoint("http", self.rpc_port)
    }

    pub fn ws_url(&self) -> Result<Url, SupervisorError> {
        self.endpoint("ws", self.ws_port)
    }

    fn endpoint(&self, scheme: &str, port: u16) -> Result<Url, SupervisorError> {
        let raw = format!("{scheme}://{LOCALHOST}:{port}");
        Url::parse(&raw).map_err(|e| SupervisorError::Endpoint {
            binary: self.binary.clone(),
            args: self.args(),
            message: format!("{raw}: {e}"),
        })
    }
}
