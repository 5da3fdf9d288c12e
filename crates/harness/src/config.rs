#![allow(missing_docs)]
use std::{fmt, time::Duration};

use clap::ValueEnum;
use sealkit_node::NodeConfig;
use sealkit_rpc::TransportKind;
use serde::{Deserialize, Serialize};

/// Wait after a sealed block before the next step runs.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(level)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plaintext,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plaintext => f.write_str("plaintext"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Settings for one test context: how to launch the node and how to talk to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    pub node: NodeConfig,
    pub transport: TransportKind,
    pub settle_delay: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            transport: TransportKind::default(),
            settle_delay: SETTLE_DELAY,
        }
    }
}

impl HarnessConfig {
    /// Node settings from the environment, everything else at its default.
    pub fn from_env() -> Self {
        Self { node: NodeConfig::from_env(), ..Self::default() }
    }

    #[must_use]
    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }
}
