#![allow(missing_docs)]

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use itertools::Itertools;
use sealkit_rpc::RpcError;
use thiserror::Error;

/// Fatal conditions that prevent the supervised node from coming up.
///
/// None of these are recoverable: without a live node no test can run. Each variant carries
/// enough context for [`SupervisorError::diagnostics`] to print a reproducible report.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Node binary not found at {}", binary.display())]
    MissingBinary { binary: PathBuf, args: Vec<String> },

    #[error("Failed to spawn node {}: {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        args: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("Node {} did not become ready within {timeout:?}", binary.display())]
    ReadinessTimeout { binary: PathBuf, args: Vec<String>, timeout: Duration, logs: String },

    #[error("Node {} exited before becoming ready", binary.display())]
    ExitedBeforeReady { binary: PathBuf, args: Vec<String>, logs: String },

    #[error("Node warmup call failed after {attempts} attempts: {source}")]
    Warmup {
        binary: PathBuf,
        args: Vec<String>,
        attempts: usize,
        #[source]
        source: RpcError,
    },

    #[error("Invalid node endpoint: {message}")]
    Endpoint { binary: PathBuf, args: Vec<String>, message: String },
}

impl SupervisorError {
    /// Process exit status used when a startup failure aborts the run.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Multi-line report: error, binary path, full argument list and the buffered output.
    pub fn diagnostics(&self) -> String {
        let mut out = format!("{self}\n");
        match self {
            Self::MissingBinary { binary, args } |
            Self::Spawn { binary, args, .. } |
            Self::Warmup { binary, args, .. } |
            Self::Endpoint { binary, args, .. } => {
                out.push_str(&command_report(binary, args));
            }
            Self::ReadinessTimeout { binary, args, logs, .. } |
            Self::ExitedBeforeReady { binary, args, logs } => {
                out.push_str(&command_report(binary, args));
                out.push_str("Logs:\n");
                out.push_str(logs);
                if !logs.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Output the node produced before failing, if any was captured.
    pub fn logs(&self) -> Option<&str> {
        match self {
            Self::ReadinessTimeout { logs, .. } | Self::ExitedBeforeReady { logs, .. } => {
                Some(logs)
            }
            _ => None,
        }
    }
}

/// The `Binary:` and `Args:` lines of a startup report.
pub fn command_report(binary: &Path, args: &[String]) -> String {
    format!("Binary: {}\nArgs: {}\n", binary.display(), args.iter().join(" "))
}
