#![allow(missing_docs)]

use std::path::PathBuf;

use sealkit_node::{SupervisorError, command_report};
use sealkit_rpc::{JsonRpcResponse, RpcError, TransportKind};
use thiserror::Error;

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    /// The node answered the seal request without producing a block.
    #[error("Unexpected result: {response}")]
    BlockNotProduced { response: String },

    #[error("Failed to connect {transport} client: {message}")]
    Connect { transport: TransportKind, binary: PathBuf, args: Vec<String>, message: String },

    #[error("Namespace {0} is not installed on this client")]
    MissingNamespace(&'static str),
}

impl HarnessError {
    pub(crate) fn block_not_produced(response: &JsonRpcResponse) -> Self {
        let response = serde_json::to_string(response).unwrap_or_else(|_| format!("{response:?}"));
        Self::BlockNotProduced { response }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Supervisor(e) => e.exit_code(),
            _ => 1,
        }
    }

    pub fn diagnostics(&self) -> String {
        match self {
            Self::Supervisor(e) => e.diagnostics(),
            Self::Connect { binary, args, .. } => format!("{self}\n{}", command_report(binary, args)),
            other => format!("{other}\n"),
        }
    }
}

/// Prints `err` with its diagnostics to stderr and terminates the run.
///
/// Used for startup failures: no test can run without a live node.
pub fn fatal(err: impl Into<HarnessError>) -> ! {
    let err = err.into();
    let report = err.diagnostics();
    if crate::logging::enable_ansi() {
        eprint!("\x1b[31m{report}\x1b[0m");
    } else {
        eprint!("{report}");
    }
    tracing::error!(error = %err, "fatal harness error");
    std::process::exit(err.exit_code())
}
