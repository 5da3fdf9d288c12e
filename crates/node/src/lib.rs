//! Launches a manual-seal node and tells when it is ready to serve RPC calls.

pub mod config;
pub mod error;
pub mod readiness;
pub mod supervisor;

pub use config::{NodeConfig, WarmupConfig};
pub use error::{SupervisorError, command_report};
pub use readiness::{LogSubscription, ReadinessDetector, ReadinessFailure, ReadySignal, Resolution};
pub use supervisor::{NodeProcess, ProcessState, launch};
