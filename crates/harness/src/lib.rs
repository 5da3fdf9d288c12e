//! Deterministic test harness for manual-seal nodes: block production control and
//! node-backed test contexts.

pub mod block;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;

pub use block::BlockProducer;
pub use config::{HarnessConfig, LogFormat, LogLevel, SETTLE_DELAY};
pub use context::{NodeFixture, TestContext, with_node, with_node_config};
pub use error::{HarnessError, HarnessResult, fatal};
pub use sealkit_rpc::TransportKind;
