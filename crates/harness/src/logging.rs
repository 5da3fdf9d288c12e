use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{FmtSubscriber, filter::EnvFilter, util::SubscriberInitExt};

use crate::config::{LogFormat, LogLevel};

/// Initialize logging.
///
/// Returns a drop guard responsible for flushing any remaining logs when the program terminates.
/// The guard must be assigned to a binding that is not _, as _ will result in the guard being
/// dropped immediately.
pub fn init(log_level: LogLevel, log_format: LogFormat) -> WorkerGuard {
    let filter = build_tracing_filter(log_level);

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());

    let builder = FmtSubscriber::builder()
        .with_target(true)
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(enable_ansi())
        .with_thread_ids(false);

    match log_format {
        LogFormat::Plaintext => builder.finish().init(),
        LogFormat::Json => builder.json().finish().init(),
    };

    guard
}

/// Logging for unit and scenario tests. Honors `RUST_LOG`, writes through the test capture and
/// may be called from every test.
pub fn init_test_logging() {
    let _ = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .finish()
        .try_init();
}

/// Check if both stdout and stderr are proper terminal (tty),
/// so that we know whether or not to enable colored output,
/// using ANSI escape codes.
pub fn enable_ansi() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

/// Common prefixes of the crates targeted by the default log level.
const TARGET_CRATES: &[&str] = &["sealkit", "sealkit_harness", "sealkit_node", "sealkit_rpc"];

/// Build a tracing directive setting the log level for the
/// crates to the given `log_level`.
pub fn default_directive(log_level: LogLevel) -> String {
    use itertools::Itertools;

    TARGET_CRATES.iter().map(|&c| format!("{c}={log_level}")).join(",")
}

/// `RUST_LOG` wins when set; otherwise the workspace crates log at `log_level` and everything
/// else at warn.
fn build_tracing_filter(log_level: LogLevel) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::WARN.into());
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.is_empty() => builder.parse_lossy(directives),
        _ => builder.parse_lossy(default_directive(log_level)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_workspace_crates() {
        assert_eq!(
            default_directive(LogLevel::Debug),
            "sealkit=debug,sealkit_harness=debug,sealkit_node=debug,sealkit_rpc=debug"
        );
    }
}
