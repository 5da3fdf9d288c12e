use clap::Parser;
use color_eyre::eyre::Result;
use sealkit_harness::{LogFormat, LogLevel, logging};
use tracing::trace;

mod commands;

use commands::Commands;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level for the sealkit crates (overridden by RUST_LOG)
    #[clap(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
    /// Log output format
    #[clap(long, global = true, value_enum, default_value_t = LogFormat::Plaintext)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Flushes buffered log lines on exit; must outlive the command.
    let _guard = logging::init(cli.log_level, cli.log_format);

    trace!("Command-line parameters: {cli:?}");

    match cli.command {
        Commands::Node(cmd) => cmd.run().await,
        Commands::Seal(cmd) => cmd.run().await,
        Commands::Txpool(cmd) => cmd.run().await,
        Commands::Call(cmd) => cmd.run().await,
    }
}
