//! sysloom-daemon binary entry point.
//!
//! Parses CLI arguments, loads configuration, initializes logging,
//! and runs the syslog server until SIGTERM or SIGINT.

use anyhow::Result;
use clap::Parser;

use sysloom_daemon::cli::DaemonCli;
use sysloom_daemon::logging;
use sysloom_daemon::orchestrator::{Orchestrator, load_config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    let config = load_config(&cli).await?;

    if cli.validate {
        println!("configuration is valid: {}", cli.config.display());
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    sysloom_core::metrics::describe_all();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "sysloom-daemon starting"
    );

    let mut orchestrator = Orchestrator::build_from_config(config)?;
    let messages = orchestrator.run().await?;

    tracing::info!(messages, "sysloom-daemon shut down");
    Ok(())
}
