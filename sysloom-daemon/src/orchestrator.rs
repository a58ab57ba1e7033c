//! Server orchestration -- configuration loading, queue wiring, and lifecycle management.
//!
//! The [`Orchestrator`] is the central coordinator of `sysloom-daemon`.
//! It owns the [`SyslogServer`] and the receiving end of its output queue,
//! drives the listener alongside the queue consumer, and logs every decoded
//! message.
//!
//! # Shutdown Order
//!
//! 1. Ask the server to stop (no new datagrams accepted)
//! 2. Keep consuming the queue until `listen()` returns, so in-flight
//!    decode tasks never block on a full queue
//! 3. Drain whatever is still buffered in the queue

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use sysloom_core::config::SysloomConfig;
use sysloom_syslog::{Message, ServerConfig, SyslogServer};

use crate::cli::DaemonCli;

/// Load configuration for the daemon.
///
/// Reads the file named by `--config` when it exists and falls back to
/// built-in defaults otherwise. Environment variables are applied next,
/// then command-line overrides, then the result is validated.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or the final
/// configuration is invalid.
pub async fn load_config(cli: &DaemonCli) -> Result<SysloomConfig> {
    let mut config = if cli.config.exists() {
        SysloomConfig::load(&cli.config)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?
    } else {
        tracing::debug!(
            path = %cli.config.display(),
            "config file not found, using defaults"
        );
        let mut config = SysloomConfig::default();
        config.apply_env_overrides();
        config
    };

    apply_cli_overrides(&mut config, cli);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
    Ok(config)
}

fn apply_cli_overrides(config: &mut SysloomConfig, cli: &DaemonCli) {
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = &cli.log_level {
        config.general.log_level.clone_from(level);
    }
    if let Some(format) = &cli.log_format {
        config.general.log_format.clone_from(format);
    }
}

/// The main daemon orchestrator.
pub struct Orchestrator {
    /// Loaded and validated configuration.
    config: SysloomConfig,
    /// Shared so callers can query or stop it while `run` is active.
    server: Arc<SyslogServer>,
    /// Output queue of the server. Taken by the first `run`.
    rx: Option<mpsc::Receiver<Message>>,
}

impl Orchestrator {
    /// Load configuration from `config_path` and build the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub async fn build(config_path: &Path) -> Result<Self> {
        let config = SysloomConfig::load(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
        Self::build_from_config(config)
    }

    /// Build the orchestrator from an already-loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the `[server]` section cannot be converted into
    /// a [`ServerConfig`] (for example an unparsable bind address).
    pub fn build_from_config(config: SysloomConfig) -> Result<Self> {
        let server_config = ServerConfig::from_core(&config.server)
            .map_err(|e| anyhow::anyhow!("invalid server config: {}", e))?;

        let (tx, rx) = mpsc::channel(config.server.queue_capacity);
        let server = Arc::new(SyslogServer::new(server_config, tx));

        tracing::info!(
            bind_addr = %config.server.bind_addr,
            port = config.server.port,
            max_message_size = config.server.max_message_size,
            queue_capacity = config.server.queue_capacity,
            "orchestrator built"
        );

        Ok(Self {
            config,
            server,
            rx: Some(rx),
        })
    }

    /// Start the server and log messages until SIGTERM or SIGINT.
    pub async fn run(&mut self) -> Result<u64> {
        self.run_until(wait_for_shutdown_signal()).await
    }

    /// Start the server and log messages until `shutdown` resolves.
    ///
    /// Returns the number of messages consumed from the queue. Returns early
    /// with an error when the listener fails (for example, the port is taken).
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails, the shutdown future fails,
    /// or the orchestrator has already run.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<u64>
    where
        F: Future<Output = Result<&'static str>>,
    {
        let mut rx = self
            .rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("orchestrator has already run"))?;

        let server = Arc::clone(&self.server);
        let listener = server.listen();
        tokio::pin!(listener);
        tokio::pin!(shutdown);

        let mut consumed = 0u64;
        let mut finished = None;
        let mut signal_error = None;

        // The listener is polled first so the server is already running
        // by the time a shutdown can be observed.
        tracing::info!("entering main event loop");
        loop {
            tokio::select! {
                biased;
                result = &mut listener => {
                    finished = Some(result);
                    break;
                }
                Some(message) = rx.recv() => {
                    log_message(&message);
                    consumed += 1;
                }
                signal = &mut shutdown => {
                    match signal {
                        Ok(name) => tracing::info!(signal = name, "shutdown signal received"),
                        Err(e) => signal_error = Some(e),
                    }
                    break;
                }
            }
        }

        let result = match finished {
            Some(result) => result,
            None => {
                server.stop();
                loop {
                    tokio::select! {
                        biased;
                        result = &mut listener => break result,
                        Some(message) = rx.recv() => {
                            log_message(&message);
                            consumed += 1;
                        }
                    }
                }
            }
        };

        while let Ok(message) = rx.try_recv() {
            log_message(&message);
            consumed += 1;
        }

        result.map_err(|e| anyhow::anyhow!("syslog server failed: {}", e))?;
        if let Some(e) = signal_error {
            return Err(e);
        }

        tracing::info!(messages = consumed, "server stopped");
        Ok(consumed)
    }

    /// The managed syslog server.
    pub fn server(&self) -> &Arc<SyslogServer> {
        &self.server
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &SysloomConfig {
        &self.config
    }
}

fn log_message(message: &Message) {
    let source = message
        .source()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default();

    if let Some(error) = message.error() {
        tracing::warn!(
            source = %source,
            error = %error,
            raw = %message.raw(),
            "undecodable syslog message"
        );
        return;
    }

    tracing::info!(
        source = %source,
        format = %message.format(),
        priority = message.priority(),
        facility = ?message.facility(),
        severity = ?message.severity(),
        hostname = message.hostname(),
        application = message.application(),
        process_id = message.process_id(),
        message_id = message.message_id(),
        content = message.content(),
        "syslog message"
    );
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_overrides_replace_config_values() {
        let cli = DaemonCli::parse_from([
            "sysloom-daemon",
            "--port",
            "5514",
            "--log-level",
            "debug",
            "--log-format",
            "pretty",
        ]);
        let mut config = SysloomConfig::default();
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.server.port, 5514);
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, "pretty");
    }

    #[test]
    fn absent_cli_overrides_keep_config_values() {
        let cli = DaemonCli::parse_from(["sysloom-daemon"]);
        let mut config = SysloomConfig::default();
        config.server.port = 1514;
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.server.port, 1514);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn unparsable_bind_addr_fails_build() {
        let mut config = SysloomConfig::default();
        config.server.bind_addr = "not-an-ip".to_owned();
        assert!(Orchestrator::build_from_config(config).is_err());
    }

    #[tokio::test]
    async fn second_run_is_rejected() {
        let mut config = SysloomConfig::default();
        config.server.bind_addr = "127.0.0.1".to_owned();
        config.server.port = 0;
        let mut orchestrator = Orchestrator::build_from_config(config).unwrap();

        orchestrator
            .run_until(async { Ok("test") })
            .await
            .expect("first run");
        let err = orchestrator.run_until(async { Ok("test") }).await;
        assert!(err.is_err());
    }
}
