//! Logging initialization for sysloom-daemon.
//!
//! Configures `tracing-subscriber` based on the `[general]` section
//! of `SysloomConfig`. `RUST_LOG` wins over the configured level.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use sysloom_core::config::GeneralConfig;

/// Initialize the global tracing subscriber.
///
/// Must be called once, before the server starts. A second call fails
/// because a global subscriber is already set.
///
/// # Formats
///
/// * `"json"` - one JSON object per line
/// * `"pretty"` - multi-line human-readable output
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let env_filter = build_filter(&config.log_level);

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                config.log_format
            ));
        }
    }

    Ok(())
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
