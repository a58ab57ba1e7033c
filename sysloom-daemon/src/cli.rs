//! CLI argument definitions for sysloom-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// sysloom syslog ingestion daemon.
///
/// Listens for syslog datagrams, decodes them (RFC 5424, RFC 3164 or
/// plain `<PRI>content`) and logs each decoded message.
#[derive(Parser, Debug)]
#[command(name = "sysloom-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to sysloom.toml configuration file.
    ///
    /// Built-in defaults are used when the file does not exist.
    #[arg(short, long, default_value = "sysloom.toml")]
    pub config: PathBuf,

    /// Override the UDP listen port (0 lets the OS choose).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,
}
