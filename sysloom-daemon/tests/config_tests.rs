//! Configuration loading tests for sysloom-daemon.

use std::io::Write;

use clap::Parser;
use serial_test::serial;
use tempfile::NamedTempFile;

use sysloom_daemon::cli::DaemonCli;
use sysloom_daemon::orchestrator::load_config;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("failed to write config");
    file
}

fn cli(args: &[&str]) -> DaemonCli {
    let mut argv = vec!["sysloom-daemon"];
    argv.extend_from_slice(args);
    DaemonCli::parse_from(argv)
}

#[tokio::test]
#[serial]
async fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let config = load_config(&cli(&["--config", path.to_str().unwrap()]))
        .await
        .expect("defaults should be valid");

    assert_eq!(config.server.port, 514);
    assert_eq!(config.server.bind_addr, "0.0.0.0");
    assert_eq!(config.general.log_format, "json");
}

#[tokio::test]
#[serial]
async fn file_values_are_loaded() {
    let file = write_config(
        r#"
[general]
log_level = "debug"

[server]
bind_addr = "127.0.0.1"
port = 5514
max_message_size = 2048
"#,
    );
    let config = load_config(&cli(&["--config", file.path().to_str().unwrap()]))
        .await
        .expect("valid config");

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.server.bind_addr, "127.0.0.1");
    assert_eq!(config.server.port, 5514);
    assert_eq!(config.server.max_message_size, 2048);
}

#[tokio::test]
#[serial]
async fn cli_port_overrides_file() {
    let file = write_config("[server]\nport = 5514\n");
    let config = load_config(&cli(&[
        "--config",
        file.path().to_str().unwrap(),
        "--port",
        "6514",
    ]))
    .await
    .unwrap();

    assert_eq!(config.server.port, 6514);
}

#[tokio::test]
#[serial]
async fn cli_overrides_environment() {
    let original = std::env::var("SYSLOOM_GENERAL_LOG_LEVEL").ok();
    // SAFETY: serialized by serial_test
    unsafe {
        std::env::set_var("SYSLOOM_GENERAL_LOG_LEVEL", "warn");
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let from_env = load_config(&cli(&["--config", path.to_str().unwrap()])).await;
    let from_cli = load_config(&cli(&[
        "--config",
        path.to_str().unwrap(),
        "--log-level",
        "error",
    ]))
    .await;

    // SAFETY: test cleanup
    unsafe {
        match original {
            Some(val) => std::env::set_var("SYSLOOM_GENERAL_LOG_LEVEL", val),
            None => std::env::remove_var("SYSLOOM_GENERAL_LOG_LEVEL"),
        }
    }

    assert_eq!(from_env.unwrap().general.log_level, "warn");
    assert_eq!(from_cli.unwrap().general.log_level, "error");
}

#[tokio::test]
#[serial]
async fn invalid_cli_log_level_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let result = load_config(&cli(&[
        "--config",
        path.to_str().unwrap(),
        "--log-level",
        "verbose",
    ]))
    .await;

    assert!(result.is_err());
}

#[tokio::test]
#[serial]
async fn malformed_file_is_rejected() {
    let file = write_config("[server\nport = ");
    let result = load_config(&cli(&["--config", file.path().to_str().unwrap()])).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("failed to load config"));
}

#[tokio::test]
#[serial]
async fn out_of_range_max_message_size_is_rejected() {
    let file = write_config("[server]\nmax_message_size = 70000\n");
    let result = load_config(&cli(&["--config", file.path().to_str().unwrap()])).await;

    assert!(result.is_err());
}
