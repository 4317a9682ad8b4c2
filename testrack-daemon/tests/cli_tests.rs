//! CLI parsing and config resolution tests.

use std::io::Write;

use clap::Parser;
use serial_test::serial;
use testrack_daemon::cli::DaemonCli;

#[test]
fn test_parse_no_arguments_uses_defaults() {
    // Given: No CLI arguments
    // When: Parsing
    let cli = DaemonCli::try_parse_from(["testrack-daemon"]).expect("should parse");

    // Then: Every override is absent
    assert!(cli.config.is_none());
    assert!(cli.log_level.is_none());
    assert!(cli.log_format.is_none());
    assert!(cli.listen.is_none());
    assert!(!cli.validate);
}

#[test]
fn test_parse_all_flags() {
    // Given: Every supported flag
    let args = [
        "testrack-daemon",
        "--config",
        "/etc/testrack/testrack.toml",
        "--log-level",
        "debug",
        "--log-format",
        "pretty",
        "--listen",
        "0.0.0.0:8000",
        "--validate",
    ];

    // When: Parsing
    let cli = DaemonCli::try_parse_from(args).expect("should parse");

    // Then: Values land in the matching fields
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/etc/testrack/testrack.toml"))
    );
    assert_eq!(cli.log_level.as_deref(), Some("debug"));
    assert_eq!(cli.log_format.as_deref(), Some("pretty"));
    assert_eq!(cli.listen.as_deref(), Some("0.0.0.0:8000"));
    assert!(cli.validate);
}

#[test]
fn test_parse_rejects_unknown_flag() {
    let result = DaemonCli::try_parse_from(["testrack-daemon", "--pid-file", "/tmp/x.pid"]);
    assert!(result.is_err(), "unknown flag should be rejected");
}

#[tokio::test]
#[serial]
async fn test_load_config_cli_overrides_file() {
    // Given: A config file and CLI flags that disagree
    let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
    writeln!(
        file,
        "[general]\nlog_level = \"warn\"\n\n[server]\nport = 8100\n"
    )
    .expect("should write config");

    let path = file.path().to_str().expect("utf-8 path").to_owned();
    let cli = DaemonCli::try_parse_from([
        "testrack-daemon",
        "--config",
        path.as_str(),
        "--log-level",
        "debug",
        "--listen",
        "127.0.0.1:8200",
    ])
    .expect("should parse");

    // When: Resolving the effective config
    let config = cli.load_config().await.expect("config should load");

    // Then: CLI wins over file
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.server.port, 8200);
    // Untouched values come from defaults
    assert_eq!(config.server.page_size, 50);
}

#[tokio::test]
#[serial]
async fn test_load_config_env_overrides_file_but_not_cli() {
    // Given: File, env var and CLI flag for different fields
    let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
    writeln!(file, "[server]\nport = 8100\npage_size = 20\n").expect("should write config");
    let path = file.path().to_str().expect("utf-8 path").to_owned();

    // SAFETY: serialized with other env-mutating tests
    unsafe {
        std::env::set_var("TESTRACK_SERVER_PAGE_SIZE", "25");
        std::env::set_var("TESTRACK_SERVER_PORT", "8300");
    }

    let cli = DaemonCli::try_parse_from([
        "testrack-daemon",
        "--config",
        path.as_str(),
        "--listen",
        "127.0.0.1:8400",
    ])
    .expect("should parse");

    // When: Resolving
    let result = cli.load_config().await;

    unsafe {
        std::env::remove_var("TESTRACK_SERVER_PAGE_SIZE");
        std::env::remove_var("TESTRACK_SERVER_PORT");
    }

    // Then: env beats file, CLI beats env
    let config = result.expect("config should load");
    assert_eq!(config.server.page_size, 25);
    assert_eq!(config.server.port, 8400);
}

#[tokio::test]
#[serial]
async fn test_load_config_cli_can_repair_invalid_file_value() {
    // Given: A file whose port alone would fail validation
    let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
    writeln!(file, "[server]\nport = 0\n").expect("should write config");
    let path = file.path().to_str().expect("utf-8 path").to_owned();

    let cli = DaemonCli::try_parse_from([
        "testrack-daemon",
        "--config",
        path.as_str(),
        "--listen",
        "127.0.0.1:8500",
    ])
    .expect("should parse");

    // When: Resolving
    let config = cli.load_config().await.expect("merged config should be valid");

    // Then: Validation saw the overridden port
    assert_eq!(config.server.port, 8500);
}

#[tokio::test]
#[serial]
async fn test_load_config_missing_explicit_file_fails() {
    let cli = DaemonCli::try_parse_from([
        "testrack-daemon",
        "--config",
        "/nonexistent/testrack.toml",
    ])
    .expect("should parse");

    let result = cli.load_config().await;

    assert!(result.is_err(), "explicit missing config should fail");
}

#[tokio::test]
#[serial]
async fn test_load_config_rejects_invalid_cli_log_level() {
    // Given: Defaults plus an invalid level flag
    let cli = DaemonCli::try_parse_from(["testrack-daemon", "--log-level", "verbose"])
        .expect("should parse");

    // When: Resolving
    let result = cli.load_config().await;

    // Then: Validation runs after overrides
    let err = result.expect_err("invalid level should fail validation");
    assert!(err.to_string().contains("log_level"), "got: {err}");
}
