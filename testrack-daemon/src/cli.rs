//! CLI argument definitions for testrack-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.
//! Flags override the config file and `TESTRACK_*` environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use testrack_core::config::TestrackConfig;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "testrack.toml";

/// testrack test-results server.
///
/// Serves the reference catalogs, descriptor registry, test environments
/// and job lifecycle over an authenticated REST API.
#[derive(Parser, Debug)]
#[command(name = "testrack-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to testrack.toml.
    ///
    /// When omitted, `./testrack.toml` is used if present, otherwise built-in defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    #[arg(long)]
    pub log_format: Option<String>,

    /// Override the API listen address, e.g. `0.0.0.0:8000`.
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

impl DaemonCli {
    /// Resolve the effective configuration.
    ///
    /// File (or defaults), then environment overrides, then CLI flags,
    /// then validation.
    ///
    /// # Errors
    ///
    /// - An explicit `--config` path that does not exist or fails to parse
    /// - A malformed `--listen` value
    /// - Validation failure of the merged result
    pub async fn load_config(&self) -> Result<TestrackConfig> {
        let mut config = match &self.config {
            Some(path) => TestrackConfig::from_file(path)
                .await
                .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                TestrackConfig::from_file(DEFAULT_CONFIG_PATH)
                    .await
                    .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?
            }
            None => TestrackConfig::default(),
        };

        config.apply_env_overrides();
        self.apply_overrides(&mut config)?;

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;
        Ok(config)
    }

    /// Apply CLI flags on top of an already-loaded configuration.
    pub fn apply_overrides(&self, config: &mut TestrackConfig) -> Result<()> {
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.general.log_format = format.clone();
        }
        if let Some(listen) = &self.listen {
            let addr: SocketAddr = listen
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid --listen '{}': {}", listen, e))?;
            config.server.listen_addr = addr.ip().to_string();
            config.server.port = addr.port();
        }
        Ok(())
    }
}
