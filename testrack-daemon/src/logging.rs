//! Logging initialization for testrack-daemon.
//!
//! Configures `tracing-subscriber` based on the `[general]` section
//! of `TestrackConfig`. Supports JSON structured logging and
//! human-readable pretty format.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use testrack_core::config::GeneralConfig;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before the server is built.
/// `RUST_LOG` takes precedence over `config.log_level`.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines (default)
/// * `"pretty"` - Human-readable colored output (for development)
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let fmt_layer = match config.log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().boxed(),
        "pretty" => tracing_subscriber::fmt::layer().pretty().boxed(),
        other => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                other
            ));
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_rejects_unknown_format() {
        // Given: A config with an unsupported log format
        let config = GeneralConfig {
            log_level: "info".to_string(),
            log_format: "xml".to_string(),
        };

        // When: Initializing tracing
        let result = init_tracing(&config);

        // Then: Should fail before touching the global subscriber
        let err = result.expect_err("unknown format should be rejected");
        assert!(err.to_string().contains("xml"));
    }
}
