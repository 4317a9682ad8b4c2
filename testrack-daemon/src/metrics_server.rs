//! Prometheus scrape endpoint.
//!
//! The exporter runs its own HTTP listener on `[metrics] listen_addr:port`,
//! separate from the API listener and outside Basic auth. Installing it
//! replaces the no-op recorder, so every `metrics::*!` call in the registry
//! and API crates starts recording.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use testrack_core::config::MetricsConfig;
use testrack_core::metrics as m;

/// Resolve the exporter's socket address from the `[metrics]` section.
///
/// `listen_addr` must be a literal IP (v4 or v6, no brackets). Only the
/// `/metrics` path is served by the built-in listener.
pub fn scrape_addr(config: &MetricsConfig) -> Result<SocketAddr> {
    anyhow::ensure!(
        config.endpoint == "/metrics",
        "unsupported metrics endpoint '{}': the exporter only serves '/metrics'",
        config.endpoint
    );

    let ip: IpAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid metrics listen_addr '{}'", config.listen_addr))?;
    Ok(SocketAddr::new(ip, config.port))
}

/// Install the global recorder and start the scrape listener.
///
/// Call at most once per process; a second install fails. The request
/// latency histogram uses [`m::REQUEST_DURATION_BUCKETS`] instead of a summary.
pub fn install_metrics_recorder(config: &MetricsConfig) -> Result<()> {
    let addr = scrape_addr(config)?;

    if addr.ip().is_unspecified() {
        tracing::warn!(
            listen_addr = %addr,
            "metrics are served unauthenticated on every interface"
        );
    }

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full(m::HTTP_REQUEST_DURATION_SECONDS.to_owned()),
            &m::REQUEST_DURATION_BUCKETS,
        )
        .context("invalid request duration buckets")?
        .install()
        .with_context(|| format!("failed to start Prometheus exporter on {addr}"))?;

    m::describe_all();
    tracing::info!(listen_addr = %addr, endpoint = "/metrics", "Prometheus exporter listening");
    Ok(())
}
