//! Server assembly and lifecycle management.
//!
//! The [`Server`] owns the validated configuration, the seeded store behind
//! [`AppState`], and the shutdown broadcast for background tasks.
//!
//! # Lifecycle
//!
//! 1. Validate configuration, install the metrics recorder if enabled
//! 2. Build the router over a freshly seeded store
//! 3. Bind the API listener and serve until SIGTERM or SIGINT
//! 4. Drain in-flight requests, then stop the uptime updater

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use testrack_api::{AppState, Credentials, build_router};
use testrack_core::config::TestrackConfig;
use testrack_registry::CatalogKind;

use crate::metrics_server;

/// The testrack HTTP server.
pub struct Server {
    /// Loaded and validated configuration.
    config: TestrackConfig,
    /// Shared handler state (catalogs and entity store).
    state: AppState,
    /// Credentials checked by the Basic auth middleware.
    credentials: Arc<Credentials>,
    /// Shutdown broadcast sender (signals background tasks).
    shutdown_tx: broadcast::Sender<()>,
    /// Server start time (for uptime reporting).
    start_time: Instant,
}

impl Server {
    /// Build from an already-resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the metrics recorder
    /// cannot be installed.
    pub fn build_from_config(config: TestrackConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
            tracing::info!(port = config.metrics.port, "metrics endpoint enabled");
            record_daemon_metrics();
        }

        if config.uses_default_credentials() {
            tracing::warn!(
                username = %config.auth.username,
                "using built-in development credentials; set [auth] before exposing the server"
            );
        }

        let state = AppState::from_config(&config);
        let credentials = Arc::new(Credentials::from_config(&config.auth));
        let (shutdown_tx, _) = broadcast::channel(4);

        tracing::info!(
            catalogs = CatalogKind::ALL.len(),
            page_size = state.paging.default_size,
            auth_user = credentials.username(),
            "server initialized"
        );

        Ok(Self {
            config,
            state,
            credentials,
            shutdown_tx,
            start_time: Instant::now(),
        })
    }

    /// Build the full router over this server's state.
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), Arc::clone(&self.credentials))
    }

    /// Bind the API listener at `server.listen_addr:server.port`.
    pub async fn bind(&self) -> Result<TcpListener> {
        let host = self.config.server.listen_addr.as_str();
        let port = self.config.server.port;
        TcpListener::bind((host, port))
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind {}:{}: {}", host, port, e))
    }

    /// Bind, serve, and block until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<()> {
        let listener = self.bind().await?;
        let signal = shutdown_signal()?;
        self.serve(listener, async move {
            let name = signal.await;
            tracing::info!(signal = name, "shutdown signal received");
        })
        .await
    }

    /// Serve on an already-bound listener until `shutdown` resolves.
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;

        let uptime_updater_task = if self.config.metrics.enabled {
            Some(spawn_uptime_updater(
                self.start_time,
                self.shutdown_tx.subscribe(),
            ))
        } else {
            None
        };

        tracing::info!(listen_addr = %local_addr, "testrack API listening");

        let shutdown_tx = self.shutdown_tx.clone();
        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("broadcasting shutdown signal to all tasks");
                let _ = shutdown_tx.send(());
            })
            .await;

        // serve 자체가 실패한 경우에도 백그라운드 작업은 멈춰야 함
        let _ = self.shutdown_tx.send(());
        if let Some(task) = uptime_updater_task {
            let _ = task.await;
        }

        result.map_err(|e| anyhow::anyhow!("HTTP server failed: {}", e))?;
        tracing::info!(uptime_secs = self.start_time.elapsed().as_secs(), "server stopped");
        Ok(())
    }
}

/// Install SIGTERM and SIGINT handlers and return a future that resolves
/// with the name of whichever arrives first.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed.
fn shutdown_signal() -> Result<impl Future<Output = &'static str>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        }
    })
}

/// Record daemon-level metrics (build info).
fn record_daemon_metrics() {
    use testrack_core::metrics as m;

    metrics::gauge!(m::DAEMON_BUILD_INFO, "version" => env!("CARGO_PKG_VERSION")).set(1.0);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "daemon metrics recorded");
}

/// Spawn a background task that periodically updates the uptime metric.
///
/// Updates every 10 seconds to keep the metric fresh for Prometheus scrapes.
fn spawn_uptime_updater(
    start_time: Instant,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    use testrack_core::metrics as m;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(10));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let uptime_secs = start_time.elapsed().as_secs();
                    #[allow(clippy::cast_precision_loss)]
                    metrics::gauge!(m::DAEMON_UPTIME_SECONDS).set(uptime_secs as f64);
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("uptime updater shutting down");
                    break;
                }
            }
        }
    })
}
