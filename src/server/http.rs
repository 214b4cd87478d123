//! HTTP server assembly and lifecycle
//!
//! Owns the shared [`AppState`], builds the router over the handlers in
//! [`super::handlers`], and runs the accept loop until a shutdown signal
//! arrives. Request timeouts and request tracing are applied here as
//! middleware so individual handlers stay free of plumbing.

use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use super::metrics::SharedMetrics;
use super::shutdown::ShutdownSignal;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;

/// Warm-up window before the readiness probe starts reporting ready.
pub const READY_AFTER_SECS: i64 = 10;

/// Per-request deadline enforced by the timeout middleware.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from the HTTP server lifecycle.
///
/// All of these are fatal: the process has nothing useful to do without a
/// working listener, so `main` terminates on any of them.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be created. Usually a busy or privileged
    /// port, or an unparsable bind address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The accept loop failed after a successful bind.
    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),

    /// The server task panicked or was aborted.
    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// In-flight requests were still running when the grace period expired.
    #[error("server did not stop within {0:?} after shutdown was requested")]
    ShutdownTimeout(Duration),
}

/// Shared state handed to every handler.
///
/// Cloning is cheap; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub metrics: SharedMetrics,
    pub(crate) clock: Arc<dyn Clock>,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// State backed by the wall clock.
    ///
    /// `started_at` is captured here, so build one state per process and
    /// clone it into the router.
    pub fn new(config: Config, metrics: SharedMetrics) -> Self {
        Self::with_clock(config, metrics, Arc::new(SystemClock))
    }

    /// State with an explicit clock, for deterministic readiness tests.
    pub fn with_clock(config: Config, metrics: SharedMetrics, clock: Arc<dyn Clock>) -> Self {
        let started_at = clock.now();
        Self {
            config: Arc::new(config),
            metrics,
            clock,
            started_at,
        }
    }

    /// Time elapsed since the state was created.
    pub fn uptime(&self) -> chrono::Duration {
        self.clock.now() - self.started_at
    }

    /// Whether the warm-up window has elapsed.
    ///
    /// Readiness is derived from uptime rather than stored, so a shutdown
    /// in progress never flips the probe back to 503.
    pub fn is_ready(&self) -> bool {
        self.uptime() >= chrono::Duration::seconds(READY_AFTER_SECS)
    }
}

/// Bind address for the configured port, listening on all interfaces.
///
/// The port is not validated here; a malformed value fails at bind time
/// with an address resolution error.
pub fn bind_address(port: &str) -> String {
    format!("0.0.0.0:{}", port)
}

/// Build the router for all demo endpoints
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/api/info", get(handlers::info))
        .route("/api/config", get(handlers::config))
        .route("/api/metrics", get(handlers::metrics))
        .route("/api/load", get(handlers::load))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the demo endpoints on `addr` until the shutdown signal fires.
///
/// Binds eagerly so the caller sees bind failures as [`ServerError::Bind`].
/// After the signal the listener stops accepting and in-flight requests run
/// to completion; the caller enforces the overall grace deadline on top.
pub async fn serve(
    addr: String,
    state: AppState,
    mut shutdown: ShutdownSignal,
) -> Result<(), ServerError> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await.map_err(|source| ServerError::Bind {
        addr: addr.clone(),
        source,
    })?;
    // Log after successful bind - server is actually listening
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
        .map_err(ServerError::Serve)
}
