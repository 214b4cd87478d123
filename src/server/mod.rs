//! HTTP server for the demo endpoints
//!
//! Provides Kubernetes health probes:
//! - `/health` - Liveness probe (process is running)
//! - `/ready` - Readiness probe (warm-up window has elapsed)
//!
//! plus the demo API under `/api/` and the HTML index at `/`.
//!
//! Also provides graceful shutdown handling for SIGTERM/SIGINT.

pub mod handlers;
mod http;
pub mod metrics;
pub mod shutdown;

pub use http::{bind_address, serve, AppState, ServerError, READY_AFTER_SECS, REQUEST_TIMEOUT};
pub use metrics::{create_metrics, SharedMetrics};
pub use shutdown::{
    shutdown_channel, wait_for_signal, ShutdownController, ShutdownSignal, SHUTDOWN_GRACE,
};

#[cfg(test)]
#[path = "http_test.rs"]
mod http_tests;

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;
