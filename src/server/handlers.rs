//! Request handlers for the demo endpoints
//!
//! - `/` - HTML index with build and runtime facts
//! - `/health` - liveness: is the process alive?
//! - `/ready` - readiness: has the warm-up window elapsed?
//! - `/api/info` - version, environment, hostname, pid, uptime
//! - `/api/config` - effective configuration (secret only as a flag)
//! - `/api/metrics` - Prometheus text exposition
//! - `/api/load` - synthetic CPU burn for autoscaling demos
//!
//! Handlers read the immutable [`AppState`] and the local process
//! environment. The only write anywhere is the uptime refresh on the
//! metrics scrape.

use axum::extract::{Query, State};
use axum::http::{header::CONTENT_TYPE, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::error;

use super::http::AppState;

/// Iteration count for `/api/load` when the query parameter is absent or
/// unparsable.
pub const DEFAULT_LOAD_ITERATIONS: i64 = 1_000_000;

/// Body of `/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Body of `/api/info`.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub environment: String,
    pub hostname: String,
    pub pid: u32,
    pub uptime: String,
    pub timestamp: String,
}

/// Body of `/api/config`. Carries the secret's status, never its value.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub port: String,
    pub database_url: String,
    pub environment: String,
    pub version: String,
    pub has_secret: bool,
}

/// Body of `/api/load`.
#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub message: &'static str,
    pub iterations: i64,
    pub result: i64,
    pub duration_ms: f64,
}

/// Query parameters of `/api/load`.
#[derive(Debug, Deserialize)]
pub struct LoadParams {
    /// Kept as a raw string: an unparsable value must fall back to the
    /// default, and a typed extractor would reject it with a 400 instead.
    iterations: Option<String>,
}

/// Home page: service banner plus a link to every endpoint.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    let body = format!(
        r#"<h1>Kuorma Demo Service</h1>
<p><strong>Version:</strong> {version}</p>
<p><strong>Environment:</strong> {environment}</p>
<p><strong>Hostname:</strong> {hostname}</p>
<p><strong>Uptime:</strong> {uptime}</p>
<hr>
<h3>Available Endpoints:</h3>
<ul>
    <li><a href="/health">/health</a> - Health check</li>
    <li><a href="/ready">/ready</a> - Readiness probe</li>
    <li><a href="/api/info">/api/info</a> - App info</li>
    <li><a href="/api/config">/api/config</a> - Configuration</li>
    <li><a href="/api/metrics">/api/metrics</a> - Metrics</li>
    <li><a href="/api/load">/api/load</a> - Load test</li>
</ul>
"#,
        version = state.config.version,
        environment = state.config.environment,
        hostname = hostname(),
        uptime = format_uptime(state.uptime()),
    );

    Html(body)
}

/// Liveness probe. Always healthy once the process answers at all.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: rfc3339(&state),
    })
}

/// Readiness probe: 503 during the warm-up window, 200 afterwards.
///
/// The transition is one-way; see [`AppState::is_ready`].
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_ready() {
        (StatusCode::OK, Json(json!({"status": "ready"})))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "not ready", "message": "starting up"})),
        )
    }
}

/// Build and runtime facts about this process.
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        version: state.config.version.clone(),
        environment: state.config.environment.clone(),
        hostname: hostname(),
        pid: std::process::id(),
        uptime: format_uptime(state.uptime()),
        timestamp: rfc3339(&state),
    })
}

/// Effective configuration.
///
/// `has_secret` reports whether `API_SECRET` was overridden; the value
/// itself never leaves the config module.
pub async fn config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        port: state.config.port.clone(),
        database_url: state.config.database_url.clone(),
        environment: state.config.environment.clone(),
        version: state.config.version.clone(),
        has_secret: state.config.has_custom_secret(),
    })
}

/// Prometheus text exposition. Uptime is brought up to date at scrape time.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.observe_uptime(uptime_secs(state.uptime()));

    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {}", e),
        )
            .into_response(),
    }
}

/// Synthetic CPU load for autoscaling demonstrations.
///
/// The iteration count is deliberately unclamped: a single request can burn
/// as much CPU as the caller asks for. The loop runs on the blocking pool so
/// the probe endpoints stay responsive while load is generated.
pub async fn load(Query(params): Query<LoadParams>) -> impl IntoResponse {
    let iterations = resolve_iterations(params.iterations.as_deref());

    match tokio::task::spawn_blocking(move || accumulate(iterations)).await {
        Ok((result, elapsed)) => Json(LoadResponse {
            message: "Load test completed",
            iterations,
            result,
            duration_ms: elapsed.as_secs_f64() * 1000.0,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "Load task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Load task failed").into_response()
        }
    }
}

/// Parse the raw query value, keeping the default on any parse failure.
///
/// Negative counts parse successfully and simply run zero iterations.
fn resolve_iterations(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_LOAD_ITERATIONS)
}

/// The accumulation loop: sum of `0..iterations`, wall time included.
///
/// `black_box` keeps the optimizer from folding the loop into a closed-form
/// sum; the endpoint exists to burn CPU. Addition wraps instead of panicking
/// for absurd iteration counts.
fn accumulate(iterations: i64) -> (i64, std::time::Duration) {
    let start = Instant::now();
    let mut sum: i64 = 0;
    for i in 0..iterations {
        sum = sum.wrapping_add(std::hint::black_box(i));
    }
    (sum, start.elapsed())
}

/// Current time in RFC3339 with seconds precision, e.g. `2026-01-02T03:04:05Z`.
fn rfc3339(state: &AppState) -> String {
    state
        .clock
        .now()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Hostname as Kubernetes injects it into pods; `unknown` outside a cluster.
fn hostname() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

/// Uptime for display: `12.3s`, `4m6s`, `1h2m3s`.
fn format_uptime(uptime: chrono::Duration) -> String {
    let ms = uptime.num_milliseconds().max(0);
    let secs = ms as f64 / 1000.0;
    if secs < 60.0 {
        return format!("{:.1}s", secs);
    }

    let total = ms / 1000;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else {
        format!("{}m{}s", minutes, seconds)
    }
}

/// Uptime as fractional seconds for the metrics registry.
fn uptime_secs(uptime: chrono::Duration) -> f64 {
    uptime.num_milliseconds().max(0) as f64 / 1000.0
}

#[cfg(test)]
#[path = "handlers_test.rs"]
mod tests;
