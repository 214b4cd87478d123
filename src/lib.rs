//! kuorma - a small HTTP service for demonstrating Kubernetes workloads
//!
//! The service is intentionally simple: it answers health and readiness
//! probes, reports its own build and configuration facts, exposes Prometheus
//! metrics, and can burn CPU on demand so autoscaling can be exercised.
//!
//! Endpoints:
//! - `/` - HTML index
//! - `/health` - liveness probe
//! - `/ready` - readiness probe (ready after a 10 second warm-up)
//! - `/api/info` - version, environment, hostname, pid, uptime
//! - `/api/config` - effective configuration, secret reported only as a flag
//! - `/api/metrics` - Prometheus text exposition
//! - `/api/load` - synthetic CPU load
//!
//! Configuration comes from environment variables, every one optional with
//! a documented default; see [`config::Config::from_env`]. Shutdown is
//! signal driven: SIGTERM or SIGINT stops the listener, in-flight requests
//! get [`server::SHUTDOWN_GRACE`] to finish, then the process exits.

pub mod clock;
pub mod config;
pub mod server;
