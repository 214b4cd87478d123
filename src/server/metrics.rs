//! Prometheus metrics registry
//!
//! Two series, matching what the demo exposes on `/api/metrics`:
//! - `app_uptime_seconds` (counter): wall-clock uptime, refreshed at scrape
//! - `app_version_info` (gauge): constant 1 with `version`/`environment`
//!   labels, the usual build-info idiom

use prometheus::{Counter, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Shared handle to the metrics registry, cloned into the server state.
pub type SharedMetrics = Arc<AppMetrics>;

/// Registry plus the individual series handlers update.
pub struct AppMetrics {
    registry: Registry,
    uptime_seconds: Counter,
    version_info: IntGaugeVec,
}

impl AppMetrics {
    /// Bring the uptime counter up to `uptime_secs`.
    ///
    /// Counters only move forward, so a stale or duplicate scrape (smaller
    /// value) leaves the series untouched instead of panicking the encoder.
    pub fn observe_uptime(&self, uptime_secs: f64) {
        let current = self.uptime_seconds.get();
        if uptime_secs > current {
            self.uptime_seconds.inc_by(uptime_secs - current);
        }
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

/// Create the metrics registry and register all series.
///
/// The version-info gauge is set to 1 here and never changes; the labels
/// carry the actual information.
pub fn create_metrics(version: &str, environment: &str) -> Result<SharedMetrics, prometheus::Error> {
    let registry = Registry::new();

    let uptime_seconds = Counter::with_opts(Opts::new(
        "app_uptime_seconds",
        "Application uptime in seconds",
    ))?;
    registry.register(Box::new(uptime_seconds.clone()))?;

    let version_info = IntGaugeVec::new(
        Opts::new("app_version_info", "Application version info"),
        &["version", "environment"],
    )?;
    registry.register(Box::new(version_info.clone()))?;
    version_info
        .with_label_values(&[version, environment])
        .set(1);

    Ok(Arc::new(AppMetrics {
        registry,
        uptime_seconds,
        version_info,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposition_contains_both_series() {
        let metrics = create_metrics("v1.0.0", "development").expect("registry");
        let body = metrics.encode().expect("encode");

        assert!(body.contains("# HELP app_uptime_seconds Application uptime in seconds"));
        assert!(body.contains("# TYPE app_uptime_seconds counter"));
        assert!(body.contains("# HELP app_version_info Application version info"));
        assert!(body.contains("# TYPE app_version_info gauge"));
        assert!(body.contains("version=\"v1.0.0\""));
        assert!(body.contains("environment=\"development\""));
    }

    #[test]
    fn test_version_info_is_one() {
        let metrics = create_metrics("v2.0.0", "production").expect("registry");
        let value = metrics
            .version_info
            .with_label_values(&["v2.0.0", "production"])
            .get();
        assert_eq!(value, 1);
    }

    #[test]
    fn test_observe_uptime_moves_forward_only() {
        let metrics = create_metrics("v1.0.0", "development").expect("registry");

        metrics.observe_uptime(5.0);
        assert_eq!(metrics.uptime_seconds.get(), 5.0);

        // A smaller observation must not move the counter backwards.
        metrics.observe_uptime(3.0);
        assert_eq!(metrics.uptime_seconds.get(), 5.0);

        metrics.observe_uptime(7.5);
        assert_eq!(metrics.uptime_seconds.get(), 7.5);
    }

    #[test]
    fn test_uptime_value_appears_in_exposition() {
        let metrics = create_metrics("v1.0.0", "development").expect("registry");
        metrics.observe_uptime(5.0);

        let body = metrics.encode().expect("encode");
        assert!(
            body.contains("app_uptime_seconds 5"),
            "exposition should carry the observed uptime, got:\n{}",
            body
        );
    }
}
