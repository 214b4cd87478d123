//! Process configuration loaded once from the environment
//!
//! Every variable is optional and has a documented default. Nothing is
//! validated: a malformed `PORT` is carried as-is and surfaces as a bind
//! failure at startup, not as a configuration error. After construction the
//! configuration is immutable and shared read-only with every handler.

use std::fmt;

/// Default TCP port to bind.
pub const DEFAULT_PORT: &str = "8080";

/// Default version label.
pub const DEFAULT_VERSION: &str = "v1.0.0";

/// Default environment tag.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Default database address. Display only; nothing connects to it.
pub const DEFAULT_DATABASE_URL: &str = "localhost:5432";

/// Sentinel secret value. `has_custom_secret` reports `false` while the
/// configured secret equals this.
pub const DEFAULT_SECRET: &str = "default-secret";

/// Immutable startup configuration.
///
/// Built once by [`Config::from_env`]. The secret stays private to this
/// module: the rest of the crate can only ask whether it differs from
/// [`DEFAULT_SECRET`], so the value cannot leak into a response body.
#[derive(Clone)]
pub struct Config {
    pub port: String,
    pub version: String,
    pub environment: String,
    pub database_url: String,
    secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Variables (all optional):
    /// - PORT: port to bind (default: 8080)
    /// - APP_VERSION: version label (default: v1.0.0)
    /// - ENVIRONMENT: environment tag (default: development)
    /// - DATABASE_URL: database address, display only (default: localhost:5432)
    /// - API_SECRET: opaque secret, only reported as default/overridden
    ///
    /// An empty value counts as unset and falls back to the default.
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", DEFAULT_PORT),
            version: env_or("APP_VERSION", DEFAULT_VERSION),
            environment: env_or("ENVIRONMENT", DEFAULT_ENVIRONMENT),
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            secret: env_or("API_SECRET", DEFAULT_SECRET),
        }
    }

    /// True iff `API_SECRET` was set to something other than the default.
    pub fn has_custom_secret(&self) -> bool {
        self.secret != DEFAULT_SECRET
    }

    /// Test fixture: defaults with a chosen secret, no environment reads.
    #[cfg(test)]
    pub(crate) fn with_secret(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            ..Self::default()
        }
    }
}

impl Default for Config {
    /// The documented defaults, without touching the environment.
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            version: DEFAULT_VERSION.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            secret: DEFAULT_SECRET.to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The secret must not reach logs either; report only its status.
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("version", &self.version)
            .field("environment", &self.environment)
            .field("database_url", &self.database_url)
            .field(
                "secret",
                if self.has_custom_secret() {
                    &"<overridden>"
                } else {
                    &"<default>"
                },
            )
            .finish()
    }
}

/// Read an environment variable, treating absent and empty as unset.
fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
