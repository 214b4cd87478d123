//! Tests for environment-driven configuration

use super::*;

/// All environment phases live in one test because cargo runs tests on
/// parallel threads and these five variables are process-global state.
/// Other tests construct `Config` directly and never read the environment.
#[test]
fn test_from_env_reads_documented_variables() {
    let vars = [
        "PORT",
        "APP_VERSION",
        "ENVIRONMENT",
        "DATABASE_URL",
        "API_SECRET",
    ];

    // Phase 1: nothing set, every field reports its default.
    for var in vars {
        std::env::remove_var(var);
    }
    let config = Config::from_env();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.version, DEFAULT_VERSION);
    assert_eq!(config.environment, DEFAULT_ENVIRONMENT);
    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert!(
        !config.has_custom_secret(),
        "Unset API_SECRET should count as the default"
    );

    // Phase 2: all set, every field reports the override.
    std::env::set_var("PORT", "9999");
    std::env::set_var("APP_VERSION", "v9.9.9-test");
    std::env::set_var("ENVIRONMENT", "staging-test");
    std::env::set_var("DATABASE_URL", "db.test.internal:5432");
    std::env::set_var("API_SECRET", "kuorma-test-secret");
    let config = Config::from_env();
    assert_eq!(config.port, "9999");
    assert_eq!(config.version, "v9.9.9-test");
    assert_eq!(config.environment, "staging-test");
    assert_eq!(config.database_url, "db.test.internal:5432");
    assert!(config.has_custom_secret());

    // Phase 3: empty counts as unset.
    std::env::set_var("PORT", "");
    let config = Config::from_env();
    assert_eq!(config.port, DEFAULT_PORT, "Empty PORT should fall back");

    // Clean up immediately
    for var in vars {
        std::env::remove_var(var);
    }
}

#[test]
fn test_default_matches_documented_values() {
    let config = Config::default();
    assert_eq!(config.port, "8080");
    assert_eq!(config.version, "v1.0.0");
    assert_eq!(config.environment, "development");
    assert_eq!(config.database_url, "localhost:5432");
    assert!(!config.has_custom_secret());
}

#[test]
fn test_has_custom_secret_only_for_non_default_values() {
    assert!(!Config::with_secret(DEFAULT_SECRET).has_custom_secret());
    assert!(Config::with_secret("hunter2").has_custom_secret());
    // An explicitly empty secret is treated as unset by from_env; set
    // directly it still differs from the sentinel.
    assert!(Config::with_secret("").has_custom_secret());
}

/// The secret must not appear in debug output (it reaches logs otherwise).
#[test]
fn test_debug_redacts_secret() {
    let config = Config::with_secret("hunter2");
    let printed = format!("{:?}", config);
    assert!(!printed.contains("hunter2"), "Debug leaked the secret");
    assert!(printed.contains("<overridden>"));

    let printed = format!("{:?}", Config::default());
    assert!(printed.contains("<default>"));
}
