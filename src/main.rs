use kuorma::config::Config;
use kuorma::server::{
    bind_address, create_metrics, serve, shutdown_channel, wait_for_signal, AppState,
    ServerError, SHUTDOWN_GRACE,
};
use tracing::{error, info};

/// Map the server task's exit, seen before any shutdown signal, to the
/// fatal error that terminates the process.
///
/// A clean return here is still fatal: the server only stops on its own
/// when something is wrong, since graceful exits go through the signal path.
fn server_exit_error(
    result: Result<Result<(), ServerError>, tokio::task::JoinError>,
) -> anyhow::Error {
    match result {
        Ok(Ok(())) => anyhow::anyhow!("server exited unexpectedly"),
        Ok(Err(e)) => e.into(),
        Err(e) => ServerError::Task(e).into(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting kuorma demo service");

    // Load configuration once; handlers see it read-only from here on
    let config = Config::from_env();
    info!(
        port = %config.port,
        version = %config.version,
        environment = %config.environment,
        "Configuration loaded"
    );

    // Create shutdown channel for coordinated shutdown
    let (shutdown_controller, shutdown_signal) = shutdown_channel();

    // Create metrics registry
    let metrics = match create_metrics(&config.version, &config.environment) {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "Failed to create metrics registry");
            return Err(e.into());
        }
    };
    info!("Prometheus metrics registry initialized");

    let addr = bind_address(&config.port);
    let state = AppState::new(config, metrics);

    // Start HTTP server in background
    let mut server_handle = tokio::spawn(serve(addr, state, shutdown_signal));

    // Run until a shutdown signal arrives or the server fails on its own
    tokio::select! {
        result = &mut server_handle => {
            // Bind failures and accept-loop errors land here
            let err = server_exit_error(result);
            error!(error = %err, "HTTP server failed");
            return Err(err);
        }
        signal = wait_for_signal() => {
            info!(signal = signal, "Initiating graceful shutdown");
        }
    }

    // Stop accepting new connections; in-flight requests keep running
    shutdown_controller.shutdown();

    match tokio::time::timeout(SHUTDOWN_GRACE, server_handle).await {
        Ok(Ok(Ok(()))) => {
            info!("kuorma shut down gracefully");
            Ok(())
        }
        Ok(Ok(Err(e))) => {
            error!(error = %e, "Server failed during shutdown");
            Err(e.into())
        }
        Ok(Err(e)) => {
            error!(error = %e, "Server task failed during shutdown");
            Err(ServerError::Task(e).into())
        }
        Err(_) => {
            // In-flight work gets SHUTDOWN_GRACE, then the process leaves anyway
            let err = ServerError::ShutdownTimeout(SHUTDOWN_GRACE);
            error!(error = %err, "Forcing exit");
            Err(err.into())
        }
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
