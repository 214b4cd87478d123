//! Graceful shutdown coordination
//!
//! SIGTERM and SIGINT both start the same sequence: the listener stops
//! accepting, in-flight requests drain, and the binary waits at most
//! [`SHUTDOWN_GRACE`] before giving up and exiting with an error. The
//! shutdown channel is the only synchronization between the signal wait in
//! `main` and the serve loop.

use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Drain deadline after a termination signal. In-flight requests get this
/// long to complete before the process exits with an error instead of
/// hanging on a stuck handler.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Shutdown signal receiver
///
/// Cloned into every task that must stop on shutdown; the serve loop passes
/// `wait()` to axum as its graceful-shutdown future.
#[derive(Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait until shutdown is triggered.
    ///
    /// Completes immediately when shutdown was already triggered, and also
    /// when the controller is dropped (a vanished controller means the
    /// process is going down anyway).
    pub async fn wait(&mut self) {
        while !*self.receiver.borrow() {
            if self.receiver.changed().await.is_err() {
                break;
            }
        }
    }

    /// Check whether shutdown was triggered (non-blocking).
    pub fn is_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Trigger side of the shutdown channel, held by `main`.
pub struct ShutdownController {
    sender: watch::Sender<bool>,
}

impl ShutdownController {
    /// Trigger shutdown. All cloned [`ShutdownSignal`]s resolve.
    pub fn shutdown(&self) {
        let _ = self.sender.send(true);
        info!("Shutdown signal sent");
    }
}

/// Create the shutdown channel.
///
/// Returns (controller, signal): the controller triggers shutdown, the
/// signal is cloned into components that need to observe it.
pub fn shutdown_channel() -> (ShutdownController, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownController { sender }, ShutdownSignal { receiver })
}

/// Wait for SIGTERM or SIGINT.
///
/// Blocks until a termination signal arrives and returns the signal name
/// for logging. This is the only blocking wait on the main task.
///
/// # Panics
/// Panics if signal handlers cannot be registered (OS resource exhaustion).
#[cfg(unix)]
pub async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};
    use tracing::error;

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to register SIGTERM handler");
            panic!("Cannot register SIGTERM handler: {}", e);
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to register SIGINT handler");
            panic!("Cannot register SIGINT handler: {}", e);
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM");
            "SIGTERM"
        }
        _ = sigint.recv() => {
            info!("Received SIGINT");
            "SIGINT"
        }
    }
}

/// Wait for Ctrl+C (non-unix platforms).
///
/// # Panics
/// Panics if the Ctrl+C handler cannot be registered.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> &'static str {
    use tracing::error;

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to wait for Ctrl+C");
        panic!("Cannot wait for Ctrl+C: {}", e);
    }
    info!("Received Ctrl+C");
    "CTRL_C"
}
