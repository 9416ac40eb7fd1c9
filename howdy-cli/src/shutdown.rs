//! OS signal handling.
//!
//! SIGINT and SIGTERM cancel the root signal, which settles every greeting
//! derived from it.

use howdy::cancellation::CancellationSignal;
use howdy::logging::{default_logger, ContextLogger};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Spawns a task that cancels `signal` on the first termination request.
pub fn spawn_listener(signal: CancellationSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        shutdown_on(wait_for_termination(), &signal, &default_logger()).await;
    })
}

/// Waits for `termination` to name a signal, then logs it and cancels
/// `signal`.
async fn shutdown_on<F>(termination: F, signal: &CancellationSignal, logger: &Arc<ContextLogger>)
where
    F: Future<Output = &'static str>,
{
    let name = termination.await;
    logger.info(signal, format_args!("Received signal: {name}"));
    logger.info(signal, format_args!("Shutting down gracefully..."));
    signal.cancel();
}

#[cfg(unix)]
async fn wait_for_termination() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                () = ctrl_c() => "SIGINT",
                _ = terminate.recv() => "SIGTERM",
            }
        }
        Err(e) => {
            warn!(error = %e, "Failed to install SIGTERM handler");
            ctrl_c().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() -> &'static str {
    ctrl_c().await;
    "SIGINT"
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
