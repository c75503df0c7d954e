//! Shutdown signals
//!
//! | Signal  | Action          |
//! |---------|-----------------|
//! | SIGTERM | Graceful stop   |
//! | SIGINT  | Graceful stop   |
//!
//! Other platforms only get Ctrl+C.

use crate::logger;

/// Resolve once a shutdown signal arrives, returning its name
#[cfg(unix)]
pub async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            logger::log_warning(&format!(
                "Failed to register signal handlers ({e}), falling back to Ctrl+C"
            ));
            return ctrl_c().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "Ctrl+C",
        Err(e) => {
            logger::log_error(&format!("Unable to listen for Ctrl+C: {e}"));
            std::future::pending().await
        }
    }
}
