//! Accept loop
//!
//! Accepts connections until a shutdown signal arrives. In-flight connections
//! keep running on their own tasks; the loop only stops taking new ones.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::shutdown_signal;
use crate::config::AppState;
use crate::logger;

pub async fn run_server(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => match accept_result {
                Ok((stream, peer_addr)) => {
                    accept_connection(stream, peer_addr, &state, &active_connections);
                }
                Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
            },
            signal = &mut shutdown => {
                logger::log_shutdown(signal);
                logger::log_info(&format!(
                    "[Shutdown] {} connection(s) still open",
                    active_connections.load(Ordering::SeqCst)
                ));
                return Ok(());
            }
        }
    }
}
