//! Connection handling
//!
//! Each accepted TCP connection is served on its own task with HTTP/1.1.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Count the connection against the limit and serve it, or drop it when full
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment first, then check, so two accepts cannot both take the last slot
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_connection_limit(&peer_addr, max_conn);
            drop(stream);
            return;
        }
    }

    logger::log_debug(&format!("Accepted connection from {peer_addr}"));
    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        // Only the wait for a request head is timed; responses are not
        let performance = &state.config.performance;
        let mut builder = http1::Builder::new();
        builder.timer(TokioTimer::new());
        if performance.read_timeout > 0 {
            builder.header_read_timeout(Duration::from_secs(performance.read_timeout));
        }
        builder.keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );

        match conn.await {
            Ok(()) => {}
            Err(err) if err.is_timeout() => logger::log_debug(&format!(
                "Connection from {peer_addr} closed after {}s without a request",
                performance.read_timeout
            )),
            Err(err) => logger::log_connection_error(&err),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
