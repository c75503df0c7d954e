use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod api;
mod config;
mod handler;
mod http;
mod logger;
mod render;
mod resolve;
mod routing;
mod server;

/// Config file used when none is given on the command line (extension optional)
const DEFAULT_CONFIG: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    // Runtime sized by `server.workers`, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(config::AppState::new(&cfg)?);
    let listener = server::create_reusable_listener(addr)?;
    let active_connections = Arc::new(AtomicUsize::new(0));

    logger::log_server_start(&addr, &cfg);
    server::run_server(listener, state, active_connections).await
}
