//! Logger module
//!
//! Plain `log_*` functions over a process-wide writer:
//! - Server lifecycle and connection events
//! - Per-request access lines in several formats
//! - Errors and warnings, gated by the configured level

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use crate::config::{Config, LoggingConfig};

/// Log levels, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl Level {
    /// Parse a configured level name; unknown names read as `info`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }
}

/// Initialize the logger; call once at startup
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        Level::parse(&config.level),
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    if !writer::enabled(Level::Info) {
        return;
    }
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(level: Level, message: &str) {
    if !writer::enabled(level) {
        return;
    }
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info(&format!("{} started", config.site.title));
    write_info(&format!("Listening on: http://{addr}{}", config.site.basepath));
    write_info(&format!("Views: {}", config.site.views_dir));
    write_info(&format!("Static assets: {}", config.site.public_dir));
    write_info(&format!("Mock data: {}", config.site.data_dir));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(Level::Error, &format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_connection_limit(peer_addr: &SocketAddr, limit: u64) {
    log_warning(&format!(
        "Connection limit ({limit}) reached, dropping connection from {peer_addr}"
    ));
}

pub fn log_shutdown(signal: &str) {
    write_info(&format!("[Shutdown] Received {signal}, no longer accepting connections"));
}

pub fn log_error(message: &str) {
    write_error(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(message);
}

pub fn log_debug(message: &str) {
    if writer::enabled(Level::Debug) {
        write_info(&format!("[DEBUG] {message}"));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
