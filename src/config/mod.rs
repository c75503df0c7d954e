// Configuration module entry point
// Loads the server configuration and builds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, ListingConfig, LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEMO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 4000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "Demo-Site/1.0")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("site.views_dir", "views")?
            .set_default("site.public_dir", "public")?
            .set_default("site.data_dir", "demoapp/data")?
            .set_default("site.basepath", "/")?
            .set_default("site.title", "SoHo XI")?
            .set_default("site.locale", "en-US")?
            .set_default("site.theme", "light")?
            .set_default("site.live_reload", true)?
            .set_default("site.version", env!("CARGO_PKG_VERSION"))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
