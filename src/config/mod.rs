// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    AssetsConfig, CacheControlConfig, Config, EtagMode, HealthConfig, HttpConfig, LoggingConfig,
    PerformanceConfig, ServerConfig,
};

impl Config {
    /// Load configuration from the default `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `STATICD_`-prefixed environment variables
    /// override it, and every key has a default.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("STATICD"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("assets.root", "public")?
            .set_default("assets.accept_ranges", true)?
            .set_default("assets.etags", "auto")?
            .set_default("cache_control.directive", "public")?
            .set_default("cache_control.max_age", 3600)?
            .set_default("http.enable_cors", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let cfg = Config::load_from("no-such-config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.assets.root, "public");
        assert!(cfg.assets.accept_ranges);
        assert_eq!(cfg.assets.etags, EtagMode::Auto);
        assert_eq!(cfg.cache_control.directive, "public");
        assert_eq!(cfg.cache_control.max_age, 3600);
        assert!(cfg.performance.max_connections.is_none());
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.health.enabled);
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let cfg = Config::load_from("no-such-config").unwrap();
        assert_eq!(cfg.socket_addr().unwrap().port(), 8080);
    }
}
