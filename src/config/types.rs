// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub assets: AssetsConfig,
    pub cache_control: CacheControlConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Asset serving configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    /// Directory served at the URL root
    pub root: String,
    /// Advertise and honor byte-range requests
    pub accept_ranges: bool,
    /// ETag generation mode; a custom generator is installed in code, not here
    pub etags: EtagMode,
}

/// ETag generation mode selectable from configuration
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EtagMode {
    Disabled,
    Auto,
}

/// Cache-Control and Expires policy for served assets
#[derive(Debug, Deserialize, Clone)]
pub struct CacheControlConfig {
    /// Leading Cache-Control directive, e.g. "public" or "private"
    pub directive: String,
    /// max-age in seconds; also drives the Expires header
    pub max_age: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub enable_cors: bool,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined, common, or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}
