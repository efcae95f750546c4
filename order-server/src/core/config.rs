//! Server configuration

use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// All settings can be overridden through environment variables:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/order-server | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | PAYMENT_GATEWAY_URL | (none) | Payment collaborator base URL |
/// | PAYMENT_TIMEOUT_MS | 5000 | Per-attempt payment call timeout |
/// | PAYMENT_RETRIES | 2 | Retries for upstream payment calls |
/// | PENDING_TIMEOUT_MS | 300000 | Pending orders older than this fail |
/// | EXPIRY_SWEEP_INTERVAL_MS | 30000 | Expiry worker sweep interval |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/orders HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT verification configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Payment collaborator base URL (None = static dev gateway)
    pub payment_gateway_url: Option<String>,
    /// Per-attempt timeout for payment calls (milliseconds)
    pub payment_timeout_ms: u64,
    /// Retry attempts for upstream payment calls
    pub payment_retries: u32,
    /// Pending orders older than this are failed (milliseconds)
    pub pending_timeout_ms: u64,
    /// Expiry worker sweep interval (milliseconds)
    pub expiry_sweep_interval_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/order-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            payment_gateway_url: std::env::var("PAYMENT_GATEWAY_URL").ok(),
            payment_timeout_ms: std::env::var("PAYMENT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            payment_retries: std::env::var("PAYMENT_RETRIES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(2),
            pending_timeout_ms: std::env::var("PENDING_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300_000),
            expiry_sweep_interval_ms: std::env::var("EXPIRY_SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30_000),
        }
    }

    /// Override work dir and port (used by tests)
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Whether this is a production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether this is a development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Path of the order database file
    pub fn database_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("orders.redb")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
