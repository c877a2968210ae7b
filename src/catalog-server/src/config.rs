//! Server configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:5080").
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Paging limits for list endpoints.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Number of products included in CSV and table exports.
    #[serde(default = "default_export_limit")]
    pub export_limit: usize,

    /// Directory holding files served as-is (e.g. `Products.csv`).
    #[serde(default = "default_files_dir")]
    pub files_dir: PathBuf,

    /// Seed the repository with demo products on startup.
    #[serde(default = "default_true")]
    pub seed_data: bool,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// CORS origins (empty = allow all).
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

fn default_listen_addr() -> String {
    "0.0.0.0:5080".to_string()
}

fn default_export_limit() -> usize {
    100
}

fn default_files_dir() -> PathBuf {
    PathBuf::from("Files")
}

fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            pagination: PaginationConfig::default(),
            export_limit: default_export_limit(),
            files_dir: default_files_dir(),
            seed_data: true,
            logging: LoggingConfig::default(),
            max_body_size: default_max_body_size(),
            cors_origins: vec![],
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("CATALOG_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(dir) = std::env::var("CATALOG_FILES_DIR") {
            config.files_dir = PathBuf::from(dir);
        }

        if let Ok(seed) = std::env::var("CATALOG_SEED_DATA") {
            config.seed_data = seed.parse()?;
        }

        if let Ok(max) = std::env::var("CATALOG_MAX_PAGE_SIZE") {
            config.pagination.max_page_size = max.parse()?;
        }

        Ok(config)
    }
}

/// Paging limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the client does not send one.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Upper bound a requested page size is clamped to.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json or pretty).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
