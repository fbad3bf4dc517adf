//! Client configuration

use std::{path::PathBuf, time::Duration};

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Order service connection settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the order and catalog service
    #[arg(long, env = "MEDSTORE_API_URL", default_value = "http://localhost:8000", global = true)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "MEDSTORE_HTTP_TIMEOUT_SECONDS", default_value_t = 30_u64, global = true)]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    /// Config for the given base URL with the default timeout.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_seconds: 30,
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Order service connection settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Session persistence settings.
    #[command(flatten)]
    pub session: SessionConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Session persistence settings.
#[derive(Debug, Clone, Args)]
pub struct SessionConfig {
    /// File holding the signed-in session and saved draft
    #[arg(long, env = "MEDSTORE_SESSION_FILE", default_value = ".medstore/session.json", global = true)]
    pub session_file: PathBuf,
}
