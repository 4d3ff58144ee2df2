use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AppError, Result};

/// Environment variable that overrides the configured server URL.
pub const SERVER_ENV: &str = "SLIDE_ROI_SERVER";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Connection settings for the processing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bytes sent between two upload progress reports.
    #[serde(default = "default_upload_chunk_bytes")]
    pub upload_chunk_bytes: usize,
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_upload_chunk_bytes() -> usize {
    1024 * 1024
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
            upload_chunk_bytes: default_upload_chunk_bytes(),
            log_level: LogLevel::default(),
        }
    }
}

impl ClientConfig {
    /// Reads a JSON or YAML config file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = if matches!(extension.as_str(), "yaml" | "yml") {
            serde_yaml::from_str::<ClientConfig>(&raw)?
        } else {
            serde_json::from_str::<ClientConfig>(&raw)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Applies `SLIDE_ROI_SERVER` when it is set and non-empty.
    pub fn with_env(self) -> Self {
        self.with_server(std::env::var(SERVER_ENV).ok())
    }

    pub fn with_server(mut self, server_url: Option<String>) -> Self {
        if let Some(server_url) = server_url.filter(|url| !url.trim().is_empty()) {
            self.server_url = server_url.trim().to_string();
        }
        self
    }

    pub fn with_log_level(mut self, log_level: Option<LogLevel>) -> Self {
        if let Some(log_level) = log_level {
            self.log_level = log_level;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "server URL `{}` must start with http:// or https://",
                self.server_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::Config(
                "timeout_secs must be positive".to_string(),
            ));
        }
        if self.upload_chunk_bytes == 0 {
            return Err(AppError::Config(
                "upload_chunk_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
