//! Configuration module
//!
//! Server and upload settings, loaded from the environment (and `.env` when present).
//! The upload root is an explicit value here and is handed to the storage layer at
//! startup rather than living in a process-wide global.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const SERVER_PORT: u16 = 3000;
const BIND_ADDRESS: &str = "0.0.0.0";
const UPLOAD_DIR: &str = "uploads";
const CORS_ORIGIN_PREFIXES: &str = "http://localhost,http://127.0.0.1";

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!(
                "Invalid LOG_FORMAT: {}. Must be 'compact' or 'json'",
                other
            )),
        }
    }
}

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub bind_address: String,
    /// Origins starting with one of these prefixes get CORS headers echoed back.
    pub cors_origin_prefixes: Vec<String>,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Upload handling settings
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Flat directory receiving every uploaded file.
    pub upload_dir: PathBuf,
    /// Per-upload deadline. `None` means the copy runs until the stream ends or fails.
    pub upload_timeout_secs: Option<u64>,
    /// Delete the partially written file when a copy fails.
    pub remove_partial_uploads: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub upload: UploadConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base: BaseConfig {
                server_port: SERVER_PORT,
                bind_address: BIND_ADDRESS.to_string(),
                cors_origin_prefixes: split_list(CORS_ORIGIN_PREFIXES),
                environment: "development".to_string(),
                log_format: LogFormat::Compact,
            },
            upload: UploadConfig {
                upload_dir: PathBuf::from(UPLOAD_DIR),
                upload_timeout_secs: None,
                remove_partial_uploads: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| BIND_ADDRESS.to_string());

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origin_prefixes = split_list(
            &lookup("CORS_ORIGIN_PREFIXES").unwrap_or_else(|| CORS_ORIGIN_PREFIXES.to_string()),
        );

        let log_format = match lookup("LOG_FORMAT") {
            Some(format) => format.parse()?,
            None => LogFormat::Compact,
        };

        let upload_dir = PathBuf::from(lookup("UPLOAD_DIR").unwrap_or_else(|| UPLOAD_DIR.to_string()));

        let upload_timeout_secs = match lookup("UPLOAD_TIMEOUT_SECS") {
            Some(secs) => {
                let secs = secs
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| anyhow::anyhow!("UPLOAD_TIMEOUT_SECS must be a valid number"))?;
                // 0 disables the deadline
                (secs > 0).then_some(secs)
            }
            None => None,
        };

        let remove_partial_uploads = match lookup("UPLOAD_REMOVE_PARTIAL") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                anyhow::anyhow!("UPLOAD_REMOVE_PARTIAL must be true or false")
            })?,
            None => false,
        };

        Ok(Config {
            base: BaseConfig {
                server_port,
                bind_address,
                cors_origin_prefixes,
                environment,
                log_format,
            },
            upload: UploadConfig {
                upload_dir,
                upload_timeout_secs,
                remove_partial_uploads,
            },
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload.upload_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_DIR must not be empty"));
        }

        if self.base.bind_address.trim().is_empty() {
            return Err(anyhow::anyhow!("BIND_ADDRESS must not be empty"));
        }

        if let Some(prefix) = self
            .base
            .cors_origin_prefixes
            .iter()
            .find(|p| !p.starts_with("http://") && !p.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGIN_PREFIXES entries must start with http:// or https:// (got '{}')",
                prefix
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn bind_address(&self) -> &str {
        &self.base.bind_address
    }

    pub fn cors_origin_prefixes(&self) -> &[String] {
        &self.base.cors_origin_prefixes
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.base.log_format
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload.upload_dir
    }

    pub fn upload_timeout(&self) -> Option<Duration> {
        self.upload.upload_timeout_secs.map(Duration::from_secs)
    }

    pub fn remove_partial_uploads(&self) -> bool {
        self.upload.remove_partial_uploads
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
