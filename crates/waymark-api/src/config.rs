//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ADVENTURE_PATH: &str = "adventures/lighthouse.yaml";

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Bind host (`HOST`).
    pub host: String,
    /// Bind port (`PORT`).
    pub port: u16,
    /// Adventure definition file (`ADVENTURE_PATH`).
    pub adventure_path: PathBuf,
    /// Re-read the adventure file on every request (`ADVENTURE_HOT_RELOAD`).
    pub adventure_hot_reload: bool,
    /// Base URL audio fragments resolve against (`MEDIA_BASE_URL`).
    pub media_base_url: String,
    /// PostgreSQL URL for positions (`DATABASE_URL`); in-memory when unset.
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };

        let adventure_hot_reload = match non_empty("ADVENTURE_HOT_RELOAD") {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!(
                    "ADVENTURE_HOT_RELOAD must be true or false, got '{raw}'"
                ))
            })?,
            None => false,
        };

        let media_base_url = non_empty("MEDIA_BASE_URL").ok_or_else(|| {
            AppError::Config("MEDIA_BASE_URL environment variable must be set".to_owned())
        })?;

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            adventure_path: non_empty("ADVENTURE_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_ADVENTURE_PATH), PathBuf::from),
            adventure_hot_reload,
            media_base_url,
            database_url: non_empty("DATABASE_URL"),
        })
    }

    /// Returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a valid address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
