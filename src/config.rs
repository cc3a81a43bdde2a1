//! Service configuration parsed from environment variables.
//!
//! `main` loads a `.env` file (if present) before calling
//! [`AppConfig::from_env`], so local development and deployments share the
//! same variable names.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CSV_BASE_URL: &str = "https://hebbkx1anhila5yf.public.blob.vercel-storage.com";
pub const DEFAULT_MACHINE_STATUS_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_RETELL_BASE_URL: &str = "https://api.retellai.com";
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
}

/// Timeouts applied to every outbound `reqwest` client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request: Duration,
    pub connect: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineStatusConfig {
    pub enabled: bool,
    pub interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetellConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub csv_base_url: String,
    pub machine_status: MachineStatusConfig,
    pub retell: RetellConfig,
    pub http: HttpTimeouts,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `CSV_BASE_URL`: object-storage bucket serving the CSV exports
    /// - `MACHINE_STATUS_SIMULATION`: enable the random status task (default off)
    /// - `MACHINE_STATUS_INTERVAL_SECS`: default 300
    /// - `RETELL_API_KEY`: voice-agent endpoints answer 503 without it
    /// - `RETELL_BASE_URL`: default `https://api.retellai.com`
    /// - `HTTP_REQUEST_TIMEOUT_SECS` / `HTTP_CONNECT_TIMEOUT_SECS`: default 30 / 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `DATABASE_URL` is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = non_empty_var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let csv_base_url = non_empty_var("CSV_BASE_URL")
            .unwrap_or_else(|| DEFAULT_CSV_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let retell_base_url = non_empty_var("RETELL_BASE_URL")
            .unwrap_or_else(|| DEFAULT_RETELL_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            database_url,
            port: env_parse("PORT", DEFAULT_PORT),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            csv_base_url,
            machine_status: MachineStatusConfig {
                enabled: env_bool("MACHINE_STATUS_SIMULATION").unwrap_or(false),
                interval: Duration::from_secs(env_parse(
                    "MACHINE_STATUS_INTERVAL_SECS",
                    DEFAULT_MACHINE_STATUS_INTERVAL_SECS,
                )),
            },
            retell: RetellConfig { api_key: non_empty_var("RETELL_API_KEY"), base_url: retell_base_url },
            http: HttpTimeouts {
                request: Duration::from_secs(env_parse("HTTP_REQUEST_TIMEOUT_SECS", DEFAULT_HTTP_REQUEST_TIMEOUT_SECS)),
                connect: Duration::from_secs(env_parse("HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_HTTP_CONNECT_TIMEOUT_SECS)),
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
