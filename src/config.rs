//! Configuration loading.
//!
//! Search order:
//! 1. Path in `RESTODASH_CONFIG`
//! 2. `<config_dir>/restodash/config.toml`
//! 3. The embedded default below
//!
//! `RESTODASH_TOKEN` and `RESTODASH_PORT` override the file values.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration embedded in the binary.
pub const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 13240

[refresh]
interval_ms = 30000
request_timeout_ms = 10000

[services]
orders_url = "http://localhost:8083/api/orders"
products_url = "http://localhost:8082/api/products"
categories_url = "http://localhost:8082/api/categories"
reservations_url = "http://localhost:8084/api/reservations"
logs_url = "http://localhost:8085/api/logs"

[dashboard]
top_products = 5
top_categories = 0
daily_days = 7
recent_orders = 5
recent_logs = 7
peak_hours = 6
"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub refresh: RefreshSettings,
    pub services: ServicesConfig,
    pub auth: AuthConfig,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 13240,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Refresh cadence for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Automatic refresh interval in milliseconds.
    pub interval_ms: u64,
    /// Timeout for each upstream request in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            request_timeout_ms: 10_000,
        }
    }
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Base URLs of the upstream collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub orders_url: String,
    pub products_url: String,
    pub categories_url: String,
    pub reservations_url: String,
    pub logs_url: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            orders_url: "http://localhost:8083/api/orders".to_string(),
            products_url: "http://localhost:8082/api/products".to_string(),
            categories_url: "http://localhost:8082/api/categories".to_string(),
            reservations_url: "http://localhost:8084/api/reservations".to_string(),
            logs_url: "http://localhost:8085/api/logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer token attached to every upstream request.
    pub bearer_token: Option<String>,
}

/// Sizes of the ranked and recent lists in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub top_products: usize,

    /// Categories kept in the breakdown; `0` keeps all of them.
    pub top_categories: usize,
    pub daily_days: u32,
    pub recent_orders: usize,
    pub recent_logs: usize,
    pub peak_hours: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_products: 5,
            top_categories: 0,
            daily_days: 7,
            recent_orders: 5,
            recent_logs: 7,
            peak_hours: 6,
        }
    }
}

impl Config {
    /// Parses a TOML document and validates it.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `RESTODASH_TOKEN` / `RESTODASH_PORT` style overrides.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("RESTODASH_TOKEN") {
            let token = token.trim().to_string();
            self.auth.bearer_token = (!token.is_empty()).then_some(token);
        }

        if let Some(port) = lookup("RESTODASH_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("RESTODASH_PORT={port}")))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "refresh.interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.refresh.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "refresh.request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if !(1..=366).contains(&self.dashboard.daily_days) {
            return Err(ConfigError::Invalid(
                "dashboard.daily_days must be between 1 and 366".to_string(),
            ));
        }

        let urls = [
            ("services.orders_url", &self.services.orders_url),
            ("services.products_url", &self.services.products_url),
            ("services.categories_url", &self.services.categories_url),
            ("services.reservations_url", &self.services.reservations_url),
            ("services.logs_url", &self.services.logs_url),
        ];
        for (key, url) in urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be an http(s) URL, got {url:?}"
                )));
            }
        }

        Ok(())
    }

    /// Copy safe to expose over the API.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.auth.bearer_token.is_some() {
            copy.auth.bearer_token = Some("***".to_string());
        }
        copy
    }
}

/// Load configuration from disk, falling back to the embedded default.
pub fn load_config() -> Result<Config, ConfigError> {
    let mut config = match config_path() {
        Some(path) if path.exists() => {
            tracing::info!("Loading config from: {}", path.display());
            read_config_file(&path)?
        }
        Some(path) => {
            tracing::warn!("config.toml not found at: {}", path.display());
            tracing::info!("Using default embedded configuration");
            Config::from_toml(DEFAULT_CONFIG)?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            Config::from_toml(DEFAULT_CONFIG)?
        }
    };

    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Config::from_toml(&contents)
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("RESTODASH_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("restodash").join("config.toml"))
}
