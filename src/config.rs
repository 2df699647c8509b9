//! Runtime configuration loaded from environment variables
//!
//! Values are read once at startup (a `.env` file is honoured when present)
//! and validated before the server binds.

use chrono::Duration;
use thiserror::Error;

/// Default Webflow API version sent in the `accept-version` header
pub const DEFAULT_API_VERSION: &str = "1.0.0";

/// Default Webflow API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.webflow.com";

/// Default snapshot time-to-live in seconds (one hour)
pub const DEFAULT_CACHE_TTL_SECS: u32 = 3600;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Errors raised while building the configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable holds a value that cannot be parsed
    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Upstream collection settings
#[derive(Debug, Clone, PartialEq)]
pub struct WebflowConfig {
    /// CMS collection to list
    pub collection_id: String,
    /// Bearer token for the API
    pub api_token: String,
    /// Value of the `accept-version` header
    pub api_version: String,
    /// API root, without trailing path
    pub base_url: String,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub webflow: WebflowConfig,
    /// Snapshot time-to-live in seconds
    pub cache_ttl_secs: u32,
    /// Port the HTTP server listens on
    pub port: u16,
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    ///
    /// Empty values count as unset, so optional settings fall back to their
    /// defaults and required ones are reported as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let collection_id = get("WEBFLOW_BOOKKEEPERS_COLLECTION_ID")
            .ok_or(ConfigError::Missing("WEBFLOW_BOOKKEEPERS_COLLECTION_ID"))?;
        let api_token =
            get("WEBFLOW_API_TOKEN").ok_or(ConfigError::Missing("WEBFLOW_API_TOKEN"))?;
        let api_version =
            get("WEBFLOW_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let base_url = get("WEBFLOW_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let cache_ttl_secs = match get("CACHE_TTL_SECONDS") {
            Some(value) => parse_var("CACHE_TTL_SECONDS", value)?,
            None => match get("CACH_TTL_SECONDS") {
                Some(value) => parse_var("CACH_TTL_SECONDS", value)?,
                None => DEFAULT_CACHE_TTL_SECS,
            },
        };

        let port = match get("PORT") {
            Some(value) => parse_var("PORT", value)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            webflow: WebflowConfig {
                collection_id,
                api_token,
                api_version,
                base_url,
            },
            cache_ttl_secs,
            port,
        })
    }

    /// Snapshot time-to-live
    pub fn cache_ttl(&self) -> Duration {
        Duration::seconds(i64::from(self.cache_ttl_secs))
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}
