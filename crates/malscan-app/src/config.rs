//! Client configuration loaded from environment variables.

use std::time::Duration;

use malscan_transport::{HttpOptions, validate_base_url};
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Default values used when a variable is unset.
pub mod defaults {
    /// Backend base URL.
    pub const API_BASE_URL: &str = "http://localhost:8000";
    /// Status poll interval.
    pub const POLL_INTERVAL_MS: u64 = 2_000;
    /// Health probe interval.
    pub const HEALTH_INTERVAL_MS: u64 = 10_000;
    /// Whole-request timeout.
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;
    /// Consecutive transient status failures tolerated before giving up.
    pub const STATUS_RETRY_BUDGET: u32 = 0;
    /// Health probe path.
    pub const HEALTH_PATH: &str = "/health";
}

/// Runtime configuration of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without trailing slash.
    pub api_base_url: String,
    /// Interval between status polls of a tracking session.
    pub poll_interval: Duration,
    /// Interval between health probes.
    pub health_interval: Duration,
    /// Whole-request timeout of the HTTP client.
    pub request_timeout: Duration,
    /// Consecutive transient status failures tolerated before the tracker
    /// enters its error state.
    pub status_retry_budget: u32,
    /// Health probe path.
    pub health_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: defaults::API_BASE_URL.to_string(),
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
            health_interval: Duration::from_millis(defaults::HEALTH_INTERVAL_MS),
            request_timeout: Duration::from_millis(defaults::REQUEST_TIMEOUT_MS),
            status_retry_budget: defaults::STATUS_RETRY_BUDGET,
            health_path: defaults::HEALTH_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a local `.env` file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a variable is present but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a variable is present but unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_base_url = lookup("MALSCAN_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| defaults::API_BASE_URL.to_string());
        let api_base_url = validate_base_url(&raw_base_url)
            .map_err(|error| ConfigError::InvalidBaseUrl(error.to_string()))?
            .as_str()
            .trim_end_matches('/')
            .to_string();

        if !is_https_endpoint(&api_base_url) {
            warn!(%api_base_url, "backend URL is not HTTPS; traffic is unencrypted");
        }

        let health_path = lookup("MALSCAN_HEALTH_PATH")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| defaults::HEALTH_PATH.to_string());

        Ok(Self {
            api_base_url,
            poll_interval: millis(&lookup, "MALSCAN_POLL_INTERVAL_MS", defaults::POLL_INTERVAL_MS)?,
            health_interval: millis(
                &lookup,
                "MALSCAN_HEALTH_INTERVAL_MS",
                defaults::HEALTH_INTERVAL_MS,
            )?,
            request_timeout: millis(
                &lookup,
                "MALSCAN_REQUEST_TIMEOUT_MS",
                defaults::REQUEST_TIMEOUT_MS,
            )?,
            status_retry_budget: match lookup("MALSCAN_STATUS_RETRY_BUDGET") {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "MALSCAN_STATUS_RETRY_BUDGET",
                    value: raw,
                })?,
                None => defaults::STATUS_RETRY_BUDGET,
            },
            health_path,
        })
    }

    /// Returns HTTP client options derived from this configuration.
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            request_timeout: self.request_timeout,
            health_path: self.health_path.clone(),
            ..HttpOptions::default()
        }
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default_ms: u64,
) -> Result<Duration, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(Duration::from_millis(default_ms));
    };

    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(Duration::from_millis(value)),
        _ => Err(ConfigError::InvalidValue { key, value: raw }),
    }
}

/// Returns `true` when endpoint URL is HTTPS.
pub fn is_https_endpoint(endpoint: &str) -> bool {
    Url::parse(endpoint)
        .map(|url| url.scheme() == "https")
        .unwrap_or(false)
}

/// Configuration loading failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Variable present but not a valid value.
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value found.
        value: String,
    },
    /// Base URL is not an absolute http/https URL.
    #[error("invalid MALSCAN_API_BASE_URL: {0}")]
    InvalidBaseUrl(String),
}
