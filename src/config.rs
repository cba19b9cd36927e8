//! Client configuration parsed from environment variables.

use std::time::Duration;

use crate::api::DEFAULT_REQUEST_TIMEOUT;
use crate::navigation::EXPIRED_REDIRECT_DELAY;
use crate::toolkit::{DEFAULT_IDENTITY_BASE_URL, DEFAULT_TOKEN_BASE_URL, ToolkitEndpoints};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

pub const API_BASE_URL_VAR: &str = "POSTGATE_API_BASE_URL";
pub const API_KEY_VAR: &str = "POSTGATE_API_KEY";
pub const IDENTITY_BASE_URL_VAR: &str = "POSTGATE_IDENTITY_BASE_URL";
pub const TOKEN_BASE_URL_VAR: &str = "POSTGATE_TOKEN_BASE_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "POSTGATE_REQUEST_TIMEOUT_SECS";
pub const EXPIRED_REDIRECT_VAR: &str = "POSTGATE_EXPIRED_REDIRECT_MS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin; empty means same-origin requests.
    pub api_base_url: String,
    pub api_key: String,
    pub identity_base_url: String,
    pub token_base_url: String,
    pub request_timeout: Duration,
    pub expired_redirect_delay: Duration,
}

impl ClientConfig {
    /// Compiled-in defaults around a known provider API key.
    #[must_use]
    pub fn with_defaults(api_key: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_key: api_key.into(),
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_owned(),
            token_base_url: DEFAULT_TOKEN_BASE_URL.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            expired_redirect_delay: EXPIRED_REDIRECT_DELAY,
        }
    }

    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `POSTGATE_API_KEY`
    ///
    /// Optional:
    /// - `POSTGATE_API_BASE_URL`: default `http://127.0.0.1:8000`
    /// - `POSTGATE_IDENTITY_BASE_URL`, `POSTGATE_TOKEN_BASE_URL`: public
    ///   identity-toolkit endpoints
    /// - `POSTGATE_REQUEST_TIMEOUT_SECS`: default 10
    /// - `POSTGATE_EXPIRED_REDIRECT_MS`: default 2000
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for a missing key or a malformed number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`Self::from_env`], reading through `lookup`.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for a missing key or a malformed number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &str| lookup(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_key = read(API_KEY_VAR).ok_or(ConfigError::Missing { var: API_KEY_VAR })?;
        let mut config = Self::with_defaults(api_key);

        if let Some(url) = read(API_BASE_URL_VAR) {
            config.api_base_url = url.trim_end_matches('/').to_owned();
        }
        if let Some(url) = read(IDENTITY_BASE_URL_VAR) {
            config.identity_base_url = url.trim_end_matches('/').to_owned();
        }
        if let Some(url) = read(TOKEN_BASE_URL_VAR) {
            config.token_base_url = url.trim_end_matches('/').to_owned();
        }
        if let Some(raw) = read(REQUEST_TIMEOUT_VAR) {
            config.request_timeout = Duration::from_secs(parse_u64(REQUEST_TIMEOUT_VAR, raw)?);
        }
        if let Some(raw) = read(EXPIRED_REDIRECT_VAR) {
            config.expired_redirect_delay = Duration::from_millis(parse_u64(EXPIRED_REDIRECT_VAR, raw)?);
        }
        Ok(config)
    }

    #[must_use]
    pub fn endpoints(&self) -> ToolkitEndpoints {
        ToolkitEndpoints {
            identity_base_url: self.identity_base_url.clone(),
            token_base_url: self.token_base_url.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

fn parse_u64(var: &'static str, raw: String) -> Result<u64, ConfigError> {
    raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber { var, value: raw })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
