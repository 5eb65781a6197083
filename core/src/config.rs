//! Client configuration.
//!
//! # Design
//! Host, API version and timeout are the only tunable parameters. A
//! `ClientConfig` is read once and handed to the client at construction, so
//! several clients with different settings can live in one process.

use std::env;
use std::time::Duration;

use crate::error::ClientError;

pub const DEFAULT_HOST: &str = "http://localhost:8080/";
pub const DEFAULT_API_VERSION: &str = "v1/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

pub const HOST_ENV: &str = "ACCOUNT_API_HOST";
pub const API_VERSION_ENV: &str = "ACCOUNT_API_VERSION";
pub const TIMEOUT_ENV: &str = "ACCOUNT_API_TIMEOUT_MS";

/// Connection settings for the accounts API.
///
/// `host` carries the scheme, hostname and optional port and ends with `/`,
/// e.g. `http://localhost:8080/`. `api_version` is appended directly after
/// it and ends with `/`, e.g. `v1/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(host: &str) -> Self {
        Self::default().with_host(host)
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Defaults overridden by `ACCOUNT_API_HOST`, `ACCOUNT_API_VERSION` and
    /// `ACCOUNT_API_TIMEOUT_MS` when set.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Self::default();
        if let Some(host) = lookup(HOST_ENV) {
            config.host = host;
        }
        if let Some(api_version) = lookup(API_VERSION_ENV) {
            config.api_version = api_version;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|e| ClientError::Config(format!("{TIMEOUT_ENV}={raw:?}: {e}")))?;
            config.timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }
}
