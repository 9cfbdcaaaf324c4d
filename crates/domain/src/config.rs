//! Configuration management

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_KEYCHAIN_ACCOUNT, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_TIMEOUT_SECS, REALTIME_PATH,
};
use crate::errors::{Result, VellumError};

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the CMS API (e.g., "https://cms.example.com")
    pub base_url: String,

    /// Realtime endpoint; derived from `base_url` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtime_url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per request (initial try + retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Static API token used instead of login tokens
    #[serde(default, skip_serializing)]
    pub static_token: Option<String>,

    #[serde(default)]
    pub tokens: TokenStorageConfig,
}

/// Where login tokens are persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TokenStorageConfig {
    /// Process memory only
    #[default]
    Memory,
    /// Platform keychain
    Keychain {
        #[serde(default = "default_keychain_service")]
        service: String,
        #[serde(default = "default_keychain_account")]
        account: String,
    },
    /// JSON file on disk
    File { path: PathBuf },
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_keychain_service() -> String {
    DEFAULT_KEYCHAIN_SERVICE.to_string()
}

fn default_keychain_account() -> String {
    DEFAULT_KEYCHAIN_ACCOUNT.to_string()
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            realtime_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            static_token: None,
            tokens: TokenStorageConfig::Memory,
        }
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Check the configuration for values the client cannot work with.
    ///
    /// # Errors
    /// Returns `VellumError::Config` for an unparsable or non-HTTP base URL,
    /// a zero timeout or zero attempts.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| VellumError::Config(format!("Invalid base URL '{}': {e}", self.base_url)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(VellumError::Config(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(VellumError::Config("Timeout must be greater than zero".into()));
        }
        if self.max_attempts == 0 {
            return Err(VellumError::Config("max_attempts must be at least 1".into()));
        }
        if let Some(realtime) = &self.realtime_url {
            let parsed = Url::parse(realtime)
                .map_err(|e| VellumError::Config(format!("Invalid realtime URL: {e}")))?;
            if !matches!(parsed.scheme(), "ws" | "wss") {
                return Err(VellumError::Config("Realtime URL must use ws or wss".into()));
            }
        }
        Ok(())
    }

    /// Realtime endpoint: `realtime_url` if set, otherwise `base_url` with
    /// the scheme switched to `ws`/`wss` and `/websocket` appended.
    ///
    /// # Errors
    /// Returns `VellumError::Config` if the base URL cannot be parsed.
    pub fn realtime_endpoint(&self) -> Result<String> {
        if let Some(url) = &self.realtime_url {
            return Ok(url.clone());
        }

        let mut url = Url::parse(self.api_base())
            .map_err(|e| VellumError::Config(format!("Invalid base URL '{}': {e}", self.base_url)))?;

        let scheme = match url.scheme() {
            "https" => "wss",
            "http" => "ws",
            other => {
                return Err(VellumError::Config(format!("Cannot derive realtime URL from '{other}'")))
            }
        };
        url.set_scheme(scheme)
            .map_err(|()| VellumError::Config("Cannot switch URL scheme".into()))?;

        let path = format!("{}{}", url.path().trim_end_matches('/'), REALTIME_PATH);
        url.set_path(&path);
        Ok(url.to_string())
    }
}
