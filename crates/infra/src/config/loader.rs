//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Read a `.env` file from the working directory, if any (`dotenvy`)
//! 2. Attempt to load from environment variables
//! 3. If `VELLUM_URL` is missing, probe for a config file
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `VELLUM_URL`: Base URL of the CMS API (required)
//! - `VELLUM_REALTIME_URL`: Realtime endpoint override
//! - `VELLUM_TIMEOUT_SECS`: Request timeout in seconds
//! - `VELLUM_MAX_ATTEMPTS`: Attempts per request including the first
//! - `VELLUM_STATIC_TOKEN`: Static API token
//! - `VELLUM_TOKEN_STORE`: `memory`, `keychain` or `file`
//! - `VELLUM_TOKEN_FILE`: Token file path for the `file` store
//! - `VELLUM_KEYCHAIN_SERVICE` / `VELLUM_KEYCHAIN_ACCOUNT`: Keychain entry
//!   names for the `keychain` store
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./vellum.toml`, `./vellum.json`, `./config.toml`, `./config.json`
//! 2. The same names in the parent directory
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use vellum_domain::constants::{
    DEFAULT_KEYCHAIN_ACCOUNT, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS,
};
use vellum_domain::{ClientConfig, Result, TokenStorageConfig, VellumError};

use crate::errors::InfraError;

const MISSING_VAR: &str = "Missing required environment variable";

const CONFIG_FILE_NAMES: [&str; 4] = ["vellum.toml", "vellum.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// Loads from environment variables when `VELLUM_URL` is set, otherwise
/// from the first config file found.
///
/// # Errors
/// Returns `VellumError::Config` if:
/// - An environment variable holds an invalid value
/// - No config file is found, or the file is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<ClientConfig> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            tracing::warn!(error = %err, "Ignoring unreadable .env file");
        }
    }

    let config = if optional_env("VELLUM_URL").is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        config
    } else {
        tracing::debug!("VELLUM_URL not set, trying config file");
        load_from_file(None)?
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `VELLUM_URL` is required; every other variable falls back to its default.
///
/// # Errors
/// Returns `VellumError::Config` if `VELLUM_URL` is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::new(env_var("VELLUM_URL")?);

    config.realtime_url = optional_env("VELLUM_REALTIME_URL");
    config.timeout_secs = parse_env("VELLUM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
    config.max_attempts = parse_env("VELLUM_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
    config.static_token = optional_env("VELLUM_STATIC_TOKEN");
    config.tokens = token_storage_from_env()?;

    Ok(config)
}

fn token_storage_from_env() -> Result<TokenStorageConfig> {
    let kind = optional_env("VELLUM_TOKEN_STORE").unwrap_or_else(|| "memory".to_string());

    match kind.to_ascii_lowercase().as_str() {
        "memory" => Ok(TokenStorageConfig::Memory),
        "keychain" => Ok(TokenStorageConfig::Keychain {
            service: optional_env("VELLUM_KEYCHAIN_SERVICE")
                .unwrap_or_else(|| DEFAULT_KEYCHAIN_SERVICE.to_string()),
            account: optional_env("VELLUM_KEYCHAIN_ACCOUNT")
                .unwrap_or_else(|| DEFAULT_KEYCHAIN_ACCOUNT.to_string()),
        }),
        "file" => Ok(TokenStorageConfig::File { path: PathBuf::from(env_var("VELLUM_TOKEN_FILE")?) }),
        other => Err(VellumError::Config(format!("Unknown token store '{other}'"))),
    }
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `VellumError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VellumError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            VellumError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VellumError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
pub fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VellumError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(VellumError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe standard paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    optional_env(key).ok_or_else(|| VellumError::Config(format!("{MISSING_VAR}: {key}")))
}

/// Non-empty environment variable, if set.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| VellumError::Config(format!("Invalid value for {key} '{raw}': {e}"))),
        None => Ok(default),
    }
}
