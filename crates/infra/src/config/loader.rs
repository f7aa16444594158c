//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment, if one exists
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `PVEKIT_HOST`: Scheme, host and port (`https://pve.example.com:8006`)
//! - `PVEKIT_USERNAME`: User including realm (`root@pam`)
//! - `PVEKIT_PASSWORD`: Password
//! - `PVEKIT_VERIFY_TLS`: Verify the server certificate (true/false, default true)
//! - `PVEKIT_TIMEOUT_SECS`: Per-request timeout in seconds (default 30)
//! - `PVEKIT_MAX_ATTEMPTS`: Attempts per GET request (default 1)
//! - `PVEKIT_USER_AGENT`: `User-Agent` header override
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./pvekit.toml` or `./pvekit.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names in the parent and grandparent directory
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use pvekit_domain::{ClientConfig, PveError, Result};

pub const HOST_ENV: &str = "PVEKIT_HOST";
pub const USERNAME_ENV: &str = "PVEKIT_USERNAME";
pub const PASSWORD_ENV: &str = "PVEKIT_PASSWORD";
pub const VERIFY_TLS_ENV: &str = "PVEKIT_VERIFY_TLS";
pub const TIMEOUT_ENV: &str = "PVEKIT_TIMEOUT_SECS";
pub const MAX_ATTEMPTS_ENV: &str = "PVEKIT_MAX_ATTEMPTS";
pub const USER_AGENT_ENV: &str = "PVEKIT_USER_AGENT";

const CONFIG_FILE_NAMES: [&str; 4] = ["pvekit.toml", "pvekit.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables (after reading any
/// `.env` file). If a required variable is missing, falls back to loading
/// from a config file.
///
/// # Errors
/// Returns `PveError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ClientConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!(host = %config.host, "Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `PveError::Config` if required variables are missing
/// or optional ones have invalid values.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config =
        ClientConfig::new(env_var(HOST_ENV)?, env_var(USERNAME_ENV)?, env_var(PASSWORD_ENV)?);

    config.verify_tls = env_bool(VERIFY_TLS_ENV, config.verify_tls);
    if let Some(timeout) = env_parse::<u64>(TIMEOUT_ENV)? {
        config.timeout_secs = timeout;
    }
    if let Some(attempts) = env_parse::<usize>(MAX_ATTEMPTS_ENV)? {
        config.max_attempts = attempts;
    }
    if let Ok(agent) = std::env::var(USER_AGENT_ENV) {
        config.user_agent = agent;
    }

    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PveError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PveError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            PveError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PveError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path).and_then(validate)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PveError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| PveError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(PveError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn validate(config: ClientConfig) -> Result<ClientConfig> {
    let host = url::Url::parse(&config.host)
        .map_err(|e| PveError::Config(format!("Invalid host {:?}: {}", config.host, e)))?;
    if !matches!(host.scheme(), "http" | "https") {
        return Err(PveError::Config(format!("Host must use http or https: {}", config.host)));
    }
    if config.username.is_empty() {
        return Err(PveError::Config("Username must not be empty".to_string()));
    }
    if config.timeout_secs == 0 {
        return Err(PveError::Config("Timeout must be at least one second".to_string()));
    }
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, its parent and grandparent, then the
/// same relative to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| [root.clone(), root.join(".."), root.join("../..")])
        .flat_map(|dir| CONFIG_FILE_NAMES.map(|name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| PveError::Config(format!("Missing required environment variable: {}", key)))
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| PveError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Anything else counts as false.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
