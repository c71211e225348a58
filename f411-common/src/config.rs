//! Configuration loading and value resolution
//!
//! Values resolve with the following priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Logging section of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter ("error", "warn", "info", "debug", "trace")
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// On-disk TOML configuration (`~/.config/f411/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the Flying411 REST API
    pub api_base_url: Option<String>,

    /// Bearer token for API authentication
    pub api_token: Option<String>,

    /// Default page size for row listings
    pub page_size: Option<u32>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LogConfig,
}

/// Get configuration file path for the platform
///
/// Linux tries `~/.config/f411/config.toml` first, then
/// `/etc/f411/config.toml`. Other platforms use the OS config directory.
pub fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("f411").join("config.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = &user_config {
            if path.exists() {
                return Ok(path.clone());
            }
        }
        let system_config = PathBuf::from("/etc/f411/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        // Fall through to the user path even if absent, so callers can
        // report where the file was expected.
    }

    user_config.ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Load the TOML config, returning defaults when no file exists
pub fn load_toml_config() -> TomlConfig {
    load_toml_config_from(config_file_path().ok())
}

/// Load the TOML config from an explicit path (None = defaults)
pub fn load_toml_config_from(path: Option<PathBuf>) -> TomlConfig {
    let Some(path) = path else {
        return TomlConfig::default();
    };
    if !path.exists() {
        return TomlConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Parse failed for {}: {} (using defaults)", path.display(), e);
                TomlConfig::default()
            }
        },
        Err(e) => {
            warn!("Read failed for {}: {} (using defaults)", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Write the TOML config (write-to-temp then rename)
pub fn write_toml_config(config: &TomlConfig, path: &PathBuf) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Resolve one string-valued setting following the priority order
pub fn resolve_string(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
    default: Option<&str>,
) -> Option<String> {
    if let Some(v) = cli_arg {
        return Some(v.to_string());
    }
    if let Ok(v) = std::env::var(env_var_name) {
        if !v.trim().is_empty() {
            return Some(v);
        }
    }
    if let Some(v) = toml_value {
        if !v.trim().is_empty() {
            return Some(v.to_string());
        }
    }
    default.map(|v| v.to_string())
}

/// Count how many sources define a setting (for misconfiguration warnings)
pub fn sources_defining(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
) -> Vec<&'static str> {
    let mut sources = Vec::new();
    if cli_arg.is_some() {
        sources.push("command line");
    }
    if std::env::var(env_var_name).map(|v| !v.trim().is_empty()).unwrap_or(false) {
        sources.push("environment");
    }
    if toml_value.map(|v| !v.trim().is_empty()).unwrap_or(false) {
        sources.push("TOML");
    }
    sources
}
