//! Configuration management for nxsweep

use crate::error::{Error, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration directory name
const CONFIG_DIR: &str = "nxsweep";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub nexus: NexusConfig,
    pub advanced: Option<AdvancedConfig>,
    pub logging: Option<LoggingConfig>,
}

/// Nexus server and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NexusConfig {
    pub url: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
}

/// Advanced configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Ceiling on listing pages per walk (unbounded when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            max_pages: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Values given on the command line or through the environment.
///
/// Each one that is set wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<u64>,
    pub max_pages: Option<usize>,
}

impl Overrides {
    fn is_complete(&self) -> bool {
        self.url.is_some() && self.user.is_some()
    }
}

impl ConfigFile {
    /// Request timeout, falling back to the default
    pub fn timeout(&self) -> Duration {
        let secs = self
            .advanced
            .as_ref()
            .map(|a| a.timeout)
            .unwrap_or_else(default_timeout);
        Duration::from_secs(secs)
    }

    /// Configured page ceiling, if any
    pub fn max_pages(&self) -> Option<usize> {
        self.advanced.as_ref().and_then(|a| a.max_pages)
    }

    /// Configured log level, if any
    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().map(|l| l.level.as_str())
    }

    fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.url {
            self.nexus.url = url;
        }
        if let Some(user) = overrides.user {
            self.nexus.user = user;
        }
        if let Some(password) = overrides.password {
            self.nexus.password = password;
        }
        if overrides.timeout.is_some() || overrides.max_pages.is_some() {
            let advanced = self.advanced.get_or_insert_with(AdvancedConfig::default);
            if let Some(timeout) = overrides.timeout {
                advanced.timeout = timeout;
            }
            if overrides.max_pages.is_some() {
                advanced.max_pages = overrides.max_pages;
            }
        }
        self
    }
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let home = home_dir().ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR))
}

/// Get the configuration file path
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Load configuration from the default location
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&get_config_path()?)
}

/// Load configuration from `path`
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Err(Error::ConfigNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        Error::InvalidConfig(format!("Failed to read config file: {}", e))
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| {
        Error::InvalidConfig(format!("Failed to parse config file: {}", e))
    })?;

    Ok(config)
}

/// Combine the config file at `path` (if present) with `overrides`.
///
/// The file may be missing when the overrides alone name a server and a user.
pub fn resolve_config(path: &Path, overrides: Overrides) -> Result<ConfigFile> {
    let base = match load_config_from(path) {
        Ok(config) => config,
        Err(Error::ConfigNotFound(_)) if overrides.is_complete() => ConfigFile {
            nexus: NexusConfig {
                url: String::new(),
                user: String::new(),
                password: String::new(),
            },
            advanced: None,
            logging: None,
        },
        Err(e) => return Err(e),
    };

    Ok(base.apply(overrides))
}

/// Save configuration to `path`
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
    }

    let content = toml::to_string_pretty(config)?;

    fs::write(path, content).map_err(|e| {
        Error::Config(format!("Failed to write config file: {}", e))
    })?;

    // Credentials live in this file: owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    let url = config.nexus.url.trim();
    if url.is_empty() {
        return Err(Error::Config("Nexus URL is not configured".to_string()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::InvalidConfig(format!(
            "Nexus URL must start with http:// or https:// (got '{}')",
            url
        )));
    }

    if config.nexus.user.is_empty() {
        return Err(Error::Config("Nexus user is not configured".to_string()));
    }

    if let Some(advanced) = &config.advanced {
        if advanced.timeout == 0 {
            return Err(Error::InvalidConfig("Timeout must be at least 1 second".to_string()));
        }
        if advanced.max_pages == Some(0) {
            return Err(Error::InvalidConfig("max_pages must be at least 1".to_string()));
        }
    }

    Ok(())
}
