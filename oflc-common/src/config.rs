//! Configuration loading and path resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment handling lives in the binary (clap); this module
//! provides the TOML layer, the defaults, and the merge helpers.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory name under the platform config/data directories
const APP_DIR: &str = "oflc";

/// Default config file name
const CONFIG_FILE_NAME: &str = "oflc-wage.toml";

/// Default database file name inside the data directory
pub const DATABASE_FILE_NAME: &str = "wage_data.db";

/// Bootstrap configuration loaded from TOML file
///
/// Every key is optional. Missing keys fall back to the compiled defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Path to the SQLite reference store
    pub database_path: Option<PathBuf>,

    /// Directory holding the three source CSV files
    pub data_dir: Option<PathBuf>,

    /// HTTP bind address
    pub host: String,

    /// HTTP server port
    pub port: u16,

    /// Upper bound on each store lookup, in milliseconds
    pub query_timeout_ms: u64,

    /// Build the store from `data_dir` at startup when it is missing
    pub auto_init: bool,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            data_dir: None,
            host: default_host(),
            port: default_port(),
            query_timeout_ms: default_query_timeout_ms(),
            auto_init: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Query timeout as a `Duration`
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_query_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Config file that [`load_toml_config`] reads, if any
///
/// An explicit path is returned as given; otherwise the platform default location,
/// only when a file exists there.
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    }
}

/// Load the TOML configuration
///
/// An explicitly requested file must exist and parse. When no path is given the
/// platform default location is tried, and a missing file there yields defaults.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = config_file_path(explicit) else {
        return Ok(TomlConfig::default());
    };
    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Parse configuration from TOML text
pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Platform config file location (`<config_dir>/oflc/oflc-wage.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Platform data directory (`<data_local_dir>/oflc`)
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./oflc_data"))
}

/// Pick the first configured path
///
/// `override_path` carries the command-line or environment value (clap merges both),
/// `toml_path` the config file value, and `fallback` computes the default.
pub fn resolve_path(
    override_path: Option<&Path>,
    toml_path: Option<&Path>,
    fallback: impl FnOnce() -> PathBuf,
) -> PathBuf {
    override_path
        .or(toml_path)
        .map(Path::to_path_buf)
        .unwrap_or_else(fallback)
}
