//! Bootstrap configuration loading
//!
//! Resolution priority, highest first:
//! 1. Command-line arguments / environment (handled by the binary's clap parser)
//! 2. TOML config file
//! 3. OS-dependent compiled defaults
//!
//! A missing config file is not an error; a malformed one is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Contents of the TOML config file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Bind address
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP port
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values used when neither the command line nor the config file sets them
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            database_path: default_database_path(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: default_log_level(),
        }
    }
}

/// `<data dir>/fyyur/fyyur.db`, falling back to the working directory
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fyyur"))
        .unwrap_or_else(|| PathBuf::from("./fyyur_data"))
        .join("fyyur.db")
}

/// `<config dir>/fyyur/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fyyur").join("config.toml"))
}

/// Command-line (or environment) values that override the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Read a TOML config file; Ok(None) if it does not exist
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content).map_err(|e| {
        Error::Config(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    Ok(Some(config))
}

/// Fully resolved bootstrap settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Config file that was actually read, if any
    pub config_file: Option<PathBuf>,
}

impl BootstrapConfig {
    /// Merge overrides, the config file (if any) and compiled defaults
    pub fn resolve(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let loaded = match config_path {
            Some(path) => load_toml_config(path)?.map(|config| (path.to_path_buf(), config)),
            None => None,
        };

        let (config_file, file) = match loaded {
            Some((path, config)) => (Some(path), config),
            None => (None, TomlConfig::default()),
        };

        let mut config = Self::merge(file, overrides, CompiledDefaults::for_current_platform());
        config.config_file = config_file;
        Ok(config)
    }

    fn merge(file: TomlConfig, overrides: ConfigOverrides, defaults: CompiledDefaults) -> Self {
        Self {
            database_path: overrides
                .database_path
                .or(file.database_path)
                .unwrap_or(defaults.database_path),
            host: overrides.host.or(file.host).unwrap_or(defaults.host),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            log_level: overrides
                .log_level
                .or(file.logging.level)
                .unwrap_or(defaults.log_level),
            config_file: None,
        }
    }
}
