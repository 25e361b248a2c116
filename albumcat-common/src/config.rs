//! Configuration loading and resolution
//!
//! Every setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (folded into the CLI layer by the binary)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error; the server starts on defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ALBUMCAT_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "albumcat.toml";

/// Runtime flavour of the catalog host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    /// Local CMS API mounted, catalog writable
    #[default]
    #[serde(alias = "dev")]
    Development,
    /// Static snapshot only, no write path
    #[serde(alias = "prod")]
    Production,
}

impl AppMode {
    pub fn is_dev(self) -> bool {
        self == AppMode::Development
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppMode::Development => "development",
            AppMode::Production => "production",
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppMode::Development),
            "production" | "prod" => Ok(AppMode::Production),
            other => Err(format!(
                "unknown mode '{}' (expected 'development' or 'production')",
                other
            )),
        }
    }
}

/// `[logging]` table of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// On-disk TOML configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub mode: Option<AppMode>,
    pub catalog_path: Option<PathBuf>,
    pub covers_dir: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
    pub max_body_bytes: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values used when neither CLI, environment nor config file set a key
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub mode: AppMode,
    pub catalog_path: PathBuf,
    pub covers_dir: PathBuf,
    pub public_dir: PathBuf,
    pub max_body_bytes: usize,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn get() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5173,
            mode: AppMode::Development,
            catalog_path: PathBuf::from("src/data/catalog.json"),
            covers_dir: PathBuf::from("public/covers"),
            public_dir: PathBuf::from("public"),
            max_body_bytes: 25 * 1024 * 1024,
            log_level: default_log_level(),
        }
    }
}

/// Settings supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub mode: Option<AppMode>,
    pub catalog_path: Option<PathBuf>,
    pub covers_dir: Option<PathBuf>,
    pub public_dir: Option<PathBuf>,
    pub max_body_bytes: Option<usize>,
    pub log_level: Option<String>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub mode: AppMode,
    pub catalog_path: PathBuf,
    pub covers_dir: PathBuf,
    pub public_dir: PathBuf,
    pub max_body_bytes: usize,
    pub log_level: String,
}

impl ServerConfig {
    /// Merge overrides, config file and compiled defaults
    pub fn resolve(overrides: &ConfigOverrides, file: Option<&TomlConfig>) -> Self {
        let defaults = CompiledDefaults::get();
        let file = file.cloned().unwrap_or_default();

        Self {
            host: overrides.host.clone().or(file.host).unwrap_or(defaults.host),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            mode: overrides.mode.or(file.mode).unwrap_or(defaults.mode),
            catalog_path: overrides
                .catalog_path
                .clone()
                .or(file.catalog_path)
                .unwrap_or(defaults.catalog_path),
            covers_dir: overrides
                .covers_dir
                .clone()
                .or(file.covers_dir)
                .unwrap_or(defaults.covers_dir),
            public_dir: overrides
                .public_dir
                .clone()
                .or(file.public_dir)
                .unwrap_or(defaults.public_dir),
            max_body_bytes: overrides
                .max_body_bytes
                .or(file.max_body_bytes)
                .unwrap_or(defaults.max_body_bytes),
            log_level: overrides
                .log_level
                .clone()
                .unwrap_or(file.logging.level),
        }
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::resolve(&ConfigOverrides::default(), None)
    }
}

/// Find the config file to load, if any
///
/// An explicitly named file (argument or `ALBUMCAT_CONFIG`) must exist.
/// Otherwise `./albumcat.toml`, then `<config_dir>/albumcat/config.toml`;
/// `Ok(None)` when neither is present.
pub fn locate_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    if let Some(path) = named {
        if path.is_file() {
            return Ok(Some(path));
        }
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Ok(Some(local));
    }

    if let Some(user) = dirs::config_dir().map(|d| d.join("albumcat").join("config.toml")) {
        if user.is_file() {
            return Ok(Some(user));
        }
    }

    debug!("No config file found, using defaults");
    Ok(None)
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}
