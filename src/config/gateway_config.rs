//! Gateway Configuration - server, logging, export pipeline and source mapping
//!
//! Every section implements `Default`, so a missing file or a partial file
//! still yields a usable (if game-less) configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a gateway deployment.
///
/// Load with `GatewayConfig::load()` which searches:
/// 1. `$GATEWAY_CONFIG` env var
/// 2. `./gateway_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Log level, format and optional log file
    #[serde(default)]
    pub logging: LoggingConfig,

    /// External export pipeline
    #[serde(default)]
    pub export: ExportConfig,

    /// Connection settings shared by every SQL-backed game
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<SqlSettings>,

    /// Connection settings shared by every warehouse-backed game
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<WarehouseSettings>,

    /// Per-game source mapping, keyed by game id
    #[serde(default)]
    pub games: BTreeMap<String, SourceMapping>,
}

impl GatewayConfig {
    /// Load configuration using the standard search order:
    /// 1. `$GATEWAY_CONFIG` environment variable
    /// 2. `./gateway_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), games = config.games.len(), "Loaded gateway config from GATEWAY_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from GATEWAY_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "GATEWAY_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./gateway_config.toml
        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(games = config.games.len(), "Loaded gateway config from ./gateway_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./gateway_config.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No gateway_config.toml found, using built-in defaults (no games mapped)");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // Two-pass: check for unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(&contents) {
            warn!(path = %path.display(), "{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Look up the source mapping for a game.
    pub fn source_mapping(&self, game_id: &str) -> Option<&SourceMapping> {
        self.games.get(game_id)
    }

    /// Validate the config for internal consistency.
    ///
    /// All problems are collected so an operator sees every mistake at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.server.addr.parse::<SocketAddr>().is_err() {
            errors.push(format!(
                "server.addr = '{}' is not a valid socket address",
                self.server.addr
            ));
        }

        if let Some(endpoint) = &self.export.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                errors.push(format!(
                    "export.endpoint = '{endpoint}' must start with http:// or https://"
                ));
            }
        }
        if self.export.timeout_secs == Some(0) {
            errors.push("export.timeout_secs must be greater than 0".to_string());
        }

        if let Some(sql) = &self.sql {
            if sql.host.trim().is_empty() {
                errors.push("sql.host must not be empty".to_string());
            }
            if sql.port == 0 {
                errors.push("sql.port must be greater than 0".to_string());
            }
        }

        if let Some(wh) = &self.warehouse {
            if wh.project_id.trim().is_empty() {
                errors.push("warehouse.project_id must not be empty".to_string());
            }
        }

        for (game_id, mapping) in &self.games {
            if game_id.trim().is_empty() {
                errors.push("games: game id must not be empty".to_string());
            }
            if let InterfaceKind::Other(tag) = &mapping.interface {
                // Not fatal: the selectors fall back to a default interface.
                warn!(game_id = %game_id, interface = %tag, "Unrecognised interface kind in source mapping");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

fn default_server_addr() -> String {
    defaults::DEFAULT_SERVER_ADDR.to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`.
    #[serde(default)]
    pub format: LogFormat,

    /// Additional file to append log lines to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    defaults::DEFAULT_LOG_LEVEL.to_string()
}

/// Where the external export pipeline lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Base URL of the export service. `None` disables exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Adapter-level request timeout (seconds). `None` waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// SQL (MySQL) connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlSettings {
    pub host: String,
    #[serde(default = "default_sql_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn default_sql_port() -> u16 {
    defaults::DEFAULT_SQL_PORT
}

/// Columnar warehouse (BigQuery) settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseSettings {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_path: Option<PathBuf>,
}

// ============================================================================
// Source Mapping
// ============================================================================

/// Which backing interface serves a game.
///
/// Deserialised from the free-form `interface` tag; anything that is not a
/// recognised SQL or warehouse tag is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InterfaceKind {
    Sql,
    Warehouse,
    Other(String),
}

impl From<String> for InterfaceKind {
    fn from(tag: String) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "mysql" | "sql" => Self::Sql,
            "bigquery" | "warehouse" => Self::Warehouse,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for InterfaceKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<InterfaceKind> for String {
    fn from(kind: InterfaceKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql => write!(f, "MySQL"),
            Self::Warehouse => write!(f, "BigQuery"),
            Self::Other(tag) => write!(f, "{tag}"),
        }
    }
}

/// Per-game source mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMapping {
    /// Backing interface kind
    pub interface: InterfaceKind,

    /// Database / dataset name (defaults to the lowercased game id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Table name (defaults to the game id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl SourceMapping {
    pub fn new(interface: impl Into<InterfaceKind>) -> Self {
        Self {
            interface: interface.into(),
            database: None,
            table: None,
        }
    }

    /// Database name, falling back to the lowercased game id.
    pub fn database_for(&self, game_id: &str) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| game_id.to_ascii_lowercase())
    }

    /// Table name, falling back to the game id.
    pub fn table_for(&self, game_id: &str) -> String {
        self.table.clone().unwrap_or_else(|| game_id.to_string())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),
    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),
    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}
