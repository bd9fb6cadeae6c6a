//! System-wide default constants.
//!
//! Centralises the values the gateway falls back to when neither the config
//! file nor the request supplies one.

// ============================================================================
// Environment
// ============================================================================

/// Environment variable holding the path of the gateway TOML config.
pub const CONFIG_ENV_VAR: &str = "GATEWAY_CONFIG";

/// Config file looked up in the working directory when `GATEWAY_CONFIG` is unset.
pub const LOCAL_CONFIG_FILE: &str = "gateway_config.toml";

/// Environment variable naming an extra log file to append to.
pub const LOG_FILE_ENV_VAR: &str = "GATEWAY_LOG_FILE";

/// Comma-separated list of origins allowed by the CORS layer.
pub const CORS_ORIGINS_ENV_VAR: &str = "GATEWAY_CORS_ORIGINS";

// ============================================================================
// Server
// ============================================================================

/// HTTP bind address used when the config does not name one.
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

/// Log filter used when `RUST_LOG` is unset and the config has no level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// Requests
// ============================================================================

/// Width of the default query window, ending at "now" (hours).
pub const DEFAULT_WINDOW_HOURS: i64 = 1;

/// Default MySQL port for SQL-backed interfaces.
pub const DEFAULT_SQL_PORT: u16 = 3306;
