//! SQL-backed interface handle.

use std::fmt;

use serde::Serialize;

use super::InterfaceError;
use crate::config::{GatewayConfig, SourceMapping};

/// Connection descriptor for a game stored in the SQL database.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SqlInterface {
    pub game_id: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub database: String,
    pub table: String,
}

impl SqlInterface {
    /// Build the handle from the game's mapping and the shared `[sql]` section.
    pub fn new(
        game_id: &str,
        mapping: &SourceMapping,
        config: &GatewayConfig,
    ) -> Result<Self, InterfaceError> {
        let sql = config
            .sql
            .as_ref()
            .ok_or_else(|| InterfaceError::MissingSqlSettings(game_id.to_string()))?;

        Ok(Self {
            game_id: game_id.to_string(),
            host: sql.host.clone(),
            port: sql.port,
            user: sql.user.clone(),
            password: sql.password.clone(),
            database: mapping.database_for(game_id),
            table: mapping.table_for(game_id),
        })
    }
}

// Keep credentials out of logs.
impl fmt::Debug for SqlInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlInterface")
            .field("game_id", &self.game_id)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .field("table", &self.table)
            .finish()
    }
}
