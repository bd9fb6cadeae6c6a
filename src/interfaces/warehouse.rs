//! Warehouse-backed (BigQuery) interface handle.

use std::path::PathBuf;

use serde::Serialize;

use super::InterfaceError;
use crate::config::{GatewayConfig, SourceMapping};

/// Descriptor for a game stored in the columnar warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseInterface {
    pub game_id: String,
    pub project_id: String,
    pub dataset: String,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_path: Option<PathBuf>,
}

impl WarehouseInterface {
    /// Build the handle from the game's mapping and the shared `[warehouse]` section.
    pub fn new(
        game_id: &str,
        mapping: &SourceMapping,
        config: &GatewayConfig,
    ) -> Result<Self, InterfaceError> {
        let wh = config
            .warehouse
            .as_ref()
            .ok_or_else(|| InterfaceError::MissingWarehouseSettings(game_id.to_string()))?;

        Ok(Self {
            game_id: game_id.to_string(),
            project_id: wh.project_id.clone(),
            dataset: mapping.database_for(game_id),
            table: mapping.table_for(game_id),
            credential_path: wh.credential_path.clone(),
        })
    }
}
