//! Backing data-interface handles
//!
//! A handle describes how the export pipeline reaches one game's data. The
//! set of capabilities is closed: SQL-backed or warehouse-backed. Handles are
//! built per request from the immutable source mapping and never reused.
//!
//! - [`DataInterface`]: event/feature data, defaults to SQL
//! - [`CodingInterface`]: coding data, warehouse only

mod selector;
mod sql;
mod warehouse;

pub use selector::{select_coding_interface, select_interface};
pub use sql::SqlInterface;
pub use warehouse::WarehouseInterface;

use serde::Serialize;

/// Handle to the data source serving a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataInterface {
    Sql(SqlInterface),
    Warehouse(WarehouseInterface),
}

impl DataInterface {
    pub fn game_id(&self) -> &str {
        match self {
            Self::Sql(i) => &i.game_id,
            Self::Warehouse(i) => &i.game_id,
        }
    }

    /// Short name for logging.
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Sql(_) => "sql",
            Self::Warehouse(_) => "warehouse",
        }
    }
}

/// Handle to the source of coding (annotation) data for a game.
///
/// Coding data lives in the warehouse, so there is a single capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CodingInterface {
    Warehouse(WarehouseInterface),
}

impl CodingInterface {
    pub fn game_id(&self) -> &str {
        match self {
            Self::Warehouse(i) => &i.game_id,
        }
    }
}

/// Interface construction errors.
///
/// A mapped game whose backend has no connection settings is a deployment
/// mistake, not a caller error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterfaceError {
    #[error("game '{0}' is mapped to SQL but no [sql] settings are configured")]
    MissingSqlSettings(String),
    #[error("game '{0}' is mapped to the warehouse but no [warehouse] settings are configured")]
    MissingWarehouseSettings(String),
}
