//! Game id → interface handle selection.
//!
//! Both selectors share one shape: no mapping means no interface (`Ok(None)`),
//! a recognised kind builds the matching handle, an unrecognised kind falls
//! back to a default with a warning. The defaults differ on purpose:
//! data interfaces fall back to SQL, coding interfaces to the warehouse.

use tracing::{info, warn};

use super::{CodingInterface, DataInterface, InterfaceError, SqlInterface, WarehouseInterface};
use crate::config::{GatewayConfig, InterfaceKind};

/// Select the data interface serving `game_id`.
///
/// Returns `Ok(None)` when the game has no source mapping. `Err` only when a
/// mapped backend has no connection settings.
pub fn select_interface(
    game_id: &str,
    config: &GatewayConfig,
) -> Result<Option<DataInterface>, InterfaceError> {
    let Some(mapping) = config.source_mapping(game_id) else {
        return Ok(None);
    };

    let iface = match &mapping.interface {
        InterfaceKind::Sql => {
            info!(game_id, "Using SQL interface");
            DataInterface::Sql(SqlInterface::new(game_id, mapping, config)?)
        }
        InterfaceKind::Warehouse => {
            info!(game_id, "Using warehouse interface");
            DataInterface::Warehouse(WarehouseInterface::new(game_id, mapping, config)?)
        }
        InterfaceKind::Other(tag) => {
            warn!(game_id, interface = %tag, "Could not find a valid interface, defaulting to SQL");
            DataInterface::Sql(SqlInterface::new(game_id, mapping, config)?)
        }
    };
    Ok(Some(iface))
}

/// Select the coding-data interface serving `game_id`.
///
/// Coding data only exists in the warehouse; any kind other than
/// `Warehouse` still yields the warehouse handle, with a warning.
pub fn select_coding_interface(
    game_id: &str,
    config: &GatewayConfig,
) -> Result<Option<CodingInterface>, InterfaceError> {
    let Some(mapping) = config.source_mapping(game_id) else {
        return Ok(None);
    };

    if mapping.interface == InterfaceKind::Warehouse {
        info!(game_id, "Using warehouse coding interface");
    } else {
        warn!(
            game_id,
            interface = %mapping.interface,
            "Could not find a valid coding interface, defaulting to warehouse"
        );
    }
    let iface = WarehouseInterface::new(game_id, mapping, config)?;
    Ok(Some(CodingInterface::Warehouse(iface)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SourceMapping, SqlSettings, WarehouseSettings};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts WARN events seen while installed.
    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn warnings_during<T>(f: impl FnOnce() -> T) -> (T, usize) {
        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, counter.0.load(Ordering::SeqCst))
    }

    fn test_config() -> GatewayConfig {
        let mut config = GatewayConfig {
            sql: Some(SqlSettings {
                host: "db.local".to_string(),
                port: 3306,
                user: "reader".to_string(),
                password: None,
            }),
            warehouse: Some(WarehouseSettings {
                project_id: "analytics".to_string(),
                credential_path: None,
            }),
            ..GatewayConfig::default()
        };
        for (game, kind) in [("SQLGAME", "MySQL"), ("WHGAME", "BigQuery"), ("ODDGAME", "Cassandra")] {
            config.games.insert(game.to_string(), SourceMapping::new(kind));
        }
        config
    }

    #[test]
    fn test_sql_kind_selects_sql() {
        let iface = select_interface("SQLGAME", &test_config()).unwrap().unwrap();
        assert!(matches!(iface, DataInterface::Sql(_)));
        assert_eq!(iface.game_id(), "SQLGAME");
    }

    #[test]
    fn test_warehouse_kind_selects_warehouse() {
        let iface = select_interface("WHGAME", &test_config()).unwrap().unwrap();
        assert!(matches!(iface, DataInterface::Warehouse(_)));
    }

    #[test]
    fn test_unknown_kind_defaults_to_sql() {
        let iface = select_interface("ODDGAME", &test_config()).unwrap().unwrap();
        assert_eq!(iface.backend_name(), "sql");
    }

    #[test]
    fn test_coding_unknown_kind_defaults_to_warehouse() {
        let iface = select_coding_interface("ODDGAME", &test_config())
            .unwrap()
            .unwrap();
        assert!(matches!(iface, CodingInterface::Warehouse(_)));
        assert_eq!(iface.game_id(), "ODDGAME");
    }

    #[test]
    fn test_unknown_kind_fallback_logs_one_warning() {
        let config = test_config();

        let (iface, warnings) = warnings_during(|| select_interface("ODDGAME", &config));
        assert!(matches!(iface, Ok(Some(DataInterface::Sql(_)))));
        assert_eq!(warnings, 1);

        let (iface, warnings) = warnings_during(|| select_coding_interface("ODDGAME", &config));
        assert!(matches!(iface, Ok(Some(CodingInterface::Warehouse(_)))));
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_recognised_kinds_do_not_warn() {
        let config = test_config();
        for game in ["SQLGAME", "WHGAME"] {
            let (iface, warnings) = warnings_during(|| select_interface(game, &config));
            assert!(iface.unwrap().is_some());
            assert_eq!(warnings, 0, "{game}");
        }
        let (_, warnings) = warnings_during(|| select_coding_interface("WHGAME", &config));
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_coding_sql_kind_still_uses_warehouse() {
        let iface = select_coding_interface("SQLGAME", &test_config())
            .unwrap()
            .unwrap();
        assert!(matches!(iface, CodingInterface::Warehouse(_)));
    }

    #[test]
    fn test_absent_game_yields_none_for_both_selectors() {
        let config = test_config();
        assert_eq!(select_interface("NOPE", &config).unwrap(), None);
        assert_eq!(select_coding_interface("NOPE", &config).unwrap(), None);
        // Even with no backend settings at all.
        let bare = GatewayConfig::default();
        assert_eq!(select_interface("NOPE", &bare).unwrap(), None);
        assert_eq!(select_coding_interface("NOPE", &bare).unwrap(), None);
    }

    #[test]
    fn test_mapped_game_without_settings_is_error() {
        let mut config = GatewayConfig::default();
        config
            .games
            .insert("WHGAME".to_string(), SourceMapping::new("BigQuery"));
        assert_eq!(
            select_interface("WHGAME", &config).unwrap_err(),
            InterfaceError::MissingWarehouseSettings("WHGAME".to_string())
        );
    }
}
