//! Gateway Configuration Module
//!
//! Provides the process-wide settings loaded from TOML: bind address, logging,
//! the export pipeline endpoint, backing data-source credentials and the
//! per-game source mapping.
//!
//! ## Loading Order
//!
//! 1. `GATEWAY_CONFIG` environment variable (path to TOML file)
//! 2. `gateway_config.toml` in the current working directory
//! 3. Built-in defaults (no games mapped)
//!
//! ## Usage
//!
//! The config is loaded once in `main()`, wrapped in an `Arc` and handed to
//! the router state. Handlers read it through the state; there is no global.
//!
//! ```ignore
//! let config = Arc::new(GatewayConfig::load());
//! let app = api::create_app(GatewayState::new(config, export_manager));
//! ```

mod gateway_config;
pub mod defaults;
pub mod validation;

pub use gateway_config::*;
