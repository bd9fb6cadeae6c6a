//! API route handlers
//!
//! - Population-level metrics per game
//! - Hello endpoints (smoke tests for clients)
//! - Liveness

mod health;
mod hello;
mod population;

pub use health::*;
pub use hello::*;
pub use population::*;

use std::sync::Arc;
use std::time::Instant;

use crate::config::GatewayConfig;
use crate::export::ExportManager;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers. Read-only after startup.
#[derive(Clone)]
pub struct GatewayState {
    /// Immutable process-wide configuration
    pub config: Arc<GatewayConfig>,
    /// Export pipeline client
    pub export_manager: Arc<dyn ExportManager>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(config: Arc<GatewayConfig>, export_manager: Arc<dyn ExportManager>) -> Self {
        Self {
            config,
            export_manager,
            started_at: Instant::now(),
        }
    }
}
