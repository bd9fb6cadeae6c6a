//! Unexpected-path errors.
//!
//! Locally handled outcomes (unknown game, short export result) never travel
//! as `Err`; they become ERROR envelopes directly. `GatewayError` carries the
//! failures that surface as SERVER_ERROR at the endpoint boundary.

use crate::export::ExportError;
use crate::interfaces::InterfaceError;

/// Failures that abort a request and are reported as a server error.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("interface construction failed: {0}")]
    Interface(#[from] InterfaceError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}
