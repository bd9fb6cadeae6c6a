//! Game Analytics Gateway
//!
//! Thin HTTP gateway in front of an external analytics export pipeline.
//!
//! ## Architecture
//!
//! - **Config**: immutable per-process settings and the game → source mapping
//! - **Interfaces**: closed set of backing data-source handles (SQL, warehouse)
//! - **Export**: request/result contract with the external export manager
//! - **Shaping**: tabular export result → envelope payload
//! - **API**: Axum routes, parameter parsing and the response envelope

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod interfaces;
pub mod logging;
pub mod shaping;

// Re-export configuration
pub use config::{GatewayConfig, InterfaceKind, SourceMapping};

// Re-export the request/response contract
pub use api::envelope::{ResponseEnvelope, ResponseStatus, RestMethod};
pub use error::GatewayError;
pub use export::{
    ExportError, ExportManager, ExportOutputs, ExportRange, ExportRequest, ExportResult,
    OutputKind, OutputLocation,
};

// Re-export interface selection
pub use interfaces::{
    select_coding_interface, select_interface, CodingInterface, DataInterface, InterfaceError,
};
