//! Export request/response contract with the external analytics pipeline
//!
//! The gateway does no analytics itself. It assembles an [`ExportRequest`]
//! (interface + time range + requested outputs + metric overrides), hands it
//! to an [`ExportManager`], and reads back the tabular [`ExportResult`].

mod manager;

pub use manager::{dispatch, DisabledExportManager, ExportManager, HttpExportManager};

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::interfaces::DataInterface;

// ============================================================================
// Request
// ============================================================================

/// Time window of an export, in UTC.
///
/// Carried exactly as given: a start after the end is not reordered or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ExportRange {
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }
}

/// Granularity of an export output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Events,
    Sessions,
    Players,
    Population,
}

/// Where export outputs are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLocation {
    File,
    InMemory,
}

/// Fixed declaration of which outputs an endpoint wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutputs {
    pub kinds: BTreeSet<OutputKind>,
    pub locations: BTreeSet<OutputLocation>,
}

impl ExportOutputs {
    pub fn new(
        kinds: impl IntoIterator<Item = OutputKind>,
        locations: impl IntoIterator<Item = OutputLocation>,
    ) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            locations: locations.into_iter().collect(),
        }
    }

    /// Population features only, returned in memory, no files written.
    pub fn population_in_memory() -> Self {
        Self::new([OutputKind::Population], [OutputLocation::InMemory])
    }
}

/// A complete request for the export pipeline. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRequest {
    pub interface: DataInterface,
    pub range: ExportRange,
    pub output_kinds: BTreeSet<OutputKind>,
    pub output_locations: BTreeSet<OutputLocation>,
    /// Metric names to compute. Empty means the pipeline's full default set.
    pub metric_overrides: Vec<String>,
}

impl ExportRequest {
    pub fn new(
        interface: DataInterface,
        range: ExportRange,
        outputs: ExportOutputs,
        metric_overrides: Vec<String>,
    ) -> Self {
        Self {
            interface,
            range,
            output_kinds: outputs.kinds,
            output_locations: outputs.locations,
            metric_overrides,
        }
    }

    /// True when no overrides were given and the pipeline's default metric
    /// set applies.
    pub fn requests_all_metrics(&self) -> bool {
        self.metric_overrides.is_empty()
    }
}

// ============================================================================
// Result
// ============================================================================

/// Tabular output of an export: ordered column names plus rows of values.
///
/// Row length is not guaranteed to match the column count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl ExportResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self { columns, rows }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Export pipeline failures
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no export endpoint is configured")]
    NotConfigured,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("export service returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),
    /// Failure reported by an [`ExportManager`] that does not speak HTTP,
    /// such as an in-process pipeline.
    #[error("export pipeline failure: {0}")]
    Pipeline(String),
}
