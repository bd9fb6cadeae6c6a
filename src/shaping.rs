//! Reshape tabular export results into envelope payloads.
//!
//! Population endpoints emit a single aggregate row. Upstream results may be
//! malformed (row shorter or longer than the column list); shaping only ever
//! reads the overlapping prefix and never fails on a length mismatch.

use serde_json::{Map, Value};
use tracing::warn;

use crate::api::envelope::ResponseEnvelope;
use crate::export::ExportResult;

/// Zip the column names with row 0 of `result`, truncated to the shorter of
/// the two. `None` when there is nothing to zip.
pub fn population_features(result: &ExportResult) -> Option<Map<String, Value>> {
    let row = result.rows.first()?;
    let count = result.columns.len().min(row.len());
    if count == 0 {
        return None;
    }
    if result.columns.len() != row.len() {
        warn!(
            columns = result.columns.len(),
            values = row.len(),
            "Population result has mismatched column and value counts, truncating"
        );
    }

    Some(
        result
            .columns
            .iter()
            .zip(row)
            .take(count)
            .map(|(col, val)| (col.clone(), val.clone()))
            .collect(),
    )
}

/// Apply a population export result to the request's envelope.
///
/// SUCCESS with the feature mapping, or ERROR when no feature could be read.
pub fn shape_population(result: &ExportResult, game_id: &str, envelope: &mut ResponseEnvelope) {
    match population_features(result) {
        Some(features) => {
            envelope.request_succeeded("SUCCESS: Generated population features", features);
        }
        None => {
            warn!(game_id, "Export returned no valid population features");
            envelope.request_errored(format!(
                "FAIL: No valid population features for game {game_id}"
            ));
        }
    }
}
