//! Population-level metrics endpoint
//!
//! `GET /game/:game_id/metrics` → parse params → select interface → build and
//! dispatch the export → shape the single aggregate row into the envelope.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use axum::extract::{Path, Query, State};
use chrono::Utc;
use futures::FutureExt;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::GatewayState;
use crate::api::envelope::{ResponseEnvelope, RestMethod};
use crate::api::params::{PopulationParams, PopulationQuery};
use crate::error::GatewayError;
use crate::export::{dispatch, ExportOutputs, ExportRequest};
use crate::interfaces::select_interface;
use crate::shaping::shape_population;

/// Message returned to clients for any unexpected failure. Details stay in the log.
pub const POPULATION_SERVER_ERROR_MSG: &str =
    "ERROR: Unknown error while processing Population request";

/// GET /game/:game_id/metrics
///
/// Query params (all optional):
/// - `start_datetime`, `end_datetime`: ISO-8601, default to the last hour
/// - `metrics`: bracketed list, e.g. `[SessionCount,AverageSessionTime]`
///
/// Always answers HTTP 200; the outcome is in the envelope `status`.
pub async fn get_population_metrics(
    State(state): State<GatewayState>,
    Path(game_id): Path<String>,
    query: Option<Query<HashMap<String, String>>>,
) -> ResponseEnvelope {
    let request_id = Uuid::new_v4();
    let span = info_span!("population", %request_id, game_id = %game_id);

    async move {
        info!("Received population request");
        let query = PopulationQuery::from_map(query.map(|Query(q)| q).unwrap_or_default());
        let params = PopulationParams::parse(&query, Utc::now().naive_utc());
        info!(
            metrics_arg = ?query.metrics,
            requested = ?params.metrics,
            start = %params.range.start,
            end = %params.range.end,
            "Parsed population parameters"
        );

        // Catch-all boundary: nothing below may reach the transport unconverted.
        match AssertUnwindSafe(population_metrics(&state, &game_id, params))
            .catch_unwind()
            .await
        {
            Ok(Ok(envelope)) => envelope,
            Ok(Err(e)) => {
                error!(error = %e, "Population request failed");
                server_error()
            }
            Err(panic) => {
                error!(panic = %panic_message(panic.as_ref()), "Population request panicked");
                server_error()
            }
        }
    }
    .instrument(span)
    .await
}

async fn population_metrics(
    state: &GatewayState,
    game_id: &str,
    params: PopulationParams,
) -> Result<ResponseEnvelope, GatewayError> {
    let mut envelope = ResponseEnvelope::new(RestMethod::Get);

    let Some(interface) = select_interface(game_id, &state.config)? else {
        warn!("No source mapping for game");
        envelope.request_errored(format!("FAIL: No interface available for game {game_id}"));
        return Ok(envelope);
    };

    let request = ExportRequest::new(
        interface,
        params.range,
        ExportOutputs::population_in_memory(),
        params.metrics.overrides(),
    );
    let result = dispatch(state.export_manager.as_ref(), request).await?;

    shape_population(&result, game_id, &mut envelope);
    Ok(envelope)
}

fn server_error() -> ResponseEnvelope {
    let mut envelope = ResponseEnvelope::new(RestMethod::Get);
    envelope.server_errored(POPULATION_SERVER_ERROR_MSG);
    envelope
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
