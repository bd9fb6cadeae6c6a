//! Export manager trait and implementations
//!
//! The manager is the seam to the external analytics pipeline. The gateway
//! makes exactly one call per request: no retries, no fan-out.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{ExportError, ExportRequest, ExportResult};

/// Executes export requests against the analytics pipeline.
#[async_trait]
pub trait ExportManager: Send + Sync {
    /// Run one export request to completion.
    async fn execute(&self, request: ExportRequest) -> Result<ExportResult, ExportError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Forward a built request to the manager.
///
/// Pure assembly-and-forward: whatever the manager returns is passed through.
pub async fn dispatch(
    manager: &dyn ExportManager,
    request: ExportRequest,
) -> Result<ExportResult, ExportError> {
    info!(
        manager = manager.name(),
        game_id = request.interface.game_id(),
        backend = request.interface.backend_name(),
        start = %request.range.start,
        end = %request.range.end,
        metrics = request.metric_overrides.len(),
        all_metrics = request.requests_all_metrics(),
        "Dispatching export request"
    );
    let result = manager.execute(request).await?;
    debug!(
        columns = result.columns.len(),
        rows = result.rows.len(),
        "Export request completed"
    );
    Ok(result)
}

// ============================================================================
// HTTP
// ============================================================================

/// Export manager that POSTs requests to a remote export service.
///
/// `POST {endpoint}/export` with the request as JSON; the response body is an
/// [`ExportResult`].
#[derive(Clone)]
pub struct HttpExportManager {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpExportManager {
    /// Create a client for `endpoint`, with an optional request timeout.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, ExportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn export_url(&self) -> String {
        format!("{}/export", self.endpoint)
    }
}

#[async_trait]
impl ExportManager for HttpExportManager {
    async fn execute(&self, request: ExportRequest) -> Result<ExportResult, ExportError> {
        let resp = self
            .http
            .post(self.export_url())
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExportError::UpstreamStatus(status));
        }

        Ok(resp.json::<ExportResult>().await?)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

// ============================================================================
// Disabled
// ============================================================================

/// Stand-in used when no export endpoint is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledExportManager;

#[async_trait]
impl ExportManager for DisabledExportManager {
    async fn execute(&self, _request: ExportRequest) -> Result<ExportResult, ExportError> {
        Err(ExportError::NotConfigured)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GatewayConfig, SourceMapping, SqlSettings};
    use crate::export::{ExportOutputs, ExportRange};
    use crate::interfaces::{DataInterface, SqlInterface};
    use chrono::Utc;

    fn sample_request() -> ExportRequest {
        let config = GatewayConfig {
            sql: Some(SqlSettings {
                host: "db.local".to_string(),
                port: 3306,
                user: "reader".to_string(),
                password: None,
            }),
            ..GatewayConfig::default()
        };
        let iface = SqlInterface::new("CRYSTAL", &SourceMapping::new("MySQL"), &config).unwrap();
        let now = Utc::now().naive_utc();
        ExportRequest::new(
            DataInterface::Sql(iface),
            ExportRange::new(now, now),
            ExportOutputs::population_in_memory(),
            Vec::new(),
        )
    }

    #[test]
    fn test_disabled_manager_always_fails() {
        let result = tokio_test::block_on(dispatch(&DisabledExportManager, sample_request()));
        assert!(matches!(result, Err(ExportError::NotConfigured)));
    }

    #[test]
    fn test_http_manager_trims_trailing_slash() {
        let mgr = HttpExportManager::new("http://analytics:9000/", None).unwrap();
        assert_eq!(mgr.export_url(), "http://analytics:9000/export");
        assert_eq!(mgr.name(), "http");
    }

    #[tokio::test]
    async fn test_http_manager_unreachable_is_http_error() {
        // Reserve a free port, then release it so nothing is listening there.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let endpoint = format!("http://127.0.0.1:{port}");
        let mgr = HttpExportManager::new(&endpoint, Some(Duration::from_secs(2))).unwrap();
        let result = mgr.execute(sample_request()).await;
        assert!(matches!(result, Err(ExportError::Http(_))));
    }
}
