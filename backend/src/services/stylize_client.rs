use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::config::AppConfig;
use crate::models::error::AppError;
use crate::models::style::Mode;
use crate::models::stylize::{Metrics, StylizeRequest, StylizeResponse};

/// Thin HTTP client for the remote stylization backend.
///
/// One POST per `submit`, no retries and no timeout of its own.
pub struct StylizeClient {
    endpoint: String,
    client: Client,
}

/// Lenient view of the backend body so a missing image can be reported as
/// malformed instead of a generic decode failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendResponse {
    mode: Option<Mode>,
    result_base64: Option<String>,
    #[serde(default)]
    metrics: Option<Metrics>,
    #[serde(default)]
    warnings: Option<Vec<String>>,
    #[serde(default)]
    trace_id: Option<String>,
}

impl StylizeClient {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_endpoint(config.stylize_url())
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn submit(&self, request: &StylizeRequest) -> Result<StylizeResponse, AppError> {
        info!(
            style = %request.style,
            subject = %request.subject,
            mode = %request.mode,
            steps = request.steps,
            max_side = request.max_side,
            style_refs = request.style_images_base64.as_ref().map_or(0, |r| r.len()),
            "Sending stylize request",
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Stylize request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Stylization backend rejected request");
            return Err(AppError::BackendError {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read stylize response: {}", e)))?;

        let parsed: BackendResponse = serde_json::from_str(&text).map_err(|e| {
            AppError::MalformedResponse(format!("Failed to parse stylize response: {}", e))
        })?;

        let result_base64 = parsed
            .result_base64
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AppError::MalformedResponse("No resultBase64 in stylize response".to_string())
            })?;

        let trace_id = parsed.trace_id.unwrap_or_default();
        info!(
            trace_id = %trace_id,
            duration_ms = parsed.metrics.as_ref().map(|m| m.duration_ms),
            "Stylize request completed",
        );

        Ok(StylizeResponse {
            mode: parsed.mode.unwrap_or(request.mode),
            result_base64,
            metrics: parsed.metrics,
            warnings: parsed.warnings.unwrap_or_default(),
            trace_id,
        })
    }
}
