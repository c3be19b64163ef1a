use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

tokio::task_local! {
    /// Id of the request being served, set by the request id middleware.
    pub static REQUEST_ID: String;
}

/// The current request's id, or a fresh one outside a request scope.
pub fn current_request_id() -> String {
    REQUEST_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| uuid::Uuid::new_v4().to_string())
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Image too large: {size} bytes exceeds {limit}")]
    SizeLimit { size: u64, limit: u64 },

    #[error("Read error: {0}")]
    ReadError(String),

    #[error("Invalid MIME type: {0}")]
    InvalidMimeType(String),

    #[error("Backend error {status}: {body}")]
    BackendError { status: u16, body: String },

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing session token")]
    MissingSessionToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::SizeLimit { .. } => "FILE_TOO_LARGE",
            AppError::ReadError(_) => "READ_ERROR",
            AppError::InvalidMimeType(_) => "INVALID_MIME_TYPE",
            AppError::BackendError { .. } => "BACKEND_ERROR",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::Transport(_) => "TRANSPORT_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::MissingSessionToken => "MISSING_SESSION_TOKEN",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_problem_detail(&self, request_id: &str) -> ProblemDetail {
        let (status, title, detail) = match self {
            AppError::ValidationError(detail) => (
                StatusCode::BAD_REQUEST,
                "Validation Error",
                detail.clone(),
            ),
            AppError::SizeLimit { size, limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "File Too Large",
                format!("Image size {} exceeds maximum of {} bytes", size, limit),
            ),
            AppError::ReadError(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Read Error",
                detail.clone(),
            ),
            AppError::InvalidMimeType(mime) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Invalid MIME Type",
                format!("MIME type '{}' is not supported", mime),
            ),
            AppError::BackendError { status, body } => (
                StatusCode::BAD_GATEWAY,
                "Stylization Backend Error",
                if body.is_empty() {
                    format!("Stylization backend returned HTTP {}", status)
                } else {
                    body.clone()
                },
            ),
            AppError::MalformedResponse(detail) => (
                StatusCode::BAD_GATEWAY,
                "Malformed Backend Response",
                detail.clone(),
            ),
            AppError::Transport(detail) => (
                StatusCode::BAD_GATEWAY,
                "Stylization Backend Unreachable",
                detail.clone(),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                format!("'{}' is missing or expired", what),
            ),
            AppError::MissingSessionToken => (
                StatusCode::FORBIDDEN,
                "Missing Session Token",
                "X-Session-Token header is required".to_string(),
            ),
            AppError::Internal(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Error",
                detail.clone(),
            ),
        };

        let code = self.code();
        ProblemDetail {
            problem_type: format!("https://artmorph.dev/problems/{}", code.to_lowercase()),
            title: title.to_string(),
            status: status.as_u16(),
            detail,
            code: code.to_string(),
            request_id: request_id.to_string(),
            upstream_status: if let AppError::BackendError { status, .. } = self {
                Some(*status)
            } else {
                None
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = current_request_id();
        let problem = self.to_problem_detail(&request_id);
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = %problem.code, detail = %problem.detail, "request failed");
        }

        let mut response = (status, Json(problem)).into_response();
        if let Ok(value) = request_id.parse() {
            response.headers_mut().insert("X-Request-Id", value);
        }
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_keeps_upstream_body() {
        let body = r#"{"detail":{"code":"PIPELINE_ERROR","message":"x"}}"#.to_string();
        let err = AppError::BackendError { status: 500, body: body.clone() };
        let problem = err.to_problem_detail("req-1");
        assert_eq!(problem.status, 502);
        assert_eq!(problem.code, "BACKEND_ERROR");
        assert_eq!(problem.detail, body);
        assert_eq!(problem.upstream_status, Some(500));
        assert_eq!(problem.problem_type, "https://artmorph.dev/problems/backend_error");
    }

    #[test]
    fn size_limit_maps_to_413() {
        let err = AppError::SizeLimit { size: 11, limit: 10 };
        let problem = err.to_problem_detail("req-2");
        assert_eq!(problem.status, 413);
        assert_eq!(problem.code, "FILE_TOO_LARGE");
        assert!(problem.upstream_status.is_none());
    }

    #[test]
    fn into_response_sets_problem_json() {
        let response = AppError::ValidationError("missing image".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/problem+json"
        );
        assert!(response.headers().contains_key("X-Request-Id"));
    }

    #[tokio::test]
    async fn problem_body_reuses_scoped_request_id() {
        let response = REQUEST_ID
            .scope("req-42".to_string(), async {
                AppError::NotFound("job x".into()).into_response()
            })
            .await;
        assert_eq!(response.headers().get("X-Request-Id").unwrap(), "req-42");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let problem: ProblemDetail = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(problem.request_id, "req-42");
    }
}
