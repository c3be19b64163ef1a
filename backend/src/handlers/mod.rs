pub mod health;
pub mod history;
pub mod presets;
pub mod session;
pub mod stylize;

use axum::http::HeaderMap;

use crate::models::error::AppError;

pub const SESSION_HEADER: &str = "X-Session-Token";

/// Session scoping for per-user state; every session/history route needs one.
pub(crate) fn session_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingSessionToken)
}
