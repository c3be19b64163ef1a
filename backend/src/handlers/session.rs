use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::handlers::session_token;
use crate::models::error::AppError;
use crate::models::history::PhaseSession;
use crate::models::style::{Control, Style, Subject};
use crate::services::encoding;
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub mime_type: String,
    pub size_bytes: u64,
    pub content_hash: String,
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let session = session_token(&headers)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Multipart error: {}", e)))?
    {
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        if !content_type.starts_with("image/") && content_type != "application/octet-stream" {
            return Err(AppError::InvalidMimeType(content_type));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::ReadError(format!("Failed to read upload: {}", e)))?;

        let encoded = encoding::encode_with_limit(&data, state.config.max_upload_bytes)?;
        if !encoded.mime_type().starts_with("image/") {
            return Err(AppError::InvalidMimeType(encoded.mime_type().to_string()));
        }

        let hash = encoding::content_hash(&data);
        let mut saved = state.sessions.load(session).await?.unwrap_or_default();
        let response = UploadResponse {
            mime_type: encoded.mime_type().to_string(),
            size_bytes: encoded.size_bytes(),
            content_hash: hash.clone(),
        };
        saved.content_image = encoded.into_string();
        saved.content_hash = Some(hash);
        state.sessions.save(session, &saved).await?;

        info!(
            size = response.size_bytes,
            mime = %response.mime_type,
            "Content image stored in session"
        );
        return Ok(Json(response));
    }

    Err(AppError::ValidationError("No file in upload".to_string()))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PhaseSession>, AppError> {
    let session = session_token(&headers)?;
    state
        .sessions
        .load(session)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("session".to_string()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub content_image: Option<String>,
    pub style: Option<Style>,
    pub subject: Option<Subject>,
    pub control: Option<Control>,
}

pub async fn update_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(update): Json<SessionUpdate>,
) -> Result<Json<PhaseSession>, AppError> {
    let session = session_token(&headers)?;
    let mut saved = state.sessions.load(session).await?.unwrap_or_default();

    if let Some(image) = update.content_image {
        // An empty string clears the image.
        saved.content_hash = if image.is_empty() {
            None
        } else {
            let bytes = encoding::validate_encoded_image(&image, state.config.max_upload_bytes)?;
            Some(encoding::content_hash(&bytes))
        };
        saved.content_image = image;
    }
    if let Some(style) = update.style {
        saved.style = style;
    }
    if let Some(subject) = update.subject {
        saved.subject = subject;
    }
    if let Some(control) = update.control {
        saved.control = control;
    }

    state.sessions.save(session, &saved).await?;
    Ok(Json(saved))
}

pub async fn clear_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let session = session_token(&headers)?;
    state.sessions.clear(session).await?;
    Ok(StatusCode::NO_CONTENT)
}
