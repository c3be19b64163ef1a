use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::handlers::session_token;
use crate::models::error::AppError;
use crate::models::history::HistoryItem;
use crate::services::encoding;
use crate::AppState;

pub async fn list_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<HistoryItem>>, AppError> {
    let session = session_token(&headers)?;
    Ok(Json(state.history.list(session).await?))
}

pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let session = session_token(&headers)?;
    state.history.clear(session).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_history_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
) -> Result<Json<HistoryItem>, AppError> {
    let session = session_token(&headers)?;
    Ok(Json(state.history.get(session, &item_id).await?))
}

/// Serves the stylized output as an image download.
pub async fn get_history_output(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
) -> Result<Response, AppError> {
    let session = session_token(&headers)?;
    let item = state.history.get(session, &item_id).await?;
    let (mime, data) = encoding::decode(&item.output_image_base64)?;

    let ext = match mime.as_str() {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    };
    let disposition = format!(
        "attachment; filename=\"artmorph_{}_{}.{}\"",
        item.params.style, item.id, ext
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime),
            (header::CONTENT_LENGTH, data.len().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}
