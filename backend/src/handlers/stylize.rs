use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::handlers::session_token;
use crate::models::error::AppError;
use crate::models::history::{HistoryItem, PhaseSession};
use crate::models::jobs::{JobInfo, JobKind};
use crate::models::preset::{ParamOverrides, ResolvedParams, StylePreset};
use crate::models::style::{AnimeSeed, AnimeVariant, Mode, PresetHint};
use crate::models::stylize::StylizeRequest;
use crate::services::{encoding, presets, request_builder, resolver, style_refs};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylizeBody {
    pub mode: Mode,
    /// Backend style; falls back to the session's style when omitted.
    pub style: Option<String>,
    pub subject: Option<String>,
    /// A preset-bar key such as `noir_scene_classic`; wins over style/subject.
    pub preset_key: Option<String>,
    pub anime_variant: Option<AnimeVariant>,
    pub anime_seed: Option<AnimeSeed>,
    #[serde(default)]
    pub overrides: ParamOverrides,
    /// Inline image; the session's uploaded image is used when omitted.
    pub image_base64: Option<String>,
    pub style_images_base64: Option<Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StylizeAccepted {
    pub job_id: String,
}

async fn select_preset(
    state: &AppState,
    session: &str,
    body: &StylizeBody,
) -> Result<StylePreset, AppError> {
    if let Some(key) = &body.preset_key {
        return presets::named(key)
            .map(|(_, preset)| preset)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown preset: {}", key)));
    }

    let hint = PresetHint {
        anime_variant: body.anime_variant,
        anime_seed: body.anime_seed,
    };
    if let Some(style) = &body.style {
        return Ok(presets::lookup_str(style, body.subject.as_deref(), hint));
    }

    // Style, subject and control all come from the saved session; an explicit
    // control override still wins at resolve time.
    match state.sessions.load(session).await? {
        Some(saved) => {
            let subject = body.subject.as_deref().unwrap_or(saved.subject.as_str());
            let mut preset = presets::lookup_str(saved.style.as_str(), Some(subject), hint);
            preset.control = saved.control;
            Ok(preset)
        }
        None => {
            let defaults = PhaseSession::default();
            let subject = body.subject.as_deref().unwrap_or(defaults.subject.as_str());
            Ok(presets::lookup_str(defaults.style.as_str(), Some(subject), hint))
        }
    }
}

async fn build_request(
    state: &AppState,
    session: &str,
    body: StylizeBody,
    params: ResolvedParams,
) -> Result<(String, StylizeRequest), AppError> {
    let image = match body.image_base64.filter(|s| !s.is_empty()) {
        Some(image) => image,
        None => state
            .sessions
            .load(session)
            .await?
            .map(|s| s.content_image)
            .unwrap_or_default(),
    };

    let limit = state.config.max_upload_bytes;
    if !image.is_empty() {
        encoding::check_encoded_size(&image, limit)?;
    }

    let mut refs = body.style_images_base64.unwrap_or_default();
    for style_ref in &refs {
        encoding::check_encoded_size(style_ref, limit)?;
    }
    if refs.is_empty() && params.style.uses_style_refs() && !params.style_ref_urls.is_empty() {
        refs = style_refs::load_style_refs(
            Path::new(&state.config.style_assets_dir),
            &params.style_ref_urls,
            limit,
        )
        .await
        .into_iter()
        .map(|r| r.into_string())
        .collect();
    }

    let request = request_builder::build(params, &image, Some(refs))?;
    Ok((image, request))
}

/// Dry run: the payload that would be sent, without image data.
pub async fn resolve_stylize(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<StylizeBody>,
) -> Result<Json<ResolvedParams>, AppError> {
    let session = session_token(&headers)?;
    resolver::validate_overrides(&body.overrides)?;
    let preset = select_preset(&state, session, &body).await?;
    Ok(Json(resolver::resolve(&preset, body.mode, &body.overrides)))
}

pub async fn create_stylize(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<StylizeBody>,
) -> Result<Json<StylizeAccepted>, AppError> {
    let session = session_token(&headers)?.to_string();

    let idempotency_key = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    if let Some(job_id) = idempotency_key.as_deref().and_then(|k| state.jobs.job_for_key(k)) {
        return Ok(Json(StylizeAccepted { job_id }));
    }

    resolver::validate_overrides(&body.overrides)?;
    let preset = select_preset(&state, &session, &body).await?;
    let params = resolver::resolve(&preset, body.mode, &body.overrides);
    let (input_image, request) = build_request(&state, &session, body, params.clone()).await?;

    // A concurrent retry with the same key may have won the race since the check above.
    let (job_id, job, created) =
        state.jobs.create_job(JobKind::from(params.mode), idempotency_key.as_deref());
    if !created {
        return Ok(Json(StylizeAccepted { job_id }));
    }

    info!(job_id = %job_id, style = %params.style, mode = %params.mode, "Stylize job queued");

    let state_clone = state.clone();
    let jid = job_id.clone();

    tokio::spawn(async move {
        job.set_processing();

        match state_clone.client.submit(&request).await {
            Ok(response) => {
                let item = HistoryItem::from_result(input_image, params, &response);
                let history_id = item.id.clone();
                let history_id = match state_clone.history.append(&session, item).await {
                    Ok(()) => Some(history_id),
                    Err(e) => {
                        warn!(job_id = %jid, error = %e, "Failed to record history");
                        None
                    }
                };

                match serde_json::to_value(&response) {
                    Ok(mut result) => {
                        if let (Some(obj), Some(id)) = (result.as_object_mut(), history_id) {
                            obj.insert("historyId".to_string(), serde_json::Value::String(id));
                        }
                        job.set_complete(result);
                        info!(job_id = %jid, trace_id = %response.trace_id, "Stylize job complete");
                    }
                    Err(e) => {
                        let err = AppError::Internal(format!("Failed to serialize result: {}", e));
                        job.set_failed(err.to_problem_detail(&jid));
                    }
                }
            }
            Err(e) => {
                warn!(job_id = %jid, error = %e, "Stylize job failed");
                job.set_failed(e.to_problem_detail(&jid));
            }
        }
    });

    Ok(Json(StylizeAccepted { job_id }))
}

/// Polled by the client until the job reaches COMPLETE or FAILED.
pub async fn get_stylize_job(
    State(state): State<Arc<AppState>>,
    axum::extract::Path(job_id): axum::extract::Path<String>,
) -> Result<Json<JobInfo>, AppError> {
    let job = state
        .jobs
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("job {}", job_id)))?;
    Ok(Json(job.get_info()))
}
