use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::error::AppError;
use crate::models::preset::StylePreset;
use crate::models::style::{AnimeSeed, AnimeVariant, PresetHint, Style};
use crate::services::presets::{self, NamedPreset};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetQuery {
    pub style: Option<String>,
    pub subject: Option<String>,
    pub anime_variant: Option<AnimeVariant>,
    pub anime_seed: Option<AnimeSeed>,
}

pub async fn get_preset(Query(query): Query<PresetQuery>) -> Json<StylePreset> {
    let hint = PresetHint {
        anime_variant: query.anime_variant,
        anime_seed: query.anime_seed,
    };
    Json(presets::lookup_str(
        query.style.as_deref().unwrap_or_default(),
        query.subject.as_deref(),
        hint,
    ))
}

#[derive(Deserialize)]
pub struct NamedQuery {
    pub style: Option<Style>,
}

pub async fn list_named(Query(query): Query<NamedQuery>) -> Json<Vec<NamedPreset>> {
    let items = match query.style {
        Some(style) => presets::named_for_style(style).copied().collect(),
        None => presets::NAMED_PRESETS.to_vec(),
    };
    Json(items)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedPresetResponse {
    pub key: &'static str,
    pub label: &'static str,
    pub preset: StylePreset,
}

pub async fn get_named(Path(key): Path<String>) -> Result<Json<NamedPresetResponse>, AppError> {
    let (entry, preset) = presets::named(&key)
        .ok_or_else(|| AppError::NotFound(format!("preset {}", key)))?;
    Ok(Json(NamedPresetResponse {
        key: entry.key,
        label: entry.label,
        preset,
    }))
}

pub async fn gallery_style(Path(slug): Path<String>) -> Json<serde_json::Value> {
    let style = presets::style_for_gallery_slug(&slug);
    Json(serde_json::json!({ "slug": slug, "style": style }))
}
