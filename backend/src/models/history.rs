use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::preset::ResolvedParams;
use super::style::{Control, Mode, Style, Subject};
use super::stylize::StylizeResponse;

/// Snapshot of one completed stylize call, kept so the UI can re-apply it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub mode: Mode,
    #[serde(rename = "timeISO")]
    pub time_iso: String,
    pub input_image_base64: String,
    pub output_image_base64: String,
    pub params: ResolvedParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl HistoryItem {
    pub fn from_result(
        input_image: String,
        params: ResolvedParams,
        response: &StylizeResponse,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mode: params.mode,
            time_iso: Utc::now().to_rfc3339(),
            input_image_base64: input_image,
            output_image_base64: response.result_base64.clone(),
            params,
            trace_id: (!response.trace_id.is_empty()).then(|| response.trace_id.clone()),
            warnings: response.warnings.clone(),
        }
    }
}

/// Cross-page state carried from the upload step to the stylize step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSession {
    #[serde(default)]
    pub content_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub style: Style,
    pub subject: Subject,
    pub control: Control,
}

impl Default for PhaseSession {
    fn default() -> Self {
        Self {
            content_image: String::new(),
            content_hash: None,
            style: Style::Cinematic,
            subject: Subject::Scene,
            control: Control::Auto,
        }
    }
}
