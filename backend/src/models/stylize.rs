use serde::{Deserialize, Serialize};

use super::preset::StyleExtras;
use super::style::{Control, Mode, Style, Subject};

/// Wire payload POSTed to the stylization backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylizeRequest {
    pub mode: Mode,
    pub style: Style,
    pub subject: Subject,
    pub image_base64: String,
    pub control: Control,
    pub strength: f64,
    pub guidance: f64,
    pub steps: u32,
    pub max_side: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_images_base64: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<StyleExtras>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub duration_ms: u64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub control_net: Option<Control>,
    #[serde(default)]
    pub ip_adapter: bool,
    pub steps: u32,
    pub guidance: f64,
    pub strength: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylizeResponse {
    pub mode: Mode,
    pub result_base64: String,
    #[serde(default)]
    pub metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub trace_id: String,
}
