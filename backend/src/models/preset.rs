use serde::{Deserialize, Serialize};

use super::style::{Control, Mode, Style, Subject};

/// Tuned default generation parameters for one (style, subject) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    pub style: Style,
    pub subject: Subject,
    pub control: Control,
    pub strength: f64,
    pub guidance: f64,
    pub seed: u64,
    pub extras: StyleExtras,
    pub preview_steps: u32,
    pub preview_max_side: u32,
    pub full_steps: u32,
    pub full_max_side: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style_ref_urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduler {
    #[default]
    Dpmpp,
    Unipc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CyberpunkExtras {
    pub control_scale: f64,
    pub scheduler: Scheduler,
    pub refine: bool,
    pub refine_strength: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_mask_person: Option<bool>,
    pub force_inpaint: bool,
    pub edge_q: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_suppress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_keep: Option<f64>,
    pub neon: f64,
    pub bloom: f64,
    pub rim_boost: f64,
    pub scanlines: f64,
    pub style_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NoirExtras {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_scale: Option<f64>,
    pub noir_halation: f64,
    pub noir_bloom_sigma: f64,
    pub noir_bloom_thresh: f64,
    pub noir_vignette: f64,
    pub noir_dither: f64,
    pub noir_gamma: f64,
    pub noir_gain: f64,
    pub noir_lift: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CinematicExtras {
    pub control_scale: f64,
    pub tone_mix: f64,
    pub bloom: f64,
    pub contrast: f64,
    pub saturation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnimeExtras {
    pub control_scale: f64,
    pub model: String,
}

/// Extras of the fallback bundle: serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenericExtras {}

/// Style-specific knobs. Serialized untagged so the backend sees a flat object;
/// `deny_unknown_fields` on each variant keeps deserialization unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleExtras {
    Cyberpunk(CyberpunkExtras),
    Noir(NoirExtras),
    Cinematic(CinematicExtras),
    Anime(AnimeExtras),
    Generic(GenericExtras),
}

impl StyleExtras {
    /// Shallow merge: overridden fields replace defaults, fields the variant
    /// does not own are dropped.
    pub fn merged(&self, o: &ExtrasOverrides) -> StyleExtras {
        match self {
            StyleExtras::Cyberpunk(d) => StyleExtras::Cyberpunk(CyberpunkExtras {
                control_scale: o.control_scale.unwrap_or(d.control_scale),
                scheduler: o.scheduler.unwrap_or(d.scheduler),
                refine: o.refine.unwrap_or(d.refine),
                refine_strength: o.refine_strength.unwrap_or(d.refine_strength),
                auto_mask_person: o.auto_mask_person.or(d.auto_mask_person),
                force_inpaint: o.force_inpaint.unwrap_or(d.force_inpaint),
                edge_q: o.edge_q.unwrap_or(d.edge_q),
                skin_suppress: o.skin_suppress.or(d.skin_suppress),
                skin_keep: o.skin_keep.or(d.skin_keep),
                neon: o.neon.unwrap_or(d.neon),
                bloom: o.bloom.unwrap_or(d.bloom),
                rim_boost: o.rim_boost.unwrap_or(d.rim_boost),
                scanlines: o.scanlines.unwrap_or(d.scanlines),
                style_strength: o.style_strength.unwrap_or(d.style_strength),
            }),
            StyleExtras::Noir(d) => StyleExtras::Noir(NoirExtras {
                control_scale: o.control_scale.or(d.control_scale),
                noir_halation: o.noir_halation.unwrap_or(d.noir_halation),
                noir_bloom_sigma: o.noir_bloom_sigma.unwrap_or(d.noir_bloom_sigma),
                noir_bloom_thresh: o.noir_bloom_thresh.unwrap_or(d.noir_bloom_thresh),
                noir_vignette: o.noir_vignette.unwrap_or(d.noir_vignette),
                noir_dither: o.noir_dither.unwrap_or(d.noir_dither),
                noir_gamma: o.noir_gamma.unwrap_or(d.noir_gamma),
                noir_gain: o.noir_gain.unwrap_or(d.noir_gain),
                noir_lift: o.noir_lift.unwrap_or(d.noir_lift),
            }),
            StyleExtras::Cinematic(d) => StyleExtras::Cinematic(CinematicExtras {
                control_scale: o.control_scale.unwrap_or(d.control_scale),
                tone_mix: o.tone_mix.unwrap_or(d.tone_mix),
                bloom: o.bloom.unwrap_or(d.bloom),
                contrast: o.contrast.unwrap_or(d.contrast),
                saturation: o.saturation.unwrap_or(d.saturation),
            }),
            StyleExtras::Anime(d) => StyleExtras::Anime(AnimeExtras {
                control_scale: o.control_scale.unwrap_or(d.control_scale),
                model: o.model.clone().unwrap_or_else(|| d.model.clone()),
            }),
            StyleExtras::Generic(_) => StyleExtras::Generic(GenericExtras {}),
        }
    }
}

/// Flat view of every extras knob the UI can send. Which ones apply depends on the active style.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtrasOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<Scheduler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refine: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refine_strength: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_mask_person: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_inpaint: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_q: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_suppress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_keep: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bloom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rim_boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanlines: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_strength: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noir_halation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noir_bloom_sigma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noir_bloom_thresh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noir_vignette: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noir_dither: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noir_gamma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noir_gain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noir_lift: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_mix: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f64>,
}

/// User-adjusted values from the advanced controls. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control: Option<Control>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Omit the seed so the backend picks one.
    pub randomize_seed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_preview: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_full: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_side_preview: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_side_full: Option<u32>,
    pub extras: ExtrasOverrides,
}

/// Final, mode-resolved parameters for a single stylize call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedParams {
    pub mode: Mode,
    pub style: Style,
    pub subject: Subject,
    pub control: Control,
    pub strength: f64,
    pub guidance: f64,
    pub steps: u32,
    pub max_side: u32,
    pub seed: Option<u64>,
    pub extras: StyleExtras,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style_ref_urls: Vec<String>,
}
