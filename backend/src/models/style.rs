use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Cyberpunk,
    Cinematic,
    Noir,
    Anime,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::Cyberpunk, Style::Cinematic, Style::Noir, Style::Anime];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Cyberpunk => "cyberpunk",
            Style::Cinematic => "cinematic",
            Style::Noir => "noir",
            Style::Anime => "anime",
        }
    }

    /// Case-insensitive parse; `None` for anything outside the four backend styles.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Styles whose preview renders are capped harder to keep latency bounded.
    pub fn is_heavy(&self) -> bool {
        matches!(self, Style::Anime | Style::Cyberpunk)
    }

    /// Only cyberpunk runs the image-conditioned adapter, so only it consumes reference images.
    pub fn uses_style_refs(&self) -> bool {
        matches!(self, Style::Cyberpunk)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Portrait,
    #[default]
    Scene,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Portrait => "portrait",
            Subject::Scene => "scene",
        }
    }

    /// Missing or unknown subjects are treated as a scene.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("portrait") => Subject::Portrait,
            _ => Subject::Scene,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guidance-map extractor forwarded to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    #[default]
    Auto,
    Hed,
    Depth,
    Canny,
    None,
}

impl Control {
    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Auto => "auto",
            Control::Hed => "hed",
            Control::Depth => "depth",
            Control::Canny => "canny",
            Control::None => "none",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Preview,
    Full,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Preview => "preview",
            Mode::Full => "full",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimeVariant {
    #[default]
    #[serde(rename = "A_faithful")]
    AFaithful,
    #[serde(rename = "B_stylized")]
    BStylized,
}

impl AnimeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimeVariant::AFaithful => "A_faithful",
            AnimeVariant::BStylized => "B_stylized",
        }
    }
}

/// The two tuned anime seeds; serialized as the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum AnimeSeed {
    #[default]
    S7890,
    S1234,
}

impl AnimeSeed {
    pub fn value(&self) -> u64 {
        match self {
            AnimeSeed::S7890 => 7890,
            AnimeSeed::S1234 => 1234,
        }
    }
}

impl TryFrom<u64> for AnimeSeed {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            7890 => Ok(AnimeSeed::S7890),
            1234 => Ok(AnimeSeed::S1234),
            other => Err(format!("unsupported anime seed preset: {}", other)),
        }
    }
}

impl From<AnimeSeed> for u64 {
    fn from(seed: AnimeSeed) -> Self {
        seed.value()
    }
}

/// Optional lookup hint; ignored by every style except anime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anime_variant: Option<AnimeVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anime_seed: Option<AnimeSeed>,
}
