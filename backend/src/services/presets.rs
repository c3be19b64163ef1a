//! Tuned per-(style, subject) defaults.
//!
//! Full-mode values are the settings proven on the backend CLI; preview
//! values stay small for latency. Lookups are total: anything unknown lands
//! on [`fallback`].

use serde::Serialize;

use crate::models::preset::{
    AnimeExtras, CinematicExtras, CyberpunkExtras, GenericExtras, NoirExtras, Scheduler,
    StyleExtras, StylePreset,
};
use crate::models::style::{AnimeSeed, AnimeVariant, Control, PresetHint, Style, Subject};

const NEON_STREET_1: &str = "/styles/neon_street_photo1.jpg";
const NEON_STREET_2: &str = "/styles/neon_street_photo2.jpg";
const NEON_PORTRAIT: &str = "/styles/neon_portrait_photo.jpg";

pub fn lookup(style: Style, subject: Subject, hint: PresetHint) -> StylePreset {
    match style {
        Style::Anime => anime(subject, hint),
        Style::Cyberpunk => cyberpunk(subject),
        Style::Noir => noir(subject),
        Style::Cinematic => cinematic(subject),
    }
}

/// String-keyed lookup used at the HTTP boundary. Unknown styles get the
/// generic bundle; unknown or missing subjects are treated as a scene.
pub fn lookup_str(style: &str, subject: Option<&str>, hint: PresetHint) -> StylePreset {
    let subject = Subject::parse_or_default(subject);
    match Style::parse(style) {
        Some(style) => lookup(style, subject, hint),
        None => fallback(subject),
    }
}

/// Generic bundle for unrecognized styles. It is sent as cinematic, the UI's default style,
/// with no style-specific extras.
pub fn fallback(subject: Subject) -> StylePreset {
    StylePreset {
        style: Style::Cinematic,
        subject,
        control: Control::Auto,
        strength: 0.32,
        guidance: 6.6,
        seed: 77,
        extras: StyleExtras::Generic(GenericExtras {}),
        preview_steps: 25,
        preview_max_side: 720,
        full_steps: 36,
        full_max_side: 1152,
        style_ref_urls: Vec::new(),
    }
}

fn anime(subject: Subject, hint: PresetHint) -> StylePreset {
    let seed = hint.anime_seed.unwrap_or_default().value();
    let (strength, guidance, full_steps) = match hint.anime_variant.unwrap_or_default() {
        AnimeVariant::AFaithful => (0.65, 8.0, 34),
        AnimeVariant::BStylized => (0.70, 8.5, 32),
    };
    StylePreset {
        style: Style::Anime,
        subject,
        control: Control::Auto,
        strength,
        guidance,
        seed,
        extras: StyleExtras::Anime(AnimeExtras {
            control_scale: 0.85,
            model: "primary".to_string(),
        }),
        preview_steps: 25,
        preview_max_side: 720,
        full_steps,
        full_max_side: 1152,
        style_ref_urls: Vec::new(),
    }
}

fn cyberpunk(subject: Subject) -> StylePreset {
    match subject {
        Subject::Portrait => StylePreset {
            style: Style::Cyberpunk,
            subject,
            control: Control::Depth,
            strength: 0.21,
            guidance: 6.2,
            seed: 101,
            extras: StyleExtras::Cyberpunk(CyberpunkExtras {
                control_scale: 0.36,
                scheduler: Scheduler::Dpmpp,
                refine: true,
                refine_strength: 0.14,
                auto_mask_person: Some(true),
                force_inpaint: true,
                edge_q: 0.987,
                skin_suppress: Some(0.95),
                skin_keep: Some(0.25),
                neon: 0.40,
                bloom: 0.44,
                rim_boost: 0.42,
                scanlines: 0.0,
                style_strength: 0.50,
            }),
            preview_steps: 25,
            preview_max_side: 720,
            full_steps: 44,
            full_max_side: 1024,
            style_ref_urls: vec![
                NEON_STREET_1.to_string(),
                NEON_STREET_2.to_string(),
                NEON_PORTRAIT.to_string(),
            ],
        },
        Subject::Scene => StylePreset {
            style: Style::Cyberpunk,
            subject,
            control: Control::Canny,
            strength: 0.32,
            guidance: 6.8,
            seed: 77,
            extras: StyleExtras::Cyberpunk(CyberpunkExtras {
                control_scale: 0.42,
                scheduler: Scheduler::Dpmpp,
                refine: true,
                refine_strength: 0.20,
                auto_mask_person: None,
                force_inpaint: true,
                edge_q: 0.930,
                skin_suppress: None,
                skin_keep: None,
                neon: 0.90,
                bloom: 0.80,
                rim_boost: 0.62,
                scanlines: 0.10,
                style_strength: 0.88,
            }),
            preview_steps: 28,
            preview_max_side: 768,
            full_steps: 60,
            full_max_side: 1280,
            style_ref_urls: vec![NEON_STREET_1.to_string(), NEON_STREET_2.to_string()],
        },
    }
}

fn noir(subject: Subject) -> StylePreset {
    match subject {
        Subject::Portrait => StylePreset {
            style: Style::Noir,
            subject,
            control: Control::None,
            strength: 0.18,
            guidance: 6.0,
            seed: 77,
            extras: StyleExtras::Noir(NoirExtras {
                control_scale: None,
                noir_halation: 0.20,
                noir_bloom_sigma: 1.9,
                noir_bloom_thresh: 0.80,
                noir_vignette: 0.12,
                noir_dither: 0.003,
                noir_gamma: 1.02,
                noir_gain: 1.01,
                noir_lift: 0.01,
            }),
            preview_steps: 25,
            preview_max_side: 720,
            full_steps: 34,
            full_max_side: 1152,
            style_ref_urls: Vec::new(),
        },
        Subject::Scene => StylePreset {
            style: Style::Noir,
            subject,
            control: Control::Canny,
            strength: 0.74,
            guidance: 6.8,
            seed: 77,
            extras: StyleExtras::Noir(NoirExtras {
                control_scale: Some(0.62),
                noir_halation: 0.16,
                noir_bloom_sigma: 1.7,
                noir_bloom_thresh: 0.88,
                noir_vignette: 0.15,
                noir_dither: 0.0035,
                noir_gamma: 1.02,
                noir_gain: 1.0,
                noir_lift: 0.01,
            }),
            preview_steps: 28,
            preview_max_side: 768,
            full_steps: 42,
            full_max_side: 1152,
            style_ref_urls: Vec::new(),
        },
    }
}

fn cinematic(subject: Subject) -> StylePreset {
    let (strength, guidance, extras, preview_steps, preview_max_side, full_steps) = match subject {
        Subject::Portrait => (
            0.24,
            6.2,
            CinematicExtras {
                control_scale: 0.30,
                tone_mix: 0.22,
                bloom: 0.22,
                contrast: 0.18,
                saturation: 1.06,
            },
            25,
            720,
            34,
        ),
        Subject::Scene => (
            0.40,
            6.6,
            CinematicExtras {
                control_scale: 0.50,
                tone_mix: 0.40,
                bloom: 0.42,
                contrast: 0.24,
                saturation: 1.06,
            },
            28,
            768,
            36,
        ),
    };
    StylePreset {
        style: Style::Cinematic,
        subject,
        control: Control::Auto,
        strength,
        guidance,
        seed: 77,
        extras: StyleExtras::Cinematic(extras),
        preview_steps,
        preview_max_side,
        full_steps,
        full_max_side: 1152,
        style_ref_urls: Vec::new(),
    }
}

/// One entry of the UI preset bar.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedPreset {
    pub key: &'static str,
    pub label: &'static str,
    pub style: Style,
    pub subject: Subject,
    #[serde(skip_serializing_if = "is_empty_hint")]
    pub hint: PresetHint,
}

fn is_empty_hint(hint: &PresetHint) -> bool {
    *hint == PresetHint::default()
}

const fn anime_hint(variant: AnimeVariant, seed: AnimeSeed) -> PresetHint {
    PresetHint {
        anime_variant: Some(variant),
        anime_seed: Some(seed),
    }
}

const NO_HINT: PresetHint = PresetHint {
    anime_variant: None,
    anime_seed: None,
};

pub const NAMED_PRESETS: &[NamedPreset] = &[
    NamedPreset {
        key: "anime_A_faithful_7890",
        label: "A (faithful) - seed 7890",
        style: Style::Anime,
        subject: Subject::Scene,
        hint: anime_hint(AnimeVariant::AFaithful, AnimeSeed::S7890),
    },
    NamedPreset {
        key: "anime_A_faithful_1234",
        label: "A (faithful) - seed 1234",
        style: Style::Anime,
        subject: Subject::Scene,
        hint: anime_hint(AnimeVariant::AFaithful, AnimeSeed::S1234),
    },
    NamedPreset {
        key: "anime_B_stylized_7890",
        label: "B (stylized) - seed 7890",
        style: Style::Anime,
        subject: Subject::Scene,
        hint: anime_hint(AnimeVariant::BStylized, AnimeSeed::S7890),
    },
    NamedPreset {
        key: "anime_B_stylized_1234",
        label: "B (stylized) - seed 1234",
        style: Style::Anime,
        subject: Subject::Scene,
        hint: anime_hint(AnimeVariant::BStylized, AnimeSeed::S1234),
    },
    NamedPreset {
        key: "cyberpunk_portrait_finalBoost",
        label: "Portrait (Final Boost)",
        style: Style::Cyberpunk,
        subject: Subject::Portrait,
        hint: NO_HINT,
    },
    NamedPreset {
        key: "cyberpunk_street_8p5plus",
        label: "Street (8.5+)",
        style: Style::Cyberpunk,
        subject: Subject::Scene,
        hint: NO_HINT,
    },
    NamedPreset {
        key: "noir_portrait_classic",
        label: "Portrait - Classic Noir",
        style: Style::Noir,
        subject: Subject::Portrait,
        hint: NO_HINT,
    },
    NamedPreset {
        key: "noir_scene_classic",
        label: "Street - Classic Noir",
        style: Style::Noir,
        subject: Subject::Scene,
        hint: NO_HINT,
    },
    NamedPreset {
        key: "cinematic_portrait_v5",
        label: "Obsidian Gold-Portrait",
        style: Style::Cinematic,
        subject: Subject::Portrait,
        hint: NO_HINT,
    },
    NamedPreset {
        key: "cinematic_scene_v5",
        label: "Obsidian Gold-Scene",
        style: Style::Cinematic,
        subject: Subject::Scene,
        hint: NO_HINT,
    },
];

pub fn named(key: &str) -> Option<(&'static NamedPreset, StylePreset)> {
    NAMED_PRESETS
        .iter()
        .find(|p| p.key == key)
        .map(|p| (p, lookup(p.style, p.subject, p.hint)))
}

pub fn named_for_style(style: Style) -> impl Iterator<Item = &'static NamedPreset> {
    NAMED_PRESETS.iter().filter(move |p| p.style == style)
}

/// Gallery card slug to backend style; unknown cards render as cinematic.
pub fn style_for_gallery_slug(slug: &str) -> Style {
    match slug {
        "starry-night" | "water-lilies" => Style::Cinematic,
        "the-scream" | "surreal-dreams" => Style::Noir,
        "cubist-view" | "abstract-colors" | "paint-splash" => Style::Cyberpunk,
        "great-wave" => Style::Anime,
        _ => Style::Cinematic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pair_resolves_to_its_own_style() {
        for style in Style::ALL {
            for subject in [Subject::Portrait, Subject::Scene] {
                let preset = lookup(style, subject, PresetHint::default());
                assert_eq!(preset.style, style);
                assert_eq!(preset.subject, subject);
                let matches = matches!(
                    (&preset.extras, style),
                    (StyleExtras::Cyberpunk(_), Style::Cyberpunk)
                        | (StyleExtras::Noir(_), Style::Noir)
                        | (StyleExtras::Cinematic(_), Style::Cinematic)
                        | (StyleExtras::Anime(_), Style::Anime)
                );
                assert!(matches, "extras variant mismatch for {}/{}", style, subject);
            }
        }
    }

    #[test]
    fn cyberpunk_scene_constants() {
        let p = lookup(Style::Cyberpunk, Subject::Scene, PresetHint::default());
        assert_eq!(p.control, Control::Canny);
        assert_eq!((p.strength, p.guidance, p.seed), (0.32, 6.8, 77));
        assert_eq!((p.preview_steps, p.preview_max_side), (28, 768));
        assert_eq!((p.full_steps, p.full_max_side), (60, 1280));
        assert_eq!(p.style_ref_urls.len(), 2);
    }

    #[test]
    fn noir_portrait_has_no_control_scale() {
        let p = lookup(Style::Noir, Subject::Portrait, PresetHint::default());
        assert_eq!(p.control, Control::None);
        match p.extras {
            StyleExtras::Noir(n) => {
                assert_eq!(n.control_scale, None);
                assert_eq!(n.noir_vignette, 0.12);
            }
            other => panic!("unexpected extras {:?}", other),
        }
    }

    #[test]
    fn anime_hint_selects_variant_and_seed() {
        let a = lookup(Style::Anime, Subject::Portrait, PresetHint::default());
        assert_eq!((a.strength, a.guidance, a.full_steps, a.seed), (0.65, 8.0, 34, 7890));

        let b = lookup(
            Style::Anime,
            Subject::Scene,
            anime_hint(AnimeVariant::BStylized, AnimeSeed::S1234),
        );
        assert_eq!((b.strength, b.guidance, b.full_steps, b.seed), (0.70, 8.5, 32, 1234));
    }

    #[test]
    fn hint_is_ignored_outside_anime() {
        let hint = anime_hint(AnimeVariant::BStylized, AnimeSeed::S1234);
        assert_eq!(
            lookup(Style::Noir, Subject::Scene, hint),
            lookup(Style::Noir, Subject::Scene, PresetHint::default())
        );
    }

    #[test]
    fn unknown_style_uses_fallback() {
        let p = lookup_str("vaporwave", Some("portrait"), PresetHint::default());
        assert_eq!(p.control, Control::Auto);
        assert_eq!((p.strength, p.guidance, p.seed), (0.32, 6.6, 77));
        assert_eq!((p.preview_steps, p.preview_max_side), (25, 720));
        assert_eq!((p.full_steps, p.full_max_side), (36, 1152));
        assert_eq!(p.extras, StyleExtras::Generic(GenericExtras {}));
        assert_eq!(p.subject, Subject::Portrait);
    }

    #[test]
    fn bad_subject_is_scene() {
        let p = lookup_str("noir", Some("landscape"), PresetHint::default());
        assert_eq!(p, lookup(Style::Noir, Subject::Scene, PresetHint::default()));
        let p = lookup_str("noir", None, PresetHint::default());
        assert_eq!(p.subject, Subject::Scene);
    }

    #[test]
    fn named_presets_resolve() {
        let (entry, preset) = named("anime_B_stylized_1234").unwrap();
        assert_eq!(entry.label, "B (stylized) - seed 1234");
        assert_eq!(preset.seed, 1234);
        assert_eq!(preset.full_steps, 32);

        let (_, preset) = named("cyberpunk_portrait_finalBoost").unwrap();
        assert_eq!(preset.seed, 101);
        assert!(named("nope").is_none());
        assert_eq!(named_for_style(Style::Anime).count(), 4);
    }

    #[test]
    fn gallery_slugs_map_to_styles() {
        assert_eq!(style_for_gallery_slug("great-wave"), Style::Anime);
        assert_eq!(style_for_gallery_slug("the-scream"), Style::Noir);
        assert_eq!(style_for_gallery_slug("paint-splash"), Style::Cyberpunk);
        assert_eq!(style_for_gallery_slug("mona-lisa"), Style::Cinematic);
    }
}
