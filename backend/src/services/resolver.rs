use crate::models::error::AppError;
use crate::models::preset::{ParamOverrides, ResolvedParams, StylePreset};
use crate::models::style::Mode;

/// Hard ceiling on preview resolution for heavy styles, applied after overrides.
pub const HEAVY_PREVIEW_MAX_SIDE: u32 = 768;

/// Merges `preset` with `overrides` and picks the mode-specific step count and size.
///
/// Deterministic: the seed is carried through untouched, or dropped when the
/// caller asked the backend to randomize it.
pub fn resolve(preset: &StylePreset, mode: Mode, overrides: &ParamOverrides) -> ResolvedParams {
    let (steps, max_side) = match mode {
        Mode::Preview => (
            overrides.steps_preview.unwrap_or(preset.preview_steps),
            overrides.max_side_preview.unwrap_or(preset.preview_max_side),
        ),
        Mode::Full => (
            overrides.steps_full.unwrap_or(preset.full_steps),
            overrides.max_side_full.unwrap_or(preset.full_max_side),
        ),
    };

    let max_side = if mode == Mode::Preview && preset.style.is_heavy() {
        max_side.min(HEAVY_PREVIEW_MAX_SIDE)
    } else {
        max_side
    };

    let seed = if overrides.randomize_seed {
        None
    } else {
        Some(overrides.seed.unwrap_or(preset.seed))
    };

    ResolvedParams {
        mode,
        style: preset.style,
        subject: preset.subject,
        control: overrides.control.unwrap_or(preset.control),
        strength: overrides.strength.unwrap_or(preset.strength),
        guidance: overrides.guidance.unwrap_or(preset.guidance),
        steps,
        max_side,
        seed,
        extras: preset.extras.merged(&overrides.extras),
        style_ref_urls: preset.style_ref_urls.clone(),
    }
}

/// Rejects slider values the backend cannot use before anything is sent.
pub fn validate_overrides(overrides: &ParamOverrides) -> Result<(), AppError> {
    if let Some(strength) = overrides.strength {
        if !(0.0..=1.0).contains(&strength) {
            return Err(AppError::ValidationError(format!(
                "strength must be within [0, 1], got {}",
                strength
            )));
        }
    }
    if let Some(guidance) = overrides.guidance {
        if !guidance.is_finite() || guidance <= 0.0 {
            return Err(AppError::ValidationError(format!(
                "guidance must be a positive number, got {}",
                guidance
            )));
        }
    }
    let counts = [
        ("stepsPreview", overrides.steps_preview),
        ("stepsFull", overrides.steps_full),
        ("maxSidePreview", overrides.max_side_preview),
        ("maxSideFull", overrides.max_side_full),
    ];
    for (name, value) in counts {
        if value == Some(0) {
            return Err(AppError::ValidationError(format!("{} must be greater than zero", name)));
        }
    }
    Ok(())
}
