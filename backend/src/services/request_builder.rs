use crate::models::error::AppError;
use crate::models::preset::ResolvedParams;
use crate::models::stylize::StylizeRequest;

/// Attaches the encoded image (and, for cyberpunk, reference images) to resolved params.
pub fn build(
    params: ResolvedParams,
    encoded_image: &str,
    style_refs: Option<Vec<String>>,
) -> Result<StylizeRequest, AppError> {
    if encoded_image.trim().is_empty() {
        return Err(AppError::ValidationError("missing image".to_string()));
    }

    let style_images_base64 = if params.style.uses_style_refs() {
        style_refs.filter(|refs| !refs.is_empty())
    } else {
        None
    };

    Ok(StylizeRequest {
        mode: params.mode,
        style: params.style,
        subject: params.subject,
        image_base64: encoded_image.to_string(),
        control: params.control,
        strength: params.strength,
        guidance: params.guidance,
        steps: params.steps,
        max_side: params.max_side,
        seed: params.seed,
        style_images_base64,
        extras: Some(params.extras),
    })
}
