use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::services::encoding::{encode_file, EncodedImage};

/// Loads a preset's bundled reference images from the static assets directory.
///
/// URLs are site-relative (`/styles/x.jpg`). Anything that escapes the assets
/// directory or fails to read is skipped.
pub async fn load_style_refs(assets_dir: &Path, urls: &[String], limit: u64) -> Vec<EncodedImage> {
    let mut refs = Vec::with_capacity(urls.len());
    for url in urls {
        let Some(path) = asset_path(assets_dir, url) else {
            warn!(url = %url, "Ignoring style reference outside the assets directory");
            continue;
        };
        match encode_file(&path, limit).await {
            Ok(encoded) => refs.push(encoded),
            Err(e) => warn!(url = %url, error = %e, "Skipping unreadable style reference"),
        }
    }
    refs
}

fn asset_path(assets_dir: &Path, url: &str) -> Option<PathBuf> {
    let relative = Path::new(url.trim_start_matches('/'));
    if relative.as_os_str().is_empty()
        || relative.components().any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(assets_dir.join(relative))
}
