//! Writing scenes to disk and reading local images for one-shot edits.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use shared::{data_uri::InlineImage, domain::SceneResult};

pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first())
            .copied()
            .unwrap_or("bin"),
    }
}

pub fn default_file_name(mime_type: &str, now: DateTime<Local>) -> String {
    format!(
        "mnemonic-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        extension_for(mime_type)
    )
}

/// `requested` may be a directory, a file path, or absent (timestamped name
/// inside `output_dir`). A file path without extension gets one from the
/// MIME type.
pub fn resolve_image_path(
    requested: Option<&Path>,
    output_dir: &Path,
    mime_type: &str,
    now: DateTime<Local>,
) -> PathBuf {
    match requested {
        None => output_dir.join(default_file_name(mime_type, now)),
        Some(path) if path.is_dir() => path.join(default_file_name(mime_type, now)),
        Some(path) if path.extension().is_none() => {
            path.with_extension(extension_for(mime_type))
        }
        Some(path) => path.to_path_buf(),
    }
}

/// Markdown rendering of the mnemonic key.
pub fn render_key_markdown(scene: &SceneResult) -> String {
    let mut out = format!("# {}\n\n", scene.title);
    for point in &scene.explanation_points {
        out.push_str("- ");
        out.push_str(point);
        out.push('\n');
    }
    out
}

/// `<stem>.md` beside the image, or `<stem>.key.md` when the image itself
/// was saved under a `.md` name.
pub fn key_path_for(image_path: &Path) -> PathBuf {
    let key_path = image_path.with_extension("md");
    if key_path == image_path {
        image_path.with_extension("key.md")
    } else {
        key_path
    }
}

/// Decodes the scene image and writes it (plus a `.md` key next to it).
/// Returns the image path.
pub fn save_scene(
    scene: &SceneResult,
    requested: Option<&Path>,
    output_dir: &Path,
) -> Result<PathBuf> {
    let image =
        InlineImage::parse(&scene.image).ok_or_else(|| anyhow!("invalid image data URI"))?;
    let bytes = image
        .decode_bytes()
        .context("image payload is not valid base64")?;

    let path = resolve_image_path(requested, output_dir, &image.mime_type, Local::now());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to create output directory '{}'", parent.display())
        })?;
    }
    fs::write(&path, bytes)
        .with_context(|| format!("failed to write image '{}'", path.display()))?;

    let key_path = key_path_for(&path);
    fs::write(&key_path, render_key_markdown(scene))
        .with_context(|| format!("failed to write key '{}'", key_path.display()))?;

    tracing::info!(image = %path.display(), key = %key_path.display(), "scene saved");
    Ok(path)
}

/// Reads a local image file into a data URI, guessing the MIME type from
/// the extension.
pub fn read_image_as_data_uri(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read image '{}'", path.display()))?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(anyhow!(
            "'{}' does not look like an image ({mime})",
            path.display()
        ));
    }
    Ok(InlineImage::from_bytes(mime.essence_str(), &bytes).to_data_uri())
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
