use std::path::{Path, PathBuf};

use image::RgbaImage;

/// Why an on-disk asset could not be turned into pixels.
///
/// Callers pick the fallback: a missing overlay is skipped, a missing background
/// image falls back to the flat canvas colour, a missing photo leaves its box empty.
#[derive(thiserror::Error, Debug)]
pub enum AssetLoadError {
    /// The file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but is not a readable image.
    #[error("failed to decode '{}': {message}", path.display())]
    Decode {
        /// Offending file.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },
}

/// Load an image file as straight-alpha RGBA8.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, AssetLoadError> {
    if !path.exists() {
        return Err(AssetLoadError::NotFound(path.to_path_buf()));
    }
    image::open(path)
        .map(|img| img.into_rgba8())
        .map_err(|e| AssetLoadError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Decode encoded image bytes as straight-alpha RGBA8.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, image::ImageError> {
    Ok(image::load_from_memory(bytes)?.into_rgba8())
}

/// `true` when the photo's extension marks it as a JPEG.
pub fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "jpg" | "jpeg"))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
