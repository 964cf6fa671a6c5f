use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageError, RgbImage};
use thiserror::Error;

/// Extensions accepted for screenshot captures.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Failed to load image: {0}")]
    Load(#[from] ImageError),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Image has zero width or height: {0}")]
    EmptyImage(String),
    #[error("Failed to save image: {0}")]
    Save(String),
}

/// Decode an image, rejecting files that decode to zero width or height.
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageLoadError> {
    if !path.exists() {
        return Err(ImageLoadError::NotFound(path.display().to_string()));
    }
    let img = image::open(path)?;
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(ImageLoadError::EmptyImage(path.display().to_string()));
    }
    Ok(img)
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Height an image of `src_w`x`src_h` takes when scaled to `target_width`,
/// truncated toward zero, never below one pixel and saturating at `u32::MAX`.
pub fn scaled_height(src_w: u32, src_h: u32, target_width: u32) -> u32 {
    if src_w == 0 {
        return 1;
    }
    let h = (src_h as u64 * target_width as u64) / src_w as u64;
    u32::try_from(h).unwrap_or(u32::MAX).max(1)
}

/// Rescale to `target_width`, preserving aspect ratio.
pub fn resize_to_width(img: &RgbImage, target_width: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w == target_width {
        return img.clone();
    }
    let new_h = scaled_height(w, h, target_width);
    image::imageops::resize(img, target_width.max(1), new_h, FilterType::Triangle)
}

/// Copy the top `height` rows of an image.
pub fn crop_to_height(img: &RgbImage, height: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    let height = height.min(h);
    image::imageops::crop_imm(img, 0, 0, w, height).to_image()
}

pub fn save_image(img: &RgbImage, path: &Path) -> Result<(), ImageLoadError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ImageLoadError::Save(e.to_string()))?;
    }
    img.save(path).map_err(|e| ImageLoadError::Save(e.to_string()))
}
