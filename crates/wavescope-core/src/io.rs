use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, RgbaImage};
use tracing::{debug, info};

use crate::pixel_buf::PixelBuf;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub fn is_supported_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

/// Decode an image file into a PixelBuf, preserving RGB vs RGBA.
pub fn load_image(path: &Path) -> Result<PixelBuf> {
    info!(?path, "loading image file");
    let img =
        image::open(path).with_context(|| format!("failed to open image: {}", path.display()))?;
    debug!(width = img.width(), height = img.height(), "image decode");

    let (width, height) = (img.width(), img.height());
    if img.color().has_alpha() {
        PixelBuf::from_data(width, height, 4, img.into_rgba8().into_raw())
    } else {
        PixelBuf::from_data(width, height, 3, img.into_rgb8().into_raw())
    }
}

/// Resample to exact dimensions with Lanczos3 (used to fit a source into
/// the preview viewport).
pub fn resize_exact(buf: &PixelBuf, width: u32, height: u32) -> Result<PixelBuf> {
    if buf.width == width && buf.height == height {
        return Ok(buf.clone());
    }
    let resized = to_dynamic(buf)?.resize_exact(width, height, FilterType::Lanczos3);
    let channels = buf.channels;
    if channels == 4 {
        PixelBuf::from_data(width, height, 4, resized.into_rgba8().into_raw())
    } else {
        PixelBuf::from_data(width, height, 3, resized.into_rgb8().into_raw())
    }
}

/// Encode to the format named by the file extension (png or jpeg).
/// JPEG has no alpha, so RGBA buffers are flattened for it.
pub fn save_image(buf: &PixelBuf, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dynamic = to_dynamic(buf)?;
    let dynamic = match ext.as_str() {
        "jpg" | "jpeg" if buf.has_alpha() => DynamicImage::ImageRgb8(dynamic.into_rgb8()),
        _ => dynamic,
    };

    dynamic
        .save(path)
        .with_context(|| format!("failed to write image: {}", path.display()))?;
    info!(?path, "image written");
    Ok(())
}

fn to_dynamic(buf: &PixelBuf) -> Result<DynamicImage> {
    if buf.has_alpha() {
        let img = RgbaImage::from_raw(buf.width, buf.height, buf.data.clone())
            .context("pixel buffer does not match its dimensions")?;
        Ok(DynamicImage::ImageRgba8(img))
    } else {
        let img = RgbImage::from_raw(buf.width, buf.height, buf.data.clone())
            .context("pixel buffer does not match its dimensions")?;
        Ok(DynamicImage::ImageRgb8(img))
    }
}
