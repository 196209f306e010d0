//! Logo compositing on top of a rendered QR code.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, RgbImage};
use tracing::debug;

use crate::error::{Error, Result};

/// File extensions accepted for logos.
pub const LOGO_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Loads a logo image, accepting only PNG and JPEG files.
///
/// A missing file is reported as [`Error::Io`], an unreadable image as [`Error::Image`].
pub fn load_logo(path: &Path) -> Result<DynamicImage> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| LOGO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if !supported {
        return Err(Error::UnsupportedLogo(path.display().to_string()));
    }
    // Decode by content, the extension check above is only a gate.
    let logo = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(logo)
}

/// Pastes `logo` in the centre of `qr`.
///
/// The logo is scaled to a square one fifth of the QR code's width with a
/// Lanczos filter, then alpha-composited so transparent areas keep the QR
/// modules visible. Callers should encode with [`crate::config::EccLevel::High`]
/// so the covered modules can still be recovered.
pub fn embed_logo(qr: &RgbImage, logo: &DynamicImage) -> RgbImage {
    let (width, height) = qr.dimensions();
    let logo_size = (width / 5).max(1);
    let logo = logo
        .resize_exact(logo_size, logo_size, FilterType::Lanczos3)
        .to_rgba8();

    let x = (width - logo_size) / 2;
    let y = (height - logo_size) / 2;
    debug!(logo_size, x, y, "embedding logo");

    let mut canvas = DynamicImage::ImageRgb8(qr.clone()).to_rgba8();
    imageops::overlay(&mut canvas, &logo, i64::from(x), i64::from(y));
    DynamicImage::ImageRgba8(canvas).to_rgb8()
}
