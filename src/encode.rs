//! Glue between user settings and the `qrcode` encoder.
//!
//! Symbol construction (segment modes, version fitting, Reed-Solomon, masking)
//! happens entirely inside `qrcode`. This module picks the error correction
//! level and rasterizes the resulting module matrix with the configured colours,
//! module size and border.

use image::{ImageBuffer, RgbImage};
use qrcode::render::unicode;
use qrcode::{Color as ModuleColor, QrCode};
use tracing::debug;

use crate::config::{EccLevel, GenerationConfig};
use crate::error::Result;

/// Encodes `data` at the requested error correction level.
///
/// The smallest version that can hold the data is chosen automatically. Data
/// that does not fit even in version 40 returns [`crate::Error::Encode`].
pub fn encode(data: &str, level: EccLevel) -> Result<QrCode> {
    let qr = QrCode::with_error_correction_level(data.as_bytes(), level.to_ec_level())?;
    debug!(
        version = ?qr.version(),
        width = qr.width(),
        level = level.label(),
        "encoded QR symbol"
    );
    Ok(qr)
}

/// Rasterizes a symbol into an RGB image.
///
/// Every module becomes a `module_size` x `module_size` square and the symbol is
/// surrounded by a quiet zone of `border` modules in the background colour, so
/// the side length is `(width + 2 * border) * module_size` pixels.
///
/// # Example
///
/// ```rust
/// use urlqr::config::{EccLevel, GenerationConfig};
/// use urlqr::encode::{encode, render};
///
/// let qr = encode("https://example.com", EccLevel::Low).unwrap();
/// let img = render(&qr, &GenerationConfig::default());
/// assert_eq!(img.width(), (qr.width() as u32 + 8) * 10);
/// ```
pub fn render(qr: &QrCode, config: &GenerationConfig) -> RgbImage {
    let width = qr.width();
    let border = config.border() as usize;
    let scale = config.module_size();
    let size = (width as u32 + 2 * config.border()) * scale;
    let modules = qr.to_colors();
    let dark = config.foreground().to_rgb();
    let light = config.background().to_rgb();

    let mut img = ImageBuffer::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let qr_x = ((x / scale) as usize).checked_sub(border);
        let qr_y = ((y / scale) as usize).checked_sub(border);
        let is_dark = match (qr_x, qr_y) {
            (Some(qx), Some(qy)) if qx < width && qy < width => {
                modules[qy * width + qx] == ModuleColor::Dark
            }
            _ => false,
        };
        *pixel = if is_dark { dark } else { light };
    }
    img
}

/// Renders the symbol with Unicode half blocks for a terminal preview.
pub fn preview(qr: &QrCode) -> String {
    qr.render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Dark)
        .light_color(unicode::Dense1x2::Light)
        .build()
}
