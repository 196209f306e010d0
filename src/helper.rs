use image::{DynamicImage, ImageFormat, RgbImage};
use qrcode::{Color as ModuleColor, QrCode};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::config::{GenerationConfig, DEFAULT_OUTPUT_DIR};
use crate::error::Result;

/*---- Utilities ----*/

/// Encodes an image as PNG in memory.
pub fn to_png_bytes(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img.clone()).write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

// Returns a string of SVG code for an image depicting the given QR Code, with the
// configured colours and border. Each module is `module_size` user units wide.
// The string always uses Unix newlines (\n), regardless of the platform.
pub fn to_svg_string(qr: &QrCode, config: &GenerationConfig) -> String {
    let width = qr.width();
    let border = config.border() as usize;
    let dimension = (width + 2 * border) * config.module_size() as usize;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {1} {1}\" stroke=\"none\">\n",
        dimension,
        width + 2 * border
    );
    result += &format!("\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n", config.background());
    result += "\t<path d=\"";
    let mut first = true;
    for (i, module) in qr.to_colors().into_iter().enumerate() {
        if module != ModuleColor::Dark {
            continue;
        }
        if !first {
            result += " ";
        }
        first = false;
        let (x, y) = (i % width, i / width);
        result += &format!("M{},{}h1v1h-1z", x + border, y + border);
    }
    result += &format!("\" fill=\"{}\"/>\n", config.foreground());
    result += "</svg>\n";
    result
}

/// Writes `bytes` to `<directory>/<filename>.<extension>` and returns the path.
///
/// # Arguments
///
/// * `bytes` - The file contents, usually PNG or SVG data.
/// * `directory` - Optional. The directory where the file is written. Defaults to "generated" and is created if missing.
/// * `filename` - Optional. The file stem. If not provided, a timestamp-based name is used.
/// * `extension` - The file extension without the dot.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the directory cannot be created or the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use urlqr::helper::save_bytes;
///
/// let path = save_bytes(b"<svg/>", None, Some("qr_code"), "svg").unwrap();
/// assert!(path.ends_with("generated/qr_code.svg"));
/// ```
pub fn save_bytes(
    bytes: &[u8],
    directory: Option<&Path>,
    filename: Option<&str>,
    extension: &str,
) -> Result<PathBuf> {
    let directory = directory.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR));
    let filename = match filename {
        Some(name) => name.to_string(),
        None => {
            let since_the_epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            format!("qr_{}", since_the_epoch.as_millis())
        }
    };

    // Check if the directory exists, create it if it doesn't
    if !directory.exists() {
        fs::create_dir_all(directory)?;
    }

    let file_path = directory.join(format!("{}.{}", filename, extension));
    fs::write(&file_path, bytes)?;
    info!(path = %file_path.display(), bytes = bytes.len(), "saved QR code");
    Ok(file_path)
}
