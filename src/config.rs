//! Generation settings: colours, module size, border and error correction level.

use std::fmt;
use std::str::FromStr;

use image::Rgb;
use qrcode::EcLevel;

use crate::error::{Error, Result};

pub const MIN_MODULE_SIZE: u32 = 5;
pub const MAX_MODULE_SIZE: u32 = 20;
pub const DEFAULT_MODULE_SIZE: u32 = 10;

pub const MIN_BORDER: u32 = 1;
pub const MAX_BORDER: u32 = 10;
pub const DEFAULT_BORDER: u32 = 4;

/// Directory used when no output directory is given.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// A 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parses `#RRGGBB`, `RRGGBB` or the short `#RGB` form.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_owned());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Color::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Color::new(r * 17, g * 17, b * 17))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Error correction level for a QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EccLevel {
    /// Tolerates ~7% erroneous codewords.
    #[default]
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl EccLevel {
    pub const ALL: [EccLevel; 4] = [
        EccLevel::Low,
        EccLevel::Medium,
        EccLevel::Quartile,
        EccLevel::High,
    ];

    /// The label shown to users, e.g. `Quartile (25%)`.
    pub fn label(self) -> &'static str {
        match self {
            EccLevel::Low => "Low (7%)",
            EccLevel::Medium => "Medium (15%)",
            EccLevel::Quartile => "Quartile (25%)",
            EccLevel::High => "High (30%)",
        }
    }

    pub fn to_ec_level(self) -> EcLevel {
        match self {
            EccLevel::Low => EcLevel::L,
            EccLevel::Medium => EcLevel::M,
            EccLevel::Quartile => EcLevel::Q,
            EccLevel::High => EcLevel::H,
        }
    }
}

impl FromStr for EccLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(EccLevel::Low),
            "m" | "medium" => Ok(EccLevel::Medium),
            "q" | "quartile" => Ok(EccLevel::Quartile),
            "h" | "high" => Ok(EccLevel::High),
            _ => Err(Error::InvalidEccLevel(s.to_owned())),
        }
    }
}

impl fmt::Display for EccLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything needed to turn a URL into an image, captured once per generation.
///
/// Construct with [`GenerationConfig::new`] or start from the default and use the
/// `with_*` builders; both reject module sizes and borders outside their ranges.
///
/// # Example
///
/// ```rust
/// use urlqr::config::{Color, EccLevel, GenerationConfig};
///
/// let config = GenerationConfig::default()
///     .with_module_size(8).unwrap()
///     .with_foreground(Color::new(0, 0, 128))
///     .with_error_correction(EccLevel::Medium);
///
/// assert_eq!(config.settings_label(), "Size: 8, Border: 4, Error: Medium (15%)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    foreground: Color,
    background: Color,
    module_size: u32,
    border: u32,
    error_correction: EccLevel,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            foreground: Color::BLACK,
            background: Color::WHITE,
            module_size: DEFAULT_MODULE_SIZE,
            border: DEFAULT_BORDER,
            error_correction: EccLevel::Low,
        }
    }
}

impl GenerationConfig {
    pub fn new(
        foreground: Color,
        background: Color,
        module_size: u32,
        border: u32,
        error_correction: EccLevel,
    ) -> Result<Self> {
        Ok(GenerationConfig {
            foreground,
            background,
            module_size: check_range("module size", module_size, MIN_MODULE_SIZE, MAX_MODULE_SIZE)?,
            border: check_range("border", border, MIN_BORDER, MAX_BORDER)?,
            error_correction,
        })
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn module_size(&self) -> u32 {
        self.module_size
    }

    pub fn border(&self) -> u32 {
        self.border
    }

    pub fn error_correction(&self) -> EccLevel {
        self.error_correction
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_module_size(mut self, size: u32) -> Result<Self> {
        self.module_size = check_range("module size", size, MIN_MODULE_SIZE, MAX_MODULE_SIZE)?;
        Ok(self)
    }

    pub fn with_border(mut self, border: u32) -> Result<Self> {
        self.border = check_range("border", border, MIN_BORDER, MAX_BORDER)?;
        Ok(self)
    }

    pub fn with_error_correction(mut self, level: EccLevel) -> Self {
        self.error_correction = level;
        self
    }

    /// Settings summary stored with plain generations.
    pub fn settings_label(&self) -> String {
        format!(
            "Size: {}, Border: {}, Error: {}",
            self.module_size,
            self.border,
            self.error_correction.label()
        )
    }

    /// Settings summary stored with logo generations, which always use `High`.
    pub fn logo_settings_label(&self) -> String {
        format!("With Logo, Size: {}, Border: {}", self.module_size, self.border)
    }
}

fn check_range(name: &'static str, value: u32, min: u32, max: u32) -> Result<u32> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Error::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
