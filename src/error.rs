use thiserror::Error;

/// Errors surfaced to the user while turning URLs into QR codes.
///
/// Validation failures carry a human readable message. Failures coming from the
/// encoder or the imaging layer keep the underlying library's message.
#[derive(Debug, Error)]
pub enum Error {
    #[error("please enter a URL first")]
    EmptyUrl,

    #[error("please enter a valid URL (e.g., https://example.com): {0}")]
    InvalidUrl(String),

    #[error("please enter at least one URL")]
    EmptyBatch,

    #[error("invalid color {0:?}, expected #RRGGBB or #RGB")]
    InvalidColor(String),

    #[error("invalid error correction level {0:?}, expected low, medium, quartile or high")]
    InvalidEccLevel(String),

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{name} must be a whole number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("unknown setting {0:?}, expected fg, bg, size, border or ecc")]
    UnknownSetting(String),

    #[error("unsupported logo file {0:?}, expected a png, jpg or jpeg image")]
    UnsupportedLogo(String),

    #[error("no history entry at index {0}")]
    NoSuchEntry(usize),

    #[error("an error occurred while generating the QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
