//! One user session: the current settings plus the in-memory history.

use std::path::Path;

use qrcode::QrCode;
use tracing::{debug, info};

use crate::batch::{parse_batch, BatchPlan, BATCH_CAPTION_LEN};
use crate::config::{EccLevel, GenerationConfig};
use crate::encode::{encode, preview, render};
use crate::error::Result;
use crate::helper::{to_png_bytes, to_svg_string};
use crate::history::{caption, History, HistoryEntry};
use crate::logo::{embed_logo, load_logo};
use crate::validate::validate_url;

/// File stem for a single generation.
pub const SINGLE_FILE_STEM: &str = "qr_code";
/// File stem for a generation with a logo.
pub const LOGO_FILE_STEM: &str = "qr_code_with_logo";

/// A successfully generated QR code.
pub struct Generated {
    pub url: String,
    /// PNG encoded image, identical to what was stored in the history.
    pub png: Vec<u8>,
    pub settings: String,
    qr: QrCode,
    config: GenerationConfig,
}

impl Generated {
    /// Terminal rendering of the symbol, without logo.
    pub fn preview(&self) -> String {
        preview(&self.qr)
    }

    /// SVG rendering of the symbol with the colours and sizes it was made with.
    pub fn svg(&self) -> String {
        to_svg_string(&self.qr, &self.config)
    }
}

/// Outcome of one URL in a batch.
pub struct BatchItem {
    /// Position among the valid URLs, counting from 1.
    pub number: usize,
    pub url: String,
    pub outcome: Result<Generated>,
}

impl BatchItem {
    pub fn caption(&self) -> String {
        caption(&self.url, BATCH_CAPTION_LEN)
    }
}

pub struct BatchReport {
    pub plan: BatchPlan,
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.is_ok()).count()
    }
}

#[derive(Debug, Default)]
pub struct Session {
    config: GenerationConfig,
    history: History,
}

impl Session {
    pub fn new(config: GenerationConfig) -> Self {
        Session {
            config,
            history: History::new(),
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GenerationConfig) {
        self.config = config;
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Validates `url`, encodes it with the session settings and records the
    /// result in the history.
    pub fn generate_single(&mut self, url: &str) -> Result<Generated> {
        validate_url(url)?;
        let generated = self.generate(url, self.config, self.config.settings_label())?;
        info!(url, settings = %generated.settings, "generated QR code");
        Ok(generated)
    }

    /// Generates a code for each valid line of `text`.
    ///
    /// Invalid lines are skipped and reported through [`BatchReport::plan`]. A
    /// failure for one URL does not stop the others.
    pub fn generate_batch(&mut self, text: &str) -> Result<BatchReport> {
        let plan = parse_batch(text)?;
        let settings = self.config.settings_label();
        let items = plan
            .valid
            .iter()
            .enumerate()
            .map(|(idx, url)| {
                let outcome = self.generate(url, self.config, settings.clone());
                if let Err(err) = &outcome {
                    debug!(url = %url, %err, "batch entry failed");
                }
                BatchItem {
                    number: idx + 1,
                    url: url.clone(),
                    outcome,
                }
            })
            .collect();
        let report = BatchReport { plan, items };
        info!(
            generated = report.succeeded(),
            skipped = report.plan.invalid.len(),
            "batch finished"
        );
        Ok(report)
    }

    /// Generates a code for `url` with the logo at `logo_path` in its centre.
    ///
    /// Error correction is forced to `High` so the covered modules can be
    /// recovered, whatever level the session is set to.
    pub fn generate_with_logo(&mut self, url: &str, logo_path: &Path) -> Result<Generated> {
        validate_url(url)?;
        let logo = load_logo(logo_path)?;
        let config = self.config.with_error_correction(EccLevel::High);

        let qr = encode(url, config.error_correction())?;
        let image = embed_logo(&render(&qr, &config), &logo);
        let png = to_png_bytes(&image)?;
        let settings = self.config.logo_settings_label();
        self.record(url, &png, &settings);
        info!(url, logo = %logo_path.display(), "generated QR code with logo");

        Ok(Generated {
            url: url.to_owned(),
            png,
            settings,
            qr,
            config,
        })
    }

    fn generate(&mut self, url: &str, config: GenerationConfig, settings: String) -> Result<Generated> {
        let qr = encode(url, config.error_correction())?;
        let png = to_png_bytes(&render(&qr, &config))?;
        self.record(url, &png, &settings);
        Ok(Generated {
            url: url.to_owned(),
            png,
            settings,
            qr,
            config,
        })
    }

    fn record(&mut self, url: &str, png: &[u8], settings: &str) {
        self.history.push(HistoryEntry {
            url: url.to_owned(),
            image: png.to_vec(),
            settings: settings.to_owned(),
        });
        debug!(entries = self.history.len(), "history updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_single_records_history() {
        let mut session = Session::default();
        let generated = session.generate_single("https://example.com").unwrap();

        assert_eq!(generated.settings, "Size: 10, Border: 4, Error: Low (7%)");
        assert_eq!(session.history().len(), 1);
        let entry = session.history().get(0).unwrap();
        assert_eq!(entry.url, "https://example.com");
        assert_eq!(entry.image, generated.png);
        assert!(generated.svg().contains("<svg"));
        assert!(!generated.preview().is_empty());
    }

    #[test]
    fn test_invalid_url_leaves_history_untouched() {
        let mut session = Session::default();
        assert!(matches!(session.generate_single(""), Err(Error::EmptyUrl)));
        assert!(matches!(session.generate_single("nope"), Err(Error::InvalidUrl(_))));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_session_settings_flow_into_image() {
        let config = GenerationConfig::default()
            .with_module_size(5)
            .unwrap()
            .with_border(1)
            .unwrap()
            .with_error_correction(EccLevel::Quartile);
        let mut session = Session::new(config);
        let generated = session.generate_single("https://example.com").unwrap();

        let img = image::load_from_memory(&generated.png).unwrap();
        assert_eq!(img.width(), (generated.qr.width() as u32 + 2) * 5);
        assert_eq!(generated.settings, "Size: 5, Border: 1, Error: Quartile (25%)");
    }

    #[test]
    fn test_batch_generates_valid_and_reports_invalid() {
        let mut session = Session::default();
        let report = session
            .generate_batch("https://one.example.com\nbroken\nhttps://two.example.com\n")
            .unwrap();

        assert_eq!(report.items.len(), 2);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.items[0].number, 1);
        assert_eq!(report.items[1].url, "https://two.example.com");
        assert_eq!(report.plan.invalid, ["broken"]);
        // Last generated is first in history.
        assert_eq!(session.history().get(0).unwrap().url, "https://two.example.com");
    }

    #[test]
    fn test_batch_keeps_only_ten_most_recent() {
        let mut session = Session::default();
        let urls: Vec<String> = (0..12).map(|n| format!("https://site{n}.example.com")).collect();
        session.generate_batch(&urls.join("\n")).unwrap();

        assert_eq!(session.history().len(), 10);
        assert_eq!(session.history().get(0).unwrap().url, "https://site11.example.com");
        assert_eq!(session.history().get(9).unwrap().url, "https://site2.example.com");
    }

    #[test]
    fn test_batch_item_failure_does_not_stop_others() {
        let mut session = Session::new(GenerationConfig::default().with_error_correction(EccLevel::High));
        let long = format!("https://example.com/{}", "a".repeat(3000));
        let report = session
            .generate_batch(&format!("{long}\nhttps://ok.example.com"))
            .unwrap();

        assert!(matches!(report.items[0].outcome, Err(Error::Encode(_))));
        assert!(report.items[1].outcome.is_ok());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_logo_generation() {
        let tmp = tempfile::tempdir().unwrap();
        let logo_path = tmp.path().join("logo.png");
        RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 255]))
            .save_with_format(&logo_path, image::ImageFormat::Png)
            .unwrap();

        let mut session = Session::default();
        let generated = session
            .generate_with_logo("https://example.com", &logo_path)
            .unwrap();

        assert_eq!(generated.settings, "With Logo, Size: 10, Border: 4");
        assert_eq!(session.config().error_correction(), EccLevel::Low);
        let img = image::load_from_memory(&generated.png).unwrap().to_rgb8();
        let center = img.width() / 2;
        let image::Rgb([r, g, _]) = *img.get_pixel(center, center);
        assert!(r > 250 && g < 5);
        assert_eq!(session.history().get(0).unwrap().settings, generated.settings);
    }

    #[test]
    fn test_logo_checks_url_before_logo() {
        let mut session = Session::default();
        let missing = Path::new("missing.png");
        assert!(matches!(session.generate_with_logo("", missing), Err(Error::EmptyUrl)));
        assert!(matches!(
            session.generate_with_logo("https://example.com", missing),
            Err(Error::Io(_))
        ));
        assert!(session.history().is_empty());
    }
}
