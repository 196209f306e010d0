use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{value_parser, Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::batch::batch_file_stem;
use crate::config::{
    Color, EccLevel, GenerationConfig, DEFAULT_BORDER, DEFAULT_MODULE_SIZE, DEFAULT_OUTPUT_DIR,
    MAX_BORDER, MAX_MODULE_SIZE, MIN_BORDER, MIN_MODULE_SIZE,
};
use crate::helper::save_bytes;
use crate::interactive;
use crate::session::{Session, LOGO_FILE_STEM, SINGLE_FILE_STEM};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub style: StyleArgs,

    /// Directory where generated images are written
    #[arg(
        short,
        long,
        global = true,
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        env = "URLQR_OUTPUT_DIR"
    )]
    pub output_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Customization shared by every command.
#[derive(Args)]
pub struct StyleArgs {
    /// Color of the QR code pattern
    #[arg(long, global = true, value_name = "HEX", default_value = "#000000", env = "URLQR_FG", value_parser = parse_color)]
    pub fg: Color,

    /// Color of the QR code background
    #[arg(long, global = true, value_name = "HEX", default_value = "#FFFFFF", env = "URLQR_BG", value_parser = parse_color)]
    pub bg: Color,

    /// Size of each box in pixels
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_MODULE_SIZE,
        env = "URLQR_SIZE",
        value_parser = value_parser!(u32).range(i64::from(MIN_MODULE_SIZE)..=i64::from(MAX_MODULE_SIZE))
    )]
    pub size: u32,

    /// Size of the border in boxes
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_BORDER,
        env = "URLQR_BORDER",
        value_parser = value_parser!(u32).range(i64::from(MIN_BORDER)..=i64::from(MAX_BORDER))
    )]
    pub border: u32,

    /// Error correction level (low, medium, quartile, high); higher levels survive more damage
    #[arg(long, global = true, value_name = "LEVEL", default_value = "low", env = "URLQR_ECC", value_parser = parse_ecc)]
    pub ecc: EccLevel,
}

impl StyleArgs {
    pub fn to_config(&self) -> crate::Result<GenerationConfig> {
        GenerationConfig::new(self.fg, self.bg, self.size, self.border, self.ecc)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a QR code for one URL
    Single(SingleArgs),

    /// Generate QR codes for many URLs, one per line
    Batch(BatchArgs),

    /// Generate a QR code with a logo in its centre (always uses high error correction)
    Logo(LogoArgs),

    /// Start an interactive session with a history of recent QR codes
    Interactive,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Png,
    Svg,
}

#[derive(Args)]
pub struct SingleArgs {
    /// URL to encode (e.g. https://example.com)
    pub url: String,

    /// Image format to write
    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,

    /// File name without extension
    #[arg(long, value_name = "NAME", default_value = SINGLE_FILE_STEM)]
    pub name: String,

    /// Also print the QR code to the terminal
    #[arg(long)]
    pub preview: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// File with one URL per line, `-` reads standard input
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

#[derive(Args)]
pub struct LogoArgs {
    /// URL the QR code links to
    pub url: String,

    /// Logo image (png, jpg or jpeg)
    #[arg(short, long, value_name = "IMAGE")]
    pub logo: PathBuf,

    /// File name without extension
    #[arg(long, value_name = "NAME", default_value = LOGO_FILE_STEM)]
    pub name: String,
}

fn parse_color(s: &str) -> Result<Color, String> {
    s.parse::<Color>().map_err(|e| e.to_string())
}

fn parse_ecc(s: &str) -> Result<EccLevel, String> {
    s.parse::<EccLevel>().map_err(|e| e.to_string())
}

#[cfg(not(tarpaulin_include))]
pub fn run(cli: Cli) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    execute(cli, stdin.lock(), stdout.lock())
}

/// Runs `cli` reading URLs (batch `-`) and interactive commands from `input`,
/// and writing results to `output`. Per-URL failures go to stderr.
pub fn execute<R: BufRead, W: Write>(cli: Cli, mut input: R, mut output: W) -> Result<()> {
    let config = cli.style.to_config()?;
    let mut session = Session::new(config);
    let out_dir = cli.output_dir.as_path();
    info!(settings = %session.config().settings_label(), out_dir = %out_dir.display(), "starting");

    match cli.command {
        Commands::Single(args) => {
            let generated = session.generate_single(&args.url)?;
            let path = match args.format {
                OutputFormat::Png => save_bytes(&generated.png, Some(out_dir), Some(&args.name), "png")?,
                OutputFormat::Svg => {
                    save_bytes(generated.svg().as_bytes(), Some(out_dir), Some(&args.name), "svg")?
                }
            };
            if args.preview {
                write!(output, "{}", generated.preview())?;
            }
            writeln!(output, "QR Code generated successfully! {}", path.display())?;
            writeln!(output, "Settings: {}", generated.settings)?;
        }
        Commands::Batch(args) => {
            let text = read_batch_input(&args.input, &mut input)?;
            let report = session.generate_batch(&text)?;
            if let Some(message) = report.plan.skipped_message() {
                eprintln!("{message}");
            }
            if report.plan.valid.is_empty() {
                bail!("no valid URLs to generate");
            }
            writeln!(output, "Generating {} QR code(s)...", report.plan.valid.len())?;
            let mut saved = 0;
            for item in &report.items {
                let saved_path = match &item.outcome {
                    Ok(generated) => {
                        let stem = batch_file_stem(item.number);
                        save_bytes(&generated.png, Some(out_dir), Some(&stem), "png").with_context(|| {
                            format!("Failed to save {}", out_dir.join(format!("{stem}.png")).display())
                        })
                    }
                    Err(err) => Err(anyhow!("{err}")),
                };
                match saved_path {
                    Ok(path) => {
                        saved += 1;
                        writeln!(output, "  [{}] {} -> {}", item.number, item.caption(), path.display())?;
                    }
                    Err(err) => eprintln!("Error generating QR code for {}: {err:#}", item.url),
                }
            }
            if saved == 0 {
                bail!("no QR codes were generated");
            }
        }
        Commands::Logo(args) => {
            let generated = session.generate_with_logo(&args.url, &args.logo)?;
            let path = save_bytes(&generated.png, Some(out_dir), Some(&args.name), "png")?;
            writeln!(output, "QR Code with logo generated successfully! {}", path.display())?;
            writeln!(output, "Settings: {}", generated.settings)?;
        }
        Commands::Interactive => {
            interactive::run(&mut session, input, output, out_dir)
                .context("interactive session failed")?;
        }
    }

    Ok(())
}

/// Reads the batch list from `input` when `path` is `-`, otherwise from the file.
fn read_batch_input<R: BufRead>(path: &Path, input: &mut R) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        input
            .read_to_string(&mut text)
            .context("Failed to read URLs from standard input")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read URLs from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["urlqr", "single", "https://example.com"]).unwrap();
        assert_eq!(cli.style.to_config().unwrap(), GenerationConfig::default());
        assert_eq!(cli.output_dir, PathBuf::from("generated"));
        let Commands::Single(args) = cli.command else {
            panic!("expected single");
        };
        assert_eq!(args.name, "qr_code");
    }

    #[test]
    fn test_style_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "urlqr", "batch", "urls.txt", "--fg", "#112233", "--size", "12", "--border", "2", "--ecc",
            "q",
        ])
        .unwrap();
        let config = cli.style.to_config().unwrap();
        assert_eq!(config.foreground(), Color::new(0x11, 0x22, 0x33));
        assert_eq!(config.module_size(), 12);
        assert_eq!(config.border(), 2);
        assert_eq!(config.error_correction(), EccLevel::Quartile);
    }

    #[test]
    fn test_rejects_out_of_range_and_bad_colors() {
        assert!(Cli::try_parse_from(["urlqr", "--size", "4", "interactive"]).is_err());
        assert!(Cli::try_parse_from(["urlqr", "--border", "11", "interactive"]).is_err());
        assert!(Cli::try_parse_from(["urlqr", "--bg", "blue", "interactive"]).is_err());
        assert!(Cli::try_parse_from(["urlqr", "logo", "https://example.com"]).is_err());
    }

    fn execute_args(args: &[&str], input: &str) -> (Result<()>, String) {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut output = Vec::new();
        let result = execute(cli, input.as_bytes(), &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_single_writes_svg() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let (result, out) = execute_args(
            &["urlqr", "single", "https://example.com", "--format", "svg", "--output-dir", dir],
            "",
        );

        result.unwrap();
        let svg = std::fs::read_to_string(tmp.path().join("qr_code.svg")).unwrap();
        assert!(svg.contains("<svg"));
        assert!(out.contains("QR Code generated successfully!"));
        assert!(!tmp.path().join("qr_code.png").exists());
    }

    #[test]
    fn test_batch_from_file_names_outputs_by_position() {
        let tmp = tempfile::tempdir().unwrap();
        let list = tmp.path().join("urls.txt");
        std::fs::write(&list, "https://a.example.com\nnot a url\nhttps://b.example.com\n").unwrap();
        let out_dir = tmp.path().join("out");
        let (result, out) = execute_args(
            &[
                "urlqr",
                "batch",
                list.to_str().unwrap(),
                "--output-dir",
                out_dir.to_str().unwrap(),
            ],
            "",
        );

        result.unwrap();
        assert!(out.contains("Generating 2 QR code(s)..."));
        assert!(out_dir.join("qr_code_1.png").exists());
        assert!(out_dir.join("qr_code_2.png").exists());
        assert!(!out_dir.join("qr_code_3.png").exists());
    }

    #[test]
    fn test_batch_reads_dash_from_input() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let (result, _) = execute_args(
            &["urlqr", "batch", "-", "--output-dir", dir],
            "https://one.example.com\n\nhttps://two.example.com\n",
        );

        result.unwrap();
        assert!(tmp.path().join("qr_code_1.png").exists());
        assert!(tmp.path().join("qr_code_2.png").exists());
    }

    #[test]
    fn test_batch_save_failure_does_not_stop_the_rest() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory where the second image should go makes that write fail.
        std::fs::create_dir(tmp.path().join("qr_code_2.png")).unwrap();
        let dir = tmp.path().to_str().unwrap();
        let (result, out) = execute_args(
            &["urlqr", "batch", "-", "--output-dir", dir],
            "https://a.example.com\nhttps://b.example.com\nhttps://c.example.com\n",
        );

        result.unwrap();
        assert!(tmp.path().join("qr_code_1.png").is_file());
        assert!(tmp.path().join("qr_code_3.png").is_file());
        assert!(out.contains("[3] https://c.example.com"));
        assert!(!out.contains("[2]"));
    }

    #[test]
    fn test_batch_all_invalid_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let (result, _) = execute_args(&["urlqr", "batch", "-", "--output-dir", dir], "nope\nstill nope\n");

        assert_eq!(result.unwrap_err().to_string(), "no valid URLs to generate");
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_logo_subcommand_saves_png() {
        let tmp = tempfile::tempdir().unwrap();
        let logo = tmp.path().join("logo.png");
        image::RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 255, 255]))
            .save_with_format(&logo, image::ImageFormat::Png)
            .unwrap();
        let out_dir = tmp.path().join("out");
        let (result, out) = execute_args(
            &[
                "urlqr",
                "logo",
                "https://example.com",
                "--logo",
                logo.to_str().unwrap(),
                "--output-dir",
                out_dir.to_str().unwrap(),
            ],
            "",
        );

        result.unwrap();
        assert!(out.contains("Settings: With Logo, Size: 10, Border: 4"));
        let written = image::open(out_dir.join("qr_code_with_logo.png")).unwrap();
        assert_eq!(written.width(), written.height());
    }

    #[test]
    fn test_interactive_reads_from_input() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let (result, out) = execute_args(
            &["urlqr", "interactive", "--output-dir", dir],
            "https://example.com\nsave 0\nquit\n",
        );

        result.unwrap();
        assert!(out.contains("QR Code generated successfully!"));
        assert!(tmp.path().join("qr_code_history_0.png").is_file());
    }
}
