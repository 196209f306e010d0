//! Line oriented interactive session.
//!
//! Each line read is one interaction: it is parsed into a [`Command`], run
//! against the [`Session`] and answered on the output. Failures are reported and
//! the loop carries on, so the session history survives mistakes.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{Color, EccLevel, GenerationConfig};
use crate::error::{Error, Result};
use crate::helper::save_bytes;
use crate::history::history_file_stem;
use crate::session::Session;

const HELP: &str = "\
Commands:
  gen <url>                  generate a QR code (a bare URL works too)
  batch <url> [<url>...]     generate one QR code per URL
  logo <url> <image>         generate a QR code with a png/jpg logo in the centre
  history                    list recent QR codes, most recent first
  save <index> [dir]         write a history entry to disk
  set <option> <value>       change fg, bg, size (5-20), border (1-10) or ecc (l/m/q/h)
  config                     show the current settings
  help                       show this message
  quit                       leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(String),
    Batch(Vec<String>),
    Logo { url: String, logo: PathBuf },
    History,
    Save { index: usize, directory: Option<PathBuf> },
    Set { option: String, value: String },
    Config,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> std::result::Result<Option<Command>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();
        let command = match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
            ("gen" | "generate", [url]) => Command::Generate((*url).to_owned()),
            ("gen" | "generate", _) => return Err("usage: gen <url>".into()),
            ("batch", []) => return Err("usage: batch <url> [<url>...]".into()),
            ("batch", urls) => Command::Batch(urls.iter().map(|u| (*u).to_owned()).collect()),
            ("logo", [url, logo]) => Command::Logo {
                url: (*url).to_owned(),
                logo: PathBuf::from(logo),
            },
            ("logo", _) => return Err("usage: logo <url> <image>".into()),
            ("history", []) => Command::History,
            ("history", _) => return Err("usage: history".into()),
            ("save", [index, dir @ ..]) if dir.len() <= 1 => Command::Save {
                index: index
                    .parse()
                    .map_err(|_| format!("invalid history index {index:?}"))?,
                directory: dir.first().map(PathBuf::from),
            },
            ("save", _) => return Err("usage: save <index> [dir]".into()),
            ("set", [option, value]) => Command::Set {
                option: option.to_ascii_lowercase(),
                value: (*value).to_owned(),
            },
            ("set", _) => return Err("usage: set <option> <value>".into()),
            ("config", []) => Command::Config,
            ("config", _) => return Err("usage: config (use `set` to change a setting)".into()),
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit", _) => Command::Quit,
            (_, []) if head.contains("://") => Command::Generate(head.to_owned()),
            _ => return Err(format!("unknown command {head:?}, type `help` for a list")),
        };
        Ok(Some(command))
    }
}

/// Runs the session until `quit` or end of input.
///
/// `out_dir` is where `save` writes when no directory is given.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
    out_dir: &Path,
) -> Result<()> {
    writeln!(output, "QR Code Generator, type `help` for commands.")?;
    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;
        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                writeln!(output, "{usage}")?;
                continue;
            }
        };
        debug!(?command, "interactive command");
        if command == Command::Quit {
            break;
        }
        if let Err(err) = execute(session, command, &mut output, out_dir) {
            writeln!(output, "Error: {err}")?;
        }
    }
    Ok(())
}

fn execute<W: Write>(
    session: &mut Session,
    command: Command,
    output: &mut W,
    out_dir: &Path,
) -> Result<()> {
    match command {
        Command::Generate(url) => {
            let generated = session.generate_single(&url)?;
            writeln!(output, "QR Code generated successfully!")?;
            write!(output, "{}", generated.preview())?;
            writeln!(output, "\n{} ({})", generated.url, generated.settings)?;
        }
        Command::Batch(urls) => {
            let report = session.generate_batch(&urls.join("\n"))?;
            if let Some(message) = report.plan.skipped_message() {
                writeln!(output, "{message}")?;
            }
            if !report.plan.valid.is_empty() {
                writeln!(output, "Generating {} QR code(s)...", report.plan.valid.len())?;
            }
            for item in &report.items {
                match &item.outcome {
                    Ok(_) => writeln!(output, "  [{}] {}", item.number, item.caption())?,
                    Err(err) => writeln!(output, "Error generating QR code for {}: {err}", item.url)?,
                }
            }
        }
        Command::Logo { url, logo } => {
            let generated = session.generate_with_logo(&url, &logo)?;
            writeln!(output, "QR Code with logo generated successfully!")?;
            writeln!(output, "{} ({})", generated.url, generated.settings)?;
        }
        Command::History => {
            if session.history().is_empty() {
                writeln!(output, "No QR codes generated yet.")?;
            }
            for (idx, entry) in session.history().iter().enumerate() {
                writeln!(output, "  {idx}: {}  [{}]", entry.caption(), entry.settings)?;
            }
        }
        Command::Save { index, directory } => {
            let entry = session.history().get(index).ok_or(Error::NoSuchEntry(index))?;
            let directory = directory.as_deref().unwrap_or(out_dir);
            let path = save_bytes(&entry.image, Some(directory), Some(&history_file_stem(index)), "png")?;
            writeln!(output, "Saved {}", path.display())?;
        }
        Command::Set { option, value } => {
            let config = apply_setting(*session.config(), &option, &value)?;
            session.set_config(config);
            print_config(output, &config)?;
        }
        Command::Config => print_config(output, session.config())?,
        Command::Help => writeln!(output, "{HELP}")?,
        Command::Quit => {}
    }
    Ok(())
}

fn apply_setting(config: GenerationConfig, option: &str, value: &str) -> Result<GenerationConfig> {
    let parse_number = |name: &'static str| {
        value.parse::<u32>().map_err(|_| Error::InvalidNumber {
            name,
            value: value.to_owned(),
        })
    };
    match option {
        "fg" | "foreground" => Ok(config.with_foreground(value.parse::<Color>()?)),
        "bg" | "background" => Ok(config.with_background(value.parse::<Color>()?)),
        "size" => config.with_module_size(parse_number("module size")?),
        "border" => config.with_border(parse_number("border")?),
        "ecc" => Ok(config.with_error_correction(value.parse::<EccLevel>()?)),
        other => Err(Error::UnknownSetting(other.to_owned())),
    }
}

fn print_config<W: Write>(output: &mut W, config: &GenerationConfig) -> Result<()> {
    writeln!(
        output,
        "fg {}  bg {}  size {}  border {}  ecc {}",
        config.foreground(),
        config.background(),
        config.module_size(),
        config.border(),
        config.error_correction()
    )?;
    Ok(())
}
