use anyhow::Result;
use clap::Parser;

use urlqr::logging::init_logger;

fn main() -> Result<()> {
    init_logger()?;
    let cli = urlqr::cli::Cli::parse();
    urlqr::cli::run(cli)?;
    Ok(())
}
