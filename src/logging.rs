use anyhow::Result;
use std::io::{stderr, IsTerminal};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Level used when `RUST_LOG` is not set. Results go to stdout, so keep
/// stderr quiet unless asked.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub fn init_logger() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let console_layer = fmt::layer()
        .with_writer(stderr)
        .with_ansi(IsTerminal::is_terminal(&stderr()))
        .with_level(true)
        .with_target(false)
        .without_time()
        .compact()
        .with_filter(env_filter);

    registry().with(console_layer).try_init()?;

    Ok(())
}
