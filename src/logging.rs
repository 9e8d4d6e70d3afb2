use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize a tracing subscriber for the command-line tool.
///
/// Logs go to stderr so formatted output on stdout stays clean. The level
/// comes from `RUST_LOG`, defaulting to "warn" if not set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
