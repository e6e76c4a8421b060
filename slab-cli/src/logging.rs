use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Builds the log filter.
///
/// `RUST_LOG` wins when set; otherwise `level` is used. Accepts a bare level
/// ("error", "warn", "info", "debug", "trace") or any full EnvFilter directive.
pub fn make_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| anyhow::anyhow!("invalid log level '{level}': {e}"))
}

/// Initializes logging. Call once at startup.
///
/// Logs go to stderr so stdout only carries results (and stays valid JSON
/// under `--json`). Timestamps and targets are stripped to keep CLI output
/// clean. Calling this twice is harmless; the second call is ignored.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = make_filter(level)?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();

    Ok(())
}
