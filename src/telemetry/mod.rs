use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the process-wide tracing subscriber.
///
/// The filter comes from `PYRITE_LOG_FILTER` when set, so individual targets
/// can be tuned without touching the command line, and falls back to the
/// level given by the `--log` flag.
pub fn init(level: &str) -> Result<()> {
	let filter = match EnvFilter::try_from_env("PYRITE_LOG_FILTER") {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(level)?,
	};
	tracing_subscriber::fmt().with_env_filter(filter).init();
	Ok(())
}
