//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "WORDCOUNT_LOG";

/// Install the global fmt subscriber, filtered by `WORDCOUNT_LOG` (default `warn`).
///
/// Logs go to stderr so command output stays machine readable.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
