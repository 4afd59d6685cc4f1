//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "REPOCAT_LOG";

/// Install a stderr subscriber filtered by `REPOCAT_LOG` (default `warn`).
///
/// Stdout carries the bundle, so diagnostics must never go there.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
