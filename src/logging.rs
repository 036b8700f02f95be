//! `tracing` subscriber setup for binaries. Library code only emits events.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a compact fmt subscriber filtered by `filter` (an `EnvFilter`
/// directive such as `blog=debug`), falling back to [`DEFAULT_LOG_FILTER`]
/// when absent or unparsable.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init(filter: Option<&str>) -> bool {
    let filter = filter
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
