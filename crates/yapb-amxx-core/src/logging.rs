//! Logging setup.

use tracing_subscriber::EnvFilter;

use crate::config::env_vars;

/// Filter used when `YAPB_AMXX_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "yapb_amxx_core=info";

fn env_filter() -> EnvFilter {
    std::env::var(env_vars::LOG)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn json_logging() -> bool {
    std::env::var(env_vars::LOG_JSON)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

/// Install the `tracing` subscriber.
///
/// Leaves an already installed global subscriber alone, so calling this
/// more than once, or from inside a host that set one up, is harmless.
pub fn init() {
    let result = if json_logging() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}
