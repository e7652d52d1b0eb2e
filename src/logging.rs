//! Logging initialization.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. Quiet by default so the
/// conversation on stdout is not interleaved with diagnostics.
pub const DEFAULT_FILTER: &str = "error";

/// Install the global tracing subscriber, writing to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
