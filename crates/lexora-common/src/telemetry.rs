//! Structured logging setup.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `debug` selects `lexora=debug,info`
/// and plain `info` is used. Repeated calls are no-ops.
pub fn init_tracing(debug: bool) {
    let fallback = if debug { "lexora=debug,info" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .try_init();
}
