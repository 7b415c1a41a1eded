//! Tracing setup for host services

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Returns `false` if
/// a global subscriber was already installed.
pub fn init_tracing(json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
