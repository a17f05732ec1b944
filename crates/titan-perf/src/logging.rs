//! Logging setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Filtering comes from `RUST_LOG` and defaults to `info`. Logs go to
/// stderr so the report on stdout stays clean. `json` switches to one
/// flattened JSON object per event.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .flatten_event(true)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
