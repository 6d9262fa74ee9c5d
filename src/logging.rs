//! Log setup for the binary
//!
//! The library only emits `tracing` events. Installing a subscriber is left to
//! the binary so embedders keep control of their own output.

use tracing_subscriber::{EnvFilter, fmt};

/// Install a stderr subscriber
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count
/// (warn, info, debug, trace). Calling this twice is harmless.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 2)
        .try_init();
}
