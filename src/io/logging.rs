//! Structured logging setup for the command-line tool
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary. `RUST_LOG` takes precedence over the verbosity flags.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Filter directive for a verbosity level
///
/// `quiet` only lets errors through; otherwise each `-v` raises the crate's
/// level one step from `warn`.
pub const fn filter_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "wavetile=info,warn",
        2 => "wavetile=debug,info",
        _ => "wavetile=trace,debug",
    }
}

/// Install the global subscriber, writing compact lines to stderr
///
/// Only the first call has any effect; a subscriber installed elsewhere is
/// left in place.
pub fn init_tracing(verbosity: u8, quiet: bool) {
    let directive = filter_directive(verbosity, quiet);
    TRACING_INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact();

        // A subscriber set by an embedding application wins
        let _ = subscriber.try_init();
    });
}
