//! logging
//!
//! Diagnostic logging setup.
//!
//! Events are written to stderr through a `tracing-subscriber` fmt layer so
//! they never mix with command output on stdout.
//!
//! # Filter
//!
//! 1. `$MODVER_LOG` if set (e.g. `debug`, `modver::core=trace`)
//! 2. `$RUST_LOG` if set
//! 3. `debug` with `--debug`, `warn` otherwise

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "MODVER_LOG";

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };

    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(&directive).unwrap_or_else(|err| {
            eprintln!(
                "invalid {} directive ({}); defaulting to {} logging",
                LOG_ENV, err, fallback
            );
            EnvFilter::new(fallback)
        }),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
    };

    let fmt_layer = fmt::layer()
        .with_target(debug)
        .without_time()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .ok();
}
