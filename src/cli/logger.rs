//! Tracing subscriber for the binary.
//!
//! The filter is read from `QUARRY_LOG` (e.g. `QUARRY_LOG=quarry=trace`).
//! Without it the level is `warn`, or `debug` with `--verbose`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "QUARRY_LOG";

pub fn init_logger(verbose: bool) {
    let default = if verbose { "quarry=debug" } else { "quarry=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // Logs go to stderr so `--json` output stays parseable.
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
