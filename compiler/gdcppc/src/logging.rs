//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set, e.g. `RUST_LOG=gdcpp_types=trace` to follow
//! classification. Otherwise everything at `--log-level` and above is shown.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Later calls do nothing.
pub fn init_tracing(level: LogLevel) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.tracing_level().as_str()));
        // A subscriber installed by an embedding program stays in place.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    });
}
