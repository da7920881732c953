//! ## llubench-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! Filter with `RUST_LOG` (default `info`); `debug` adds one line per
//! iteration, `trace` adds slab acquisitions.

use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Later calls are no-ops.
    pub fn init() {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}
