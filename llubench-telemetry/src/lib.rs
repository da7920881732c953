//! # llubench Telemetry
//!
//! Logging and run metrics. Both stay off the measured path: logs go to
//! stderr so stdout keeps the plain progress format, and metrics are
//! updated once per iteration from its summary rather than per element.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
