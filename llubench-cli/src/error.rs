use std::path::PathBuf;

use llubench_config::ConfigError;
use llubench_core::BenchError;
use thiserror::Error;

/// Exit status for configuration errors (bad flags, missing `-i`).
pub const EXIT_USAGE: u8 = 2;
/// Exit status for precondition violations, matching an aborted process.
pub const EXIT_PRECONDITION: u8 = 134;
/// Exit status for I/O failures and digest mismatches.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bench(#[from] BenchError),

    #[error("Cannot open trace files in {}: {source}", path.display())]
    TraceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl CliError {
    /// Whether the usage text should accompany the error.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            CliError::Config(ConfigError::Parsing(_) | ConfigError::FileNotFound(_))
        )
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(ConfigError::Validation(_))
            | CliError::Bench(BenchError::Precondition(_)) => EXIT_PRECONDITION,
            CliError::Config(_) => EXIT_USAGE,
            CliError::Bench(_) | CliError::TraceOpen { .. } | CliError::Metrics(_) => EXIT_FAILURE,
        }
    }
}
