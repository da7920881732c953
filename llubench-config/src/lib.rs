//! # llubench Configuration
//!
//! Layered settings for a benchmark run. Later layers override earlier ones:
//!
//! 1. Built-in defaults (one list, one 64-byte element, no growth)
//! 2. An optional YAML file
//! 3. `LLUBENCH_*` environment variables (e.g. `LLUBENCH_GROWTH_RATE=0.333`)
//! 4. Command-line overrides
//!
//! `iterations` has no default and must come from one of the layers.
//! The resolved configuration is immutable for the rest of the run.

#![warn(unsafe_code)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use llubench_core::growth::GrowthMode;
use llubench_core::BenchParams;

mod error;
pub mod validation;

pub use error::ConfigError;

/// Prefix of the environment variables read by [`BenchConfig::load`].
pub const ENV_PREFIX: &str = "LLUBENCH_";

/// How fractional growth rates are turned into elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthModeKind {
    /// Shared accumulator; all lists grow together.
    #[default]
    Synchronized,
    /// Each list draws its own extra element with probability `frac(rate)`.
    Independent,
}

/// Benchmark settings. Unrecognised keys in any layer are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    /// Number of traverse/grow iterations.
    pub iterations: u64,

    /// Number of independent lists. Zero lists is a valid, empty run.
    #[serde(default = "default_one")]
    pub num_lists: usize,

    /// Size of every element in bytes, header included.
    #[serde(default = "default_element_size")]
    #[validate(custom(function = validation::validate_element_size))]
    pub element_size: usize,

    /// Elements per list before the first iteration.
    #[serde(default = "default_one")]
    #[validate(range(min = 1, message = "initial list length must be positive"))]
    pub initial_length: usize,

    /// Expected elements added per list per iteration.
    #[serde(default)]
    #[validate(custom(function = validation::validate_growth_rate))]
    pub growth_rate: f64,

    #[serde(default)]
    pub growth_mode: GrowthModeKind,

    /// Seed for `independent` growth.
    #[serde(default)]
    pub seed: u64,

    /// Increment every element's counter during traversal.
    #[serde(default)]
    pub dirty: bool,

    /// Grow lists at the tail instead of the head.
    #[serde(default)]
    pub tail: bool,

    /// Record allocated and accessed addresses.
    #[serde(default)]
    pub verbose: bool,

    /// Directory receiving the trace files.
    #[serde(default = "default_trace_dir")]
    pub trace_dir: PathBuf,
}

fn default_one() -> usize {
    1
}

fn default_element_size() -> usize {
    64
}

fn default_trace_dir() -> PathBuf {
    PathBuf::from(".")
}

impl BenchConfig {
    /// Settings with every default and the given iteration count.
    pub fn with_iterations(iterations: u64) -> Self {
        Self {
            iterations,
            num_lists: default_one(),
            element_size: default_element_size(),
            initial_length: default_one(),
            growth_rate: 0.0,
            growth_mode: GrowthModeKind::default(),
            seed: 0,
            dirty: false,
            tail: false,
            verbose: false,
            trace_dir: default_trace_dir(),
        }
    }

    /// Resolves the configuration from an optional YAML file, the
    /// environment and `overrides` (any serializable struct whose absent
    /// fields are skipped), then validates it.
    pub fn load<T: Serialize>(
        config_file: Option<&Path>,
        overrides: &T,
    ) -> Result<Self, ConfigError> {
        let mut figment = Figment::new();

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        Self::extract(
            figment
                .merge(Env::prefixed(ENV_PREFIX))
                .merge(Serialized::defaults(overrides)),
        )
    }

    /// Load configuration from a specific YAML file only.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Self::extract(Figment::new().merge(Yaml::file(path)))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    pub fn growth_mode(&self) -> GrowthMode {
        match self.growth_mode {
            GrowthModeKind::Synchronized => GrowthMode::Synchronized,
            GrowthModeKind::Independent => GrowthMode::Independent { seed: self.seed },
        }
    }

    /// Parameters for [`llubench_core::Benchmark`].
    pub fn to_params(&self) -> BenchParams {
        BenchParams {
            iterations: self.iterations,
            num_lists: self.num_lists,
            element_size: self.element_size,
            initial_length: self.initial_length,
            growth_rate: self.growth_rate,
            growth_mode: self.growth_mode(),
            dirty: self.dirty,
            tail: self.tail,
        }
    }
}
