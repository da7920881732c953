use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use llubench_config::{BenchConfig, GrowthModeKind};
use llubench_core::trace::{FileTrace, NullTrace, TraceSink};
use llubench_core::{BenchParams, Benchmark, RunReport};
use llubench_telemetry::MetricsRecorder;

use crate::error::CliError;

/// Linked-list traversal micro-benchmark.
///
/// To approximate the Health workload use: -i <N> -g .333 -d -t -n 341
#[derive(Parser, Debug, Clone)]
#[command(name = "llubench", version, about)]
pub struct Cli {
    /// Number of (I)terations (required, here or in the config file)
    #[arg(short = 'i', value_name = "N")]
    pub iterations: Option<u64>,

    /// Initial (L)ength of every list, in elements [default: 1]
    #[arg(short = 'l', value_name = "N")]
    pub initial_length: Option<usize>,

    /// (N)umber of lists [default: 1]
    #[arg(short = 'n', value_name = "N")]
    pub num_lists: Option<usize>,

    /// (S)ize of an element in bytes [default: 64]
    #[arg(short = 's', value_name = "BYTES")]
    pub element_size: Option<usize>,

    /// (G)rowth rate per list, in elements per iteration [default: 0]
    #[arg(short = 'g', value_name = "RATE", allow_negative_numbers = true)]
    pub growth_rate: Option<f64>,

    /// (D)irty each element during traversal
    #[arg(short = 'd')]
    pub dirty: bool,

    /// Insert at the (T)ail of each list instead of the head
    #[arg(short = 't')]
    pub tail: bool,

    /// Record all allocated and accessed element addresses
    #[arg(short = 'v')]
    pub verbose: bool,

    /// YAML file with default settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for ptr_alloca_file and ptr_access_file [default: .]
    #[arg(long, value_name = "DIR")]
    pub trace_dir: Option<PathBuf>,

    /// How fractional growth rates are applied
    #[arg(long, value_enum)]
    pub growth_mode: Option<GrowthModeArg>,

    /// Seed for independent growth
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fail unless the run digest equals this hex string
    #[arg(long, value_name = "HEX")]
    pub validate_hash: Option<String>,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long)]
    pub metrics: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthModeArg {
    /// All lists grow together from a shared fractional accumulator
    Synchronized,
    /// Each list grows on its own, randomly, at the given average rate
    Independent,
}

impl From<GrowthModeArg> for GrowthModeKind {
    fn from(arg: GrowthModeArg) -> Self {
        match arg {
            GrowthModeArg::Synchronized => GrowthModeKind::Synchronized,
            GrowthModeArg::Independent => GrowthModeKind::Independent,
        }
    }
}

/// Command-line layer of the configuration. Flags that were not given are
/// left out so lower layers (file, environment) show through.
#[derive(Serialize, Debug, Default, PartialEq)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    initial_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_lists: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    element_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    growth_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    growth_mode: Option<GrowthModeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dirty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tail: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_dir: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            iterations: self.iterations,
            initial_length: self.initial_length,
            num_lists: self.num_lists,
            element_size: self.element_size,
            growth_rate: self.growth_rate,
            growth_mode: self.growth_mode.map(GrowthModeKind::from),
            seed: self.seed,
            dirty: self.dirty.then_some(true),
            tail: self.tail.then_some(true),
            verbose: self.verbose.then_some(true),
            trace_dir: self.trace_dir.clone(),
        }
    }

    pub fn load_config(&self) -> Result<BenchConfig, CliError> {
        Ok(BenchConfig::load(self.config.as_deref(), &self.overrides())?)
    }
}

/// Resolves the configuration and runs the benchmark, writing progress to
/// `out`.
pub fn run_benchmark<W: Write>(cli: &Cli, out: &mut W) -> Result<RunReport, CliError> {
    let config = cli.load_config()?;
    debug!(?config, "configuration resolved");

    let metrics = MetricsRecorder::new()?;
    let params = config.to_params();

    // Separate instantiations keep the untraced loop free of sink dispatch.
    let report = if config.verbose {
        let trace = FileTrace::create(&config.trace_dir).map_err(|source| CliError::TraceOpen {
            path: config.trace_dir.clone(),
            source,
        })?;
        info!(
            alloc = %trace.alloc_path().display(),
            access = %trace.access_path().display(),
            "recording address traces"
        );
        execute(params, trace, out, &metrics)?
    } else {
        execute(params, NullTrace, out, &metrics)?
    };

    metrics.log_summary();
    if cli.metrics {
        eprint!("{}", metrics.gather_metrics()?);
    }
    if let Some(expected) = &cli.validate_hash {
        report.verify_digest(expected)?;
        info!("run digest verified");
    }
    Ok(report)
}

fn execute<T: TraceSink, W: Write>(
    params: BenchParams,
    sink: T,
    out: &mut W,
    metrics: &MetricsRecorder,
) -> Result<RunReport, CliError> {
    let mut bench = Benchmark::new(params, sink)?;
    let report = bench.run(out, |summary| metrics.observe(summary))?;
    bench.finish()?;
    Ok(report)
}
