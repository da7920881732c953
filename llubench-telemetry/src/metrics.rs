//! ## llubench-telemetry::metrics
//! **Prometheus counters for a benchmark run**

use llubench_core::bench::IterationSummary;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use tracing::info;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub iterations: IntCounter,
    pub element_visits: IntCounter,
    pub elements_grown: IntCounter,
    pub allocated: IntGauge,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let iterations =
            IntCounter::new("llubench_iterations_total", "Completed traverse/grow iterations")?;
        let element_visits =
            IntCounter::new("llubench_element_visits_total", "Elements visited by traversal")?;
        let elements_grown =
            IntCounter::new("llubench_elements_grown_total", "Elements added by growth")?;
        let allocated = IntGauge::new("llubench_elements_allocated", "Elements allocated so far")?;

        registry.register(Box::new(iterations.clone()))?;
        registry.register(Box::new(element_visits.clone()))?;
        registry.register(Box::new(elements_grown.clone()))?;
        registry.register(Box::new(allocated.clone()))?;

        Ok(Self {
            registry,
            iterations,
            element_visits,
            elements_grown,
            allocated,
        })
    }

    /// Folds one iteration's summary into the counters.
    pub fn observe(&self, summary: &IterationSummary) {
        self.iterations.inc();
        self.element_visits.inc_by(summary.traversal.visits);
        self.elements_grown.inc_by(summary.elements_added);
        self.allocated.set(summary.num_allocated as i64);
    }

    /// Renders the registry in the Prometheus text format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Logs the counters at info level.
    pub fn log_summary(&self) {
        info!(
            iterations = self.iterations.get(),
            element_visits = self.element_visits.get(),
            elements_grown = self.elements_grown.get(),
            allocated = self.allocated.get(),
            "run metrics"
        );
    }
}
