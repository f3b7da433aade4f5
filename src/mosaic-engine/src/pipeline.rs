//! Ordered filter pipelines.
//!
//! A [`Pipeline`] runs filters strictly in order. Preflight validates every
//! filter against a scratch copy of the registry, so later filters see the
//! outputs created by earlier ones without touching the caller's data.
//! Execution stops at the first failing filter. Cancellation is polled
//! between filters only; completed filters are not rolled back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;

use common_config::MosaicConfig;
use common_error::{MosaicError, MosaicResult};
use mosaic_core::DataContainerArray;

use crate::diagnostics::Diagnostic;
use crate::filter::{Filter, FilterRunner, FilterState};
use crate::metrics::FilterMetrics;

// ============================================================================
// Cancellation Handle
// ============================================================================

/// Handle for cancelling a running pipeline from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancellationHandle {
    /// Create a new, uncancelled handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Pipeline Report
// ============================================================================

/// Outcome of a preflight or execute run.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Diagnostics of every filter that ran, in order.
    pub diagnostics: Vec<Diagnostic>,
    /// Final state of each filter, in pipeline order.
    pub states: Vec<FilterState>,
    /// Number of filters whose execute completed without error.
    pub executed: usize,
    /// Per-filter timing.
    pub metrics: Vec<FilterMetrics>,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
}

impl PipelineReport {
    /// Check if no filter recorded an error.
    pub fn is_success(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// The first error code, or `NO_ERROR`.
    pub fn error_code(&self) -> i32 {
        crate::diagnostics::first_error_code(&self.diagnostics)
    }

    /// Error diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Warning diagnostics only.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// An ordered list of filters sharing one configuration.
#[derive(Debug, Default)]
pub struct Pipeline {
    runners: Vec<FilterRunner>,
    config: MosaicConfig,
}

impl Pipeline {
    /// Create an empty pipeline with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for every filter.
    pub fn with_config(mut self, config: MosaicConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a filter.
    pub fn push(&mut self, filter: impl Filter + 'static) {
        self.push_boxed(Box::new(filter));
    }

    /// Append an already boxed filter.
    pub fn push_boxed(&mut self, filter: Box<dyn Filter>) {
        self.runners.push(FilterRunner::from_boxed(filter));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.push(filter);
        self
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.runners.len()
    }

    /// Check if the pipeline has no filters.
    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Filter names in order.
    pub fn filter_names(&self) -> Vec<&str> {
        self.runners.iter().map(|r| r.filter().name()).collect()
    }

    /// Validate every filter in order against a copy of `registry`.
    ///
    /// Returns the report and the scratch registry, whose structure is what
    /// execution would produce.
    pub fn preflight(&mut self, registry: &DataContainerArray) -> (PipelineReport, DataContainerArray) {
        let start = Instant::now();
        let mut scratch = registry.clone();
        let mut report = PipelineReport::default();
        let config = self.config.clone();

        for runner in &mut self.runners {
            runner.set_config(config.clone());
            runner.validate(&mut scratch);
            report.diagnostics.extend(runner.take_diagnostics());
            report.states.push(runner.state());
            report.metrics.push(runner.metrics().clone());
        }

        report.elapsed = start.elapsed();
        info!(
            "Preflight of {} filters finished with code {}",
            self.runners.len(),
            report.error_code()
        );
        (report, scratch)
    }

    /// Execute every filter in order against `registry`.
    ///
    /// Stops after the first filter that records an error. Fails with
    /// [`MosaicError::Cancelled`] if `cancel` is set between filters.
    pub fn execute(
        &mut self,
        registry: &mut DataContainerArray,
        cancel: Option<&CancellationHandle>,
    ) -> MosaicResult<PipelineReport> {
        let start = Instant::now();
        let mut report = PipelineReport::default();
        let config = self.config.clone();
        let total = self.runners.len();

        for (i, runner) in self.runners.iter_mut().enumerate() {
            if cancel.is_some_and(CancellationHandle::is_cancelled) {
                info!("Pipeline cancelled after {i} of {total} filters");
                return Err(MosaicError::cancelled(format!(
                    "pipeline cancelled after {i} of {total} filters"
                )));
            }

            runner.set_config(config.clone());
            info!("Executing filter {}/{total}: {}", i + 1, runner.filter().name());
            let code = runner.execute(registry);
            report.diagnostics.extend(runner.take_diagnostics());
            report.states.push(runner.state());
            report.metrics.push(runner.metrics().clone());

            if code < 0 {
                info!("Filter '{}' failed with code {code}", runner.filter().name());
                break;
            }
            report.executed += 1;
        }

        report.elapsed = start.elapsed();
        Ok(report)
    }
}
