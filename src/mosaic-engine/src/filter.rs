//! The two-phase filter protocol.
//!
//! # Lifecycle
//!
//! ```text
//! Constructed ──validate──▶ Validated{ok} ──execute──▶ Executed{ok}
//!                     └───▶ Validated{failed}   └────▶ Executed{failed}
//! ```
//!
//! - `data_check` resolves inputs and creates (shape-only) outputs. It never
//!   touches buffer contents and is idempotent.
//! - `execute` is only reached after a fresh `data_check` that recorded no
//!   error. Errors recorded during execute stop further mutation.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use log::debug;

use common_config::MosaicConfig;
use common_error::codes;
use mosaic_core::{DataArrayPath, DataContainerArray};

use crate::context::FilterContext;
use crate::diagnostics::Diagnostic;
use crate::metrics::FilterMetrics;

/// A unit of work against the registry.
///
/// Implementors hold their parameters and any [`DataArrayPath`]s; they hold
/// no references into the registry between phases.
pub trait Filter: Debug + Send {
    /// Human-readable filter name, used to tag diagnostics.
    fn name(&self) -> &str;

    /// Paths that must exist before this filter runs.
    fn required_inputs(&self) -> Vec<DataArrayPath> {
        Vec::new()
    }

    /// Paths this filter creates.
    fn created_outputs(&self) -> Vec<DataArrayPath> {
        Vec::new()
    }

    /// Validate parameters and inputs, create outputs without touching data.
    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext);

    /// Compute into the outputs prepared by `data_check`.
    fn execute(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext);
}

/// Where a filter is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterState {
    /// Parameters set, not yet validated.
    #[default]
    Constructed,
    /// The last validate finished; `ok` is false if it recorded an error.
    Validated { ok: bool },
    /// The last execute finished; `ok` is false if it recorded an error.
    Executed { ok: bool },
}

impl FilterState {
    /// Check if the last phase recorded an error.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Validated { ok: false } | Self::Executed { ok: false })
    }

    /// Check if the filter executed successfully.
    pub fn is_executed(&self) -> bool {
        *self == Self::Executed { ok: true }
    }
}

/// Drives a [`Filter`] through validate and execute.
#[derive(Debug)]
pub struct FilterRunner {
    filter: Box<dyn Filter>,
    config: MosaicConfig,
    state: FilterState,
    diagnostics: Vec<Diagnostic>,
    metrics: FilterMetrics,
}

impl FilterRunner {
    /// Wrap `filter` with the default configuration.
    pub fn new(filter: impl Filter + 'static) -> Self {
        Self::from_boxed(Box::new(filter))
    }

    /// Wrap an already boxed filter.
    pub fn from_boxed(filter: Box<dyn Filter>) -> Self {
        let metrics = FilterMetrics::new(filter.name());
        Self {
            filter,
            config: MosaicConfig::default(),
            state: FilterState::Constructed,
            diagnostics: Vec::new(),
            metrics,
        }
    }

    /// Use `config` for subsequent phases.
    pub fn with_config(mut self, config: MosaicConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the configuration for subsequent phases.
    pub fn set_config(&mut self, config: MosaicConfig) {
        self.config = config;
    }

    /// The wrapped filter.
    pub fn filter(&self) -> &dyn Filter {
        self.filter.as_ref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Diagnostics from the last phase.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain diagnostics from the last phase.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Timing of the last phases.
    pub fn metrics(&self) -> &FilterMetrics {
        &self.metrics
    }

    /// The first error code of the last phase, or `NO_ERROR`.
    pub fn error_code(&self) -> i32 {
        crate::diagnostics::first_error_code(&self.diagnostics)
    }

    /// The first warning code of the last phase, or `NO_ERROR`.
    pub fn warning_code(&self) -> i32 {
        self.diagnostics
            .iter()
            .find(|d| d.is_warning())
            .map_or(codes::NO_ERROR, |d| d.code)
    }

    fn context(&self) -> FilterContext {
        FilterContext::with_config(self.filter.name(), &self.config)
    }

    fn run_data_check(&mut self, registry: &mut DataContainerArray) -> FilterContext {
        let mut ctx = self.context();
        let start = Instant::now();
        self.filter.data_check(registry, &mut ctx);
        self.metrics.validate_time = start.elapsed();
        ctx
    }

    /// Validate the filter against `registry`.
    ///
    /// Clears previous diagnostics. Repeated calls on an unchanged registry
    /// produce the same diagnostics and the same registry structure.
    /// Returns the error code (negative) or `NO_ERROR`.
    pub fn validate(&mut self, registry: &mut DataContainerArray) -> i32 {
        let mut ctx = self.run_data_check(registry);
        let code = ctx.error_code();
        self.diagnostics = ctx.take_diagnostics();
        self.state = FilterState::Validated { ok: code >= 0 };
        debug!(
            "Validated '{}': code {code}, {} diagnostics",
            self.filter.name(),
            self.diagnostics.len()
        );
        code
    }

    /// Re-validate, then execute if validation recorded no error.
    ///
    /// On a validation error the registry's buffers are left untouched.
    /// Returns the error code (negative) or `NO_ERROR`.
    pub fn execute(&mut self, registry: &mut DataContainerArray) -> i32 {
        let mut ctx = self.run_data_check(registry);
        if ctx.has_error() {
            let code = ctx.error_code();
            self.diagnostics = ctx.take_diagnostics();
            self.state = FilterState::Executed { ok: false };
            self.metrics.execute_time = Duration::ZERO;
            debug!(
                "Skipping execute of '{}': validation failed with code {code}",
                self.filter.name()
            );
            return code;
        }

        let start = Instant::now();
        self.filter.execute(registry, &mut ctx);
        self.metrics.execute_time = start.elapsed();

        let code = ctx.error_code();
        self.diagnostics = ctx.take_diagnostics();
        self.state = FilterState::Executed { ok: code >= 0 };
        debug!(
            "Executed '{}' in {:?}: code {code}",
            self.filter.name(),
            self.metrics.execute_time
        );
        code
    }
}
