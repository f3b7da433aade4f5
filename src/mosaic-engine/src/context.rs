//! Per-invocation filter context.
//!
//! A [`FilterContext`] is created for each validate or execute call. It
//! carries the engine configuration and accumulates diagnostics. Warnings
//! are escalated to errors at record time when the configuration asks for it.

use log::warn;

use common_config::{ArrayInsertPolicy, EngineConfig, ExecutionConfig, MosaicConfig};
use common_error::{codes, MosaicError, MosaicResult};
use mosaic_core::geometry::{GeometryIssue, IssueSeverity};

use crate::diagnostics::{first_error_code, Diagnostic, Severity};
use crate::parallel::ParallelRangeExecutor;

/// Diagnostic sink and configuration for one filter invocation.
#[derive(Debug, Clone)]
pub struct FilterContext {
    filter: String,
    engine: EngineConfig,
    execution: ExecutionConfig,
    diagnostics: Vec<Diagnostic>,
}

impl FilterContext {
    /// Create a context for `filter` with default configuration.
    pub fn new(filter: impl Into<String>) -> Self {
        Self::with_config(filter, &MosaicConfig::default())
    }

    /// Create a context for `filter` with the given configuration.
    pub fn with_config(filter: impl Into<String>, config: &MosaicConfig) -> Self {
        Self {
            filter: filter.into(),
            engine: config.engine.clone(),
            execution: config.execution.clone(),
            diagnostics: Vec::new(),
        }
    }

    /// Name of the filter this context belongs to.
    pub fn filter_name(&self) -> &str {
        &self.filter
    }

    /// Engine policy.
    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    /// Parallel execution settings.
    pub fn execution_config(&self) -> &ExecutionConfig {
        &self.execution
    }

    /// Array collision policy.
    pub fn insert_policy(&self) -> ArrayInsertPolicy {
        self.engine.array_insert_policy
    }

    /// A range executor over `total` tuples configured from this context.
    pub fn executor(&self, total: usize) -> ParallelRangeExecutor {
        ParallelRangeExecutor::from_config(total, &self.execution)
    }

    /// Record an error.
    pub fn set_error(&mut self, code: i32, message: impl Into<String>) {
        let diagnostic = Diagnostic::error(&self.filter, code, message);
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Record a warning, or an error if warnings are treated as errors.
    pub fn set_warning(&mut self, code: i32, message: impl Into<String>) {
        if self.engine.treat_warnings_as_errors {
            self.set_error(code, message);
        } else {
            self.diagnostics
                .push(Diagnostic::warning(&self.filter, code, message));
        }
    }

    /// Record a [`MosaicError`] under its stable code.
    pub fn record(&mut self, err: &MosaicError) {
        self.set_error(err.code(), err.message());
    }

    /// Record a geometry issue with its own severity.
    pub fn record_issue(&mut self, issue: &GeometryIssue) {
        match issue.severity {
            IssueSeverity::Error => self.set_error(issue.code, issue.message.clone()),
            IssueSeverity::Warning => self.set_warning(issue.code, issue.message.clone()),
        }
    }

    /// Unwrap `result`, recording the error and returning `None` on failure.
    pub fn check<T>(&mut self, result: MosaicResult<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.record(&e);
                None
            }
        }
    }

    /// The first recorded error code, or `NO_ERROR`.
    pub fn error_code(&self) -> i32 {
        first_error_code(&self.diagnostics)
    }

    /// The first recorded warning code, or `NO_ERROR`.
    pub fn warning_code(&self) -> i32 {
        self.diagnostics
            .iter()
            .find(|d| d.severity == Severity::Warning)
            .map_or(codes::NO_ERROR, |d| d.code)
    }

    /// Check if any error has been recorded.
    pub fn has_error(&self) -> bool {
        self.error_code() < 0
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain all diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Forget all diagnostics.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_and_warning_codes() {
        let mut ctx = FilterContext::new("Test");
        assert_eq!(ctx.error_code(), 0);
        ctx.set_warning(codes::ARRAY_REPLACED, "replaced");
        assert_eq!(ctx.warning_code(), codes::ARRAY_REPLACED);
        assert!(!ctx.has_error());

        ctx.set_error(codes::PATH_NOT_FOUND, "missing");
        assert_eq!(ctx.error_code(), codes::PATH_NOT_FOUND);
        assert_eq!(ctx.diagnostics().len(), 2);
        assert_eq!(ctx.diagnostics()[1].filter, "Test");
    }

    #[test]
    fn test_warning_escalation() {
        let mut config = MosaicConfig::default();
        config.engine = config.engine.with_warnings_as_errors(true);
        let mut ctx = FilterContext::with_config("Test", &config);

        ctx.set_warning(codes::STRUCTURAL_WARNING, "degenerate");
        assert!(ctx.has_error());
        assert_eq!(ctx.error_code(), -codes::STRUCTURAL_WARNING);
        assert_eq!(ctx.warning_code(), 0);
    }

    #[test]
    fn test_check_records_error() {
        let mut ctx = FilterContext::new("Test");
        let value: Option<u8> = ctx.check(Err(MosaicError::type_mismatch("nope")));
        assert!(value.is_none());
        assert_eq!(ctx.error_code(), codes::TYPE_MISMATCH);
        assert_eq!(ctx.take_diagnostics().len(), 1);
        assert!(ctx.diagnostics().is_empty());
    }
}
