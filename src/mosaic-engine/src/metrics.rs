//! Timing collected while running filters.

use std::fmt;
use std::time::Duration;

/// Wall-clock time spent in each phase of one filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMetrics {
    /// Filter name.
    pub filter: String,
    /// Time in the last `data_check`.
    pub validate_time: Duration,
    /// Time in the last `execute` body (zero if it did not run).
    pub execute_time: Duration,
}

impl FilterMetrics {
    /// Empty metrics for `filter`.
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Self::default()
        }
    }

    /// Total time across both phases.
    pub fn total_time(&self) -> Duration {
        self.validate_time + self.execute_time
    }
}

impl fmt::Display for FilterMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: validate={:?}, execute={:?}",
            self.filter, self.validate_time, self.execute_time
        )
    }
}

/// Format per-filter metrics, one line each.
pub fn format_metrics(metrics: &[FilterMetrics]) -> String {
    if metrics.is_empty() {
        return "No metrics collected.\n".to_string();
    }
    metrics.iter().map(|m| format!("{m}\n")).collect()
}
