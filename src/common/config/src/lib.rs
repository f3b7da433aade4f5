//! Configuration management for Mosaic.
//!
//! Provides the engine policy shared by every filter invocation and the
//! execution settings used by the parallel range executor.

use std::path::Path;

use common_error::MosaicResult;
use serde::{Deserialize, Serialize};

/// Global Mosaic configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MosaicConfig {
    /// Engine-wide validation and insertion policy.
    pub engine: EngineConfig,
    /// Execution configuration.
    pub execution: ExecutionConfig,
}

impl MosaicConfig {
    /// Parse a configuration from a JSON string. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> MosaicResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> MosaicResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> MosaicResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Policy applied uniformly by the engine to every filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Escalate warnings to errors at the moment they are recorded.
    pub treat_warnings_as_errors: bool,
    /// What happens when an output array name already exists.
    pub array_insert_policy: ArrayInsertPolicy,
}

impl EngineConfig {
    /// Enable or disable warning escalation.
    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.treat_warnings_as_errors = enabled;
        self
    }

    /// Set the insertion policy.
    pub fn with_insert_policy(mut self, policy: ArrayInsertPolicy) -> Self {
        self.array_insert_policy = policy;
        self
    }
}

/// Behavior of output creation when an array of the same name exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ArrayInsertPolicy {
    /// Keep an existing array if type and shape match, otherwise record a name collision.
    #[default]
    RejectIncompatible,
    /// Replace an existing array of the same name, recording a warning.
    Replace,
}

/// Execution configuration for elementwise transforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Number of worker threads; `None` uses the available hardware concurrency.
    pub parallelism: Option<usize>,
    /// Below this many tuples transforms run sequentially.
    pub min_parallel_tuples: usize,
    /// Allow filters to fan out over worker threads at all.
    pub enable_parallel: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            parallelism: None,
            min_parallel_tuples: 10_000,
            enable_parallel: true,
        }
    }
}

impl ExecutionConfig {
    /// Set the worker count.
    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }

    /// Set the sequential fallback threshold.
    pub fn with_min_parallel_tuples(mut self, threshold: usize) -> Self {
        self.min_parallel_tuples = threshold;
        self
    }

    /// Force sequential execution.
    pub fn sequential() -> Self {
        Self {
            parallelism: Some(1),
            min_parallel_tuples: usize::MAX,
            enable_parallel: false,
        }
    }

    /// Effective worker count after applying the hardware fallback.
    pub fn effective_workers(&self) -> usize {
        if !self.enable_parallel {
            return 1;
        }
        self.parallelism.unwrap_or_else(num_cpus).max(1)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(1)
}
