//! Mosaic - typed data containers and a validate-then-execute filter engine
//!
//! Mosaic stores materials-science datasets as typed arrays grouped into
//! attribute matrices, owned by data containers with an optional geometry.
//! Filters declare their inputs and outputs in a side-effect-free validate
//! pass and mutate data only in execute.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export core crates
pub use common_config as config;
pub use common_error as error;
pub use mosaic_core as core;
pub use mosaic_engine as engine;
pub use mosaic_filters as filters;

/// Mosaic version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
