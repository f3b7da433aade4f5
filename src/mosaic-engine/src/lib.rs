//! Filter execution engine for Mosaic.
//!
//! This crate provides the validate-then-execute filter protocol and the
//! machinery filters use to implement it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  validate   ┌──────────────┐  execute   ┌──────────────┐
//! │ Pipeline │ ──────────▶ │ FilterRunner │ ─────────▶ │ dyn Filter   │
//! └──────────┘             └──────────────┘            └──────────────┘
//!                                 │                        │      │
//!                                 ▼                        ▼      ▼
//!                           Diagnostics            TypeDispatch  ParallelRangeExecutor
//! ```
//!
//! # Key Components
//!
//! - [`Filter`]: the trait every filter implements (`data_check`, `execute`)
//! - [`FilterRunner`]: lifecycle state, re-validation before execute, diagnostics
//! - [`FilterContext`]: per-invocation configuration and diagnostic sink
//! - [`prereq`]: input resolution and idempotent output creation
//! - [`dispatch`]: runtime type tag to monomorphized visitor
//! - [`ParallelRangeExecutor`]: disjoint range splitting on a rayon pool
//! - [`Pipeline`]: ordered runs with cancellation between filters
//!
//! # Error Codes
//!
//! Error codes are negative, warning codes positive and zero means success.
//! See [`common_error::codes`] for the full table.

pub mod context;
pub mod diagnostics;
pub mod dispatch;
pub mod filter;
pub mod metrics;
pub mod parallel;
pub mod pipeline;
pub mod prereq;

// Re-export commonly used types
pub use context::FilterContext;
pub use diagnostics::{Diagnostic, Severity};
pub use dispatch::{
    dispatch, dispatch_mut, dispatch_type, dispatch_type_name, ArrayVisitor, ArrayVisitorMut,
    TypeSet, TypeVisitor,
};
pub use filter::{Filter, FilterRunner, FilterState};
pub use metrics::FilterMetrics;
pub use parallel::ParallelRangeExecutor;
pub use pipeline::{CancellationHandle, Pipeline, PipelineReport};
pub use prereq::ArrayRequirement;
