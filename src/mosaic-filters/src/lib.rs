//! Reference filters for the Mosaic engine.
//!
//! Every filter is a plain parameter struct implementing
//! [`Filter`](mosaic_engine::Filter). Parameters derive serde so pipelines
//! can be described in JSON through [`PipelineDefinition`].
//!
//! - [`structural`]: create containers, matrices and arrays; copy, rename, move
//!   and convert arrays
//! - [`processing`]: grayscale conversion and scaling, both parallel over
//!   tuple ranges
//! - [`geometry`]: geometry construction from existing arrays

pub mod definition;
pub mod geometry;
pub mod processing;
pub mod structural;

mod proptest_utils;

// Re-export commonly used types
pub use definition::{FilterDefinition, PipelineDefinition};
pub use geometry::{ArrayHandling, CreateGeometry, GeometrySource};
pub use processing::{ConversionMethod, ConvertColorToGrayScale, ScaleArray};
pub use structural::{
    ConvertArrayType, CopyArray, CreateAttributeMatrix, CreateDataArray, CreateDataContainer,
    MoveArray, RenameArray,
};
