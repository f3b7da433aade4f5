//! Core data model for the Mosaic pipeline engine.
//!
//! This crate provides the typed data-container model:
//! - `DataType`, `Primitive` and `Scalar` for the primitive type system
//! - `TypedBuffer`, `DataArray` and `AnyArray` for array storage
//! - `AttributeMatrix` for groups of arrays sharing a tuple count
//! - `Geometry` for the eight topology kinds
//! - `DataContainer` and `DataContainerArray` for the registry
//! - `DataArrayPath` for addressing data in the registry

pub mod array;
pub mod container;
pub mod geometry;
pub mod matrix;
pub mod path;
pub mod registry;
pub mod structure;
pub mod testing;
pub mod types;

mod proptest_utils;

// Re-export commonly used types
pub use array::{AnyArray, DataArray, TypedBuffer};
pub use container::DataContainer;
pub use geometry::{Geometry, GeometryIssue, GeometryKind, IssueSeverity};
pub use matrix::{AttributeMatrix, AttributeMatrixType, ElementKind};
pub use path::DataArrayPath;
pub use registry::DataContainerArray;
pub use structure::RegistryStructure;
pub use types::{DataType, Primitive, Scalar};
