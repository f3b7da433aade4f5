//! Typed array storage.
//!
//! - [`TypedBuffer`] owns the contiguous elements and the component shape.
//! - [`DataArray`] adds identity (a name) to a buffer.
//! - [`AnyArray`] is the type-erased form stored in attribute matrices.

mod any;
mod buffer;
mod data_array;

pub use any::AnyArray;
pub use buffer::{checked_product, component_count, TypedBuffer};
pub use data_array::DataArray;
