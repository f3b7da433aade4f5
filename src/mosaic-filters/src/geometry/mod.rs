//! Geometry construction.

mod create_geometry;

pub use create_geometry::{ArrayHandling, CreateGeometry, GeometrySource};
