//! Primitive type system.

mod data_type;
mod primitive;
mod scalar;

pub use data_type::DataType;
pub use primitive::Primitive;
pub use scalar::Scalar;
