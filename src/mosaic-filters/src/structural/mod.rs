//! Structural filters: containers, matrices and arrays.

mod convert_array_type;
mod copy_array;
mod create_attribute_matrix;
mod create_data_array;
mod create_data_container;
mod move_array;
mod rename_array;

pub use convert_array_type::ConvertArrayType;
pub use copy_array::CopyArray;
pub use create_attribute_matrix::CreateAttributeMatrix;
pub use create_data_array::CreateDataArray;
pub use create_data_container::CreateDataContainer;
pub use move_array::MoveArray;
pub use rename_array::RenameArray;
