//! Value-transforming filters.

mod grayscale;
mod scale_array;

pub use grayscale::{ConversionMethod, ConvertColorToGrayScale};
pub use scale_array::ScaleArray;
