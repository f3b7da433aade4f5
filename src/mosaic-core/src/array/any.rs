//! Type-erased arrays.

use common_display::format_dims;
use common_error::{MosaicError, MosaicResult};

use crate::array::{checked_product, component_count, DataArray, TypedBuffer};
use crate::types::{DataType, Primitive};

/// An array of any supported primitive type.
///
/// This is the form in which arrays are owned by attribute matrices and
/// geometries. Use [`AnyArray::downcast_ref`] (or the type dispatcher in
/// the engine) to reach the concrete [`DataArray<T>`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnyArray {
    Int8(DataArray<i8>),
    UInt8(DataArray<u8>),
    Int16(DataArray<i16>),
    UInt16(DataArray<u16>),
    Int32(DataArray<i32>),
    UInt32(DataArray<u32>),
    Int64(DataArray<i64>),
    UInt64(DataArray<u64>),
    Float32(DataArray<f32>),
    Float64(DataArray<f64>),
    Bool(DataArray<bool>),
}

/// Evaluate `$body` with `$a` bound to the typed array inside any variant.
#[macro_export]
macro_rules! match_any_array {
    ($array:expr, $a:ident => $body:expr) => {
        match $array {
            $crate::array::AnyArray::Int8($a) => $body,
            $crate::array::AnyArray::UInt8($a) => $body,
            $crate::array::AnyArray::Int16($a) => $body,
            $crate::array::AnyArray::UInt16($a) => $body,
            $crate::array::AnyArray::Int32($a) => $body,
            $crate::array::AnyArray::UInt32($a) => $body,
            $crate::array::AnyArray::Int64($a) => $body,
            $crate::array::AnyArray::UInt64($a) => $body,
            $crate::array::AnyArray::Float32($a) => $body,
            $crate::array::AnyArray::Float64($a) => $body,
            $crate::array::AnyArray::Bool($a) => $body,
        }
    };
}

/// Evaluate `$body` with the type alias `$t` bound to the element type for `$data_type`.
#[macro_export]
macro_rules! with_primitive_type {
    ($data_type:expr, $t:ident => $body:expr) => {
        match $data_type {
            $crate::types::DataType::Int8 => {
                type $t = i8;
                $body
            }
            $crate::types::DataType::UInt8 => {
                type $t = u8;
                $body
            }
            $crate::types::DataType::Int16 => {
                type $t = i16;
                $body
            }
            $crate::types::DataType::UInt16 => {
                type $t = u16;
                $body
            }
            $crate::types::DataType::Int32 => {
                type $t = i32;
                $body
            }
            $crate::types::DataType::UInt32 => {
                type $t = u32;
                $body
            }
            $crate::types::DataType::Int64 => {
                type $t = i64;
                $body
            }
            $crate::types::DataType::UInt64 => {
                type $t = u64;
                $body
            }
            $crate::types::DataType::Float32 => {
                type $t = f32;
                $body
            }
            $crate::types::DataType::Float64 => {
                type $t = f64;
                $body
            }
            $crate::types::DataType::Bool => {
                type $t = bool;
                $body
            }
        }
    };
}

impl AnyArray {
    /// Allocate a zero-filled array of a runtime-selected type.
    pub fn create(
        data_type: DataType,
        name: impl Into<String>,
        num_tuples: usize,
        component_dims: &[usize],
    ) -> MosaicResult<Self> {
        let name = name.into();
        with_primitive_type!(data_type, T => {
            Ok(DataArray::<T>::create(name, num_tuples, component_dims)?.into())
        })
    }

    /// Array name.
    pub fn name(&self) -> &str {
        match_any_array!(self, a => a.name())
    }

    /// Rename the array.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match_any_array!(self, a => a.set_name(name))
    }

    /// Runtime type tag.
    pub fn data_type(&self) -> DataType {
        match_any_array!(self, a => a.data_type())
    }

    /// Type name as accepted by [`DataType::from_name`].
    pub fn type_name(&self) -> &'static str {
        self.data_type().name()
    }

    /// Number of tuples.
    pub fn num_tuples(&self) -> usize {
        match_any_array!(self, a => a.num_tuples())
    }

    /// Number of components per tuple.
    pub fn num_components(&self) -> usize {
        match_any_array!(self, a => a.num_components())
    }

    /// Component dimensions.
    pub fn component_dims(&self) -> &[usize] {
        match_any_array!(self, a => a.component_dims())
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        match_any_array!(self, a => a.len())
    }

    /// Check if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the element storage in bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.len() * self.data_type().size_of()
    }

    /// Change the tuple count, preserving the overlapping prefix.
    pub fn resize_tuples(&mut self, num_tuples: usize) -> MosaicResult<()> {
        match_any_array!(self, a => a.resize_tuples(num_tuples))
    }

    /// Duplicate contents and shape under a new name.
    pub fn deep_copy(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        match_any_array!(self, a => Self::from(a.deep_copy(name)))
    }

    /// Element at flat offset `index` converted to `f64`.
    pub fn value_as_f64(&self, index: usize) -> f64 {
        match_any_array!(self, a => a.value(index).to_f64())
    }

    /// Same type tag and component dimensions.
    pub fn is_compatible_with(&self, data_type: DataType, component_dims: &[usize]) -> bool {
        self.data_type() == data_type && self.component_dims() == component_dims
    }

    /// Borrow as `DataArray<T>`; `None` if the tag is not `T`.
    pub fn downcast_ref<T: Primitive>(&self) -> Option<&DataArray<T>> {
        T::as_typed(self)
    }

    /// Mutably borrow as `DataArray<T>`; `None` if the tag is not `T`.
    pub fn downcast_mut<T: Primitive>(&mut self) -> Option<&mut DataArray<T>> {
        T::as_typed_mut(self)
    }

    /// Unwrap into `DataArray<T>`, handing `self` back on a tag mismatch.
    pub fn into_typed<T: Primitive>(self) -> Result<DataArray<T>, Self> {
        T::into_typed(self)
    }

    /// Short human-readable shape description, e.g. `uint8 x[3] (64 tuples)`.
    pub fn describe(&self) -> String {
        format!(
            "{} x{} ({} tuples)",
            self.data_type(),
            format_dims(self.component_dims()),
            self.num_tuples()
        )
    }

    /// Raw little-endian element bytes, for bulk export.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_in_bytes());
        match_any_array!(self, a => {
            for &v in a.as_slice() {
                v.extend_le_bytes(&mut out);
            }
        });
        out
    }

    /// Rebuild an array from raw little-endian bytes, for bulk import.
    pub fn from_le_bytes(
        data_type: DataType,
        name: impl Into<String>,
        num_tuples: usize,
        component_dims: &[usize],
        bytes: &[u8],
    ) -> MosaicResult<Self> {
        let width = data_type.size_of();
        let expected = checked_product(&[num_tuples, component_count(component_dims)?, width])?;
        if bytes.len() != expected {
            return Err(MosaicError::shape_mismatch(format!(
                "expected {expected} bytes for {num_tuples} tuples of {data_type} x{}, got {}",
                format_dims(component_dims),
                bytes.len()
            )));
        }
        let name = name.into();
        with_primitive_type!(data_type, T => {
            let data: Vec<T> = bytes.chunks_exact(width).map(T::from_le_slice).collect();
            Ok(DataArray::from_buffer(name, TypedBuffer::from_vec(data, component_dims)?).into())
        })
    }
}

impl<T: Primitive> From<DataArray<T>> for AnyArray {
    fn from(array: DataArray<T>) -> Self {
        T::into_any(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_every_type() {
        for ty in DataType::ALL {
            let array = AnyArray::create(ty, "A", 8, &[2]).unwrap();
            assert_eq!(array.data_type(), ty);
            assert_eq!(array.len(), 16);
            assert_eq!(array.size_in_bytes(), 16 * ty.size_of());
        }
    }

    #[test]
    fn test_downcast_mismatch_is_none() {
        let mut array: AnyArray = DataArray::<u8>::create("RGB", 4, &[3])
            .unwrap()
            .into();
        assert!(array.downcast_ref::<u8>().is_some());
        assert!(array.downcast_ref::<i8>().is_none());
        assert!(array.downcast_mut::<f32>().is_none());

        let back = array.into_typed::<u16>().unwrap_err();
        assert_eq!(back.name(), "RGB");
        assert!(back.into_typed::<u8>().is_ok());
    }

    #[test]
    fn test_int32_bytes_roundtrip() {
        let pattern: Vec<i32> = (0..100).map(|i| i * i - 2500).collect();
        let array: AnyArray = DataArray::from_vec("Pattern", pattern.clone(), &[1])
            .unwrap()
            .into();

        let bytes = array.to_le_bytes();
        assert_eq!(bytes.len(), 400);

        let restored = AnyArray::from_le_bytes(DataType::Int32, "Pattern", 100, &[1], &bytes).unwrap();
        assert_eq!(restored, array);
        assert_eq!(restored.downcast_ref::<i32>().unwrap().as_slice(), pattern.as_slice());
    }

    #[test]
    fn test_from_le_bytes_rejects_wrong_length() {
        let err = AnyArray::from_le_bytes(DataType::Float64, "X", 2, &[1], &[0u8; 15]).unwrap_err();
        assert!(matches!(err, MosaicError::ShapeMismatch(_)));
    }

    #[test]
    fn test_from_le_bytes_rejects_overflowing_shape() {
        let err = AnyArray::from_le_bytes(DataType::Float64, "X", u64::MAX as usize, &[1], &[]).unwrap_err();
        assert!(matches!(err, MosaicError::InvalidParameter(_)));
    }

    #[test]
    fn test_deep_copy_keeps_type_and_shape() {
        let array: AnyArray = DataArray::from_vec("Quats", vec![1.0f32; 8], &[4]).unwrap().into();
        let copy = array.deep_copy("Quats2");
        assert_eq!(copy.name(), "Quats2");
        assert!(copy.is_compatible_with(DataType::Float32, &[4]));
        assert_eq!(copy.to_le_bytes(), array.to_le_bytes());
    }

    #[test]
    fn test_describe() {
        let array = AnyArray::create(DataType::UInt8, "RGB", 64, &[3]).unwrap();
        assert_eq!(array.describe(), "uint8 x[3] (64 tuples)");
    }
}
