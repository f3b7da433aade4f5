//! Named, typed arrays.

use std::ops::{Deref, DerefMut};

use common_error::MosaicResult;

use crate::array::TypedBuffer;
use crate::types::{DataType, Primitive};

/// A [`TypedBuffer`] with an identity.
///
/// Buffer accessors are reachable through `Deref`, so
/// `array.tuple(3)` and `array.as_mut_slice()` work directly.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray<T: Primitive> {
    name: String,
    buffer: TypedBuffer<T>,
}

impl<T: Primitive> DataArray<T> {
    /// Allocate a new zero-filled array.
    pub fn create(
        name: impl Into<String>,
        num_tuples: usize,
        component_dims: &[usize],
    ) -> MosaicResult<Self> {
        Ok(Self {
            name: name.into(),
            buffer: TypedBuffer::new(num_tuples, component_dims)?,
        })
    }

    /// Allocate a new array with every element set to `value`.
    pub fn with_value(
        name: impl Into<String>,
        num_tuples: usize,
        component_dims: &[usize],
        value: T,
    ) -> MosaicResult<Self> {
        Ok(Self {
            name: name.into(),
            buffer: TypedBuffer::filled(num_tuples, component_dims, value)?,
        })
    }

    /// Wrap existing elements.
    pub fn from_vec(
        name: impl Into<String>,
        data: Vec<T>,
        component_dims: &[usize],
    ) -> MosaicResult<Self> {
        Ok(Self {
            name: name.into(),
            buffer: TypedBuffer::from_vec(data, component_dims)?,
        })
    }

    /// Wrap an existing buffer.
    pub fn from_buffer(name: impl Into<String>, buffer: TypedBuffer<T>) -> Self {
        Self {
            name: name.into(),
            buffer,
        }
    }

    /// Array name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the array.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Runtime type tag.
    pub fn data_type(&self) -> DataType {
        T::DATA_TYPE
    }

    /// Underlying buffer.
    pub fn buffer(&self) -> &TypedBuffer<T> {
        &self.buffer
    }

    /// Underlying buffer, mutably.
    pub fn buffer_mut(&mut self) -> &mut TypedBuffer<T> {
        &mut self.buffer
    }

    /// Duplicate contents and shape under a new name.
    pub fn deep_copy(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffer: self.buffer.clone(),
        }
    }

    /// Consume the array, returning name and buffer.
    pub fn into_parts(self) -> (String, TypedBuffer<T>) {
        (self.name, self.buffer)
    }
}

impl<T: Primitive> Deref for DataArray<T> {
    type Target = TypedBuffer<T>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl<T: Primitive> DerefMut for DataArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_fill() {
        let mut array = DataArray::<i32>::create("Phases", 100, &[1]).unwrap();
        assert_eq!(array.name(), "Phases");
        assert_eq!(array.data_type(), DataType::Int32);
        assert!(array.as_slice().iter().all(|&v| v == 0));

        for (i, v) in array.as_mut_slice().iter_mut().enumerate() {
            *v = i as i32 * 7 - 50;
        }
        assert_eq!(array.value(10), 20);
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let original = DataArray::from_vec("Euler", vec![0.1f32, 0.2, 0.3], &[3]).unwrap();
        let mut copy = original.deep_copy("EulerCopy");

        assert_eq!(copy.name(), "EulerCopy");
        assert_eq!(copy.as_slice(), original.as_slice());
        assert_eq!(copy.component_dims(), original.component_dims());

        copy.set_value(0, 9.0);
        assert_eq!(original.value(0), 0.1);
    }

    #[test]
    fn test_with_value() {
        let array = DataArray::with_value("Mask", 4, &[1], true).unwrap();
        assert!(array.as_slice().iter().all(|&b| b));
        assert_eq!(array.data_type(), DataType::Bool);
    }
}
