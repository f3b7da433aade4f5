//! Contiguous element storage.

use common_display::format_dims;
use common_error::{MosaicError, MosaicResult};

use crate::types::Primitive;

/// Product of `dims`, failing if it does not fit in `usize`.
pub fn checked_product(dims: &[usize]) -> MosaicResult<usize> {
    dims.iter()
        .try_fold(1usize, |acc, d| acc.checked_mul(*d))
        .ok_or_else(|| MosaicError::invalid_parameter(format!("dimensions {} overflow", format_dims(dims))))
}

/// Number of components described by `dims`, rejecting empty or zero extents.
pub fn component_count(dims: &[usize]) -> MosaicResult<usize> {
    if dims.is_empty() || dims.contains(&0) {
        return Err(MosaicError::invalid_parameter(format!(
            "component dimensions {} must be non-empty and strictly positive",
            format_dims(dims)
        )));
    }
    checked_product(dims)
}

fn element_len(num_tuples: usize, num_components: usize) -> MosaicResult<usize> {
    num_tuples.checked_mul(num_components).ok_or_else(|| {
        MosaicError::invalid_parameter(format!(
            "{num_tuples} tuples x {num_components} components overflows"
        ))
    })
}

/// Owned, resizable storage of `num_tuples * num_components` elements.
///
/// Element `c` of tuple `t` lives at offset `t * num_components + c`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedBuffer<T: Primitive> {
    data: Vec<T>,
    num_tuples: usize,
    component_dims: Vec<usize>,
    num_components: usize,
}

impl<T: Primitive> TypedBuffer<T> {
    /// Allocate a zero-filled buffer.
    pub fn new(num_tuples: usize, component_dims: &[usize]) -> MosaicResult<Self> {
        Self::filled(num_tuples, component_dims, T::default())
    }

    /// Allocate a buffer with every element set to `value`.
    pub fn filled(num_tuples: usize, component_dims: &[usize], value: T) -> MosaicResult<Self> {
        let num_components = component_count(component_dims)?;
        let len = element_len(num_tuples, num_components)?;
        Ok(Self {
            data: vec![value; len],
            num_tuples,
            component_dims: component_dims.to_vec(),
            num_components,
        })
    }

    /// Take ownership of existing elements. The length must be a whole number of tuples.
    pub fn from_vec(data: Vec<T>, component_dims: &[usize]) -> MosaicResult<Self> {
        let num_components = component_count(component_dims)?;
        if data.len() % num_components != 0 {
            return Err(MosaicError::shape_mismatch(format!(
                "{} elements is not a multiple of {} components",
                data.len(),
                num_components
            )));
        }
        Ok(Self {
            num_tuples: data.len() / num_components,
            data,
            component_dims: component_dims.to_vec(),
            num_components,
        })
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of tuples.
    pub fn num_tuples(&self) -> usize {
        self.num_tuples
    }

    /// Number of components per tuple.
    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Component dimensions, e.g. `[3]` for a vector.
    pub fn component_dims(&self) -> &[usize] {
        &self.component_dims
    }

    /// All elements.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// All elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Elements from `offset` to the end.
    ///
    /// # Panics
    /// Panics if `offset > len()`.
    pub fn pointer(&self, offset: usize) -> &[T] {
        &self.data[offset..]
    }

    /// Mutable elements from `offset` to the end.
    ///
    /// # Panics
    /// Panics if `offset > len()`.
    pub fn pointer_mut(&mut self, offset: usize) -> &mut [T] {
        &mut self.data[offset..]
    }

    /// Element at flat offset `index`.
    pub fn value(&self, index: usize) -> T {
        self.data[index]
    }

    /// Set the element at flat offset `index`.
    pub fn set_value(&mut self, index: usize, value: T) {
        self.data[index] = value;
    }

    /// Components of tuple `tuple`.
    pub fn tuple(&self, tuple: usize) -> &[T] {
        let start = tuple * self.num_components;
        &self.data[start..start + self.num_components]
    }

    /// Mutable components of tuple `tuple`.
    pub fn tuple_mut(&mut self, tuple: usize) -> &mut [T] {
        let start = tuple * self.num_components;
        &mut self.data[start..start + self.num_components]
    }

    /// Component `component` of tuple `tuple`.
    pub fn component(&self, tuple: usize, component: usize) -> T {
        debug_assert!(component < self.num_components);
        self.data[tuple * self.num_components + component]
    }

    /// Set component `component` of tuple `tuple`.
    pub fn set_component(&mut self, tuple: usize, component: usize, value: T) {
        debug_assert!(component < self.num_components);
        self.data[tuple * self.num_components + component] = value;
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Change the tuple count, preserving the overlapping prefix.
    ///
    /// New elements are zero-filled. Fails without touching the buffer if
    /// the new size overflows.
    pub fn resize_tuples(&mut self, num_tuples: usize) -> MosaicResult<()> {
        let len = element_len(num_tuples, self.num_components)?;
        self.data.resize(len, T::default());
        self.num_tuples = num_tuples;
        Ok(())
    }

    /// Consume the buffer, returning the elements.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Minimum and maximum element, `None` for an empty buffer.
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        }))
    }
}
