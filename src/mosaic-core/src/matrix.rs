//! Attribute matrices: named groups of arrays sharing a tuple count.

use serde::{Deserialize, Serialize};

use common_display::format_dims;
use common_error::{MosaicError, MosaicResult};

use crate::array::{checked_product, AnyArray, DataArray};
use crate::types::Primitive;

/// Domain category of an attribute matrix.
///
/// Element categories (`Vertex`, `Edge`, `Face`, `Cell`) are bound to the
/// element counts of the owning container's geometry; feature, ensemble and
/// generic matrices are free-standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeMatrixType {
    Vertex,
    Edge,
    Face,
    Cell,
    VertexFeature,
    EdgeFeature,
    FaceFeature,
    CellFeature,
    VertexEnsemble,
    EdgeEnsemble,
    FaceEnsemble,
    CellEnsemble,
    MetaData,
    Generic,
    Unknown,
}

/// Geometry element kinds that can bound a matrix's tuple count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Vertex,
    Edge,
    Face,
    Cell,
}

impl AttributeMatrixType {
    /// The geometry element kind this category is bound to, if any.
    pub const fn element_kind(self) -> Option<ElementKind> {
        match self {
            Self::Vertex => Some(ElementKind::Vertex),
            Self::Edge => Some(ElementKind::Edge),
            Self::Face => Some(ElementKind::Face),
            Self::Cell => Some(ElementKind::Cell),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeMatrixType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::Edge => "edge",
            Self::Face => "face",
            Self::Cell => "cell",
        };
        f.write_str(name)
    }
}

/// An ordered, name-keyed collection of arrays with a common tuple count.
///
/// Invariant: every contained array has exactly [`num_tuples`](Self::num_tuples)
/// tuples. Every mutating operation either preserves it or fails.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMatrix {
    name: String,
    category: AttributeMatrixType,
    tuple_dims: Vec<usize>,
    arrays: Vec<AnyArray>,
}

impl AttributeMatrix {
    /// Create an empty matrix. Empty `tuple_dims` means zero tuples.
    pub fn new(
        name: impl Into<String>,
        tuple_dims: impl Into<Vec<usize>>,
        category: AttributeMatrixType,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            tuple_dims: tuple_dims.into(),
            arrays: Vec::new(),
        }
    }

    /// Matrix name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Domain category.
    pub fn category(&self) -> AttributeMatrixType {
        self.category
    }

    /// Tuple dimensions, e.g. `[nx, ny, nz]`.
    pub fn tuple_dims(&self) -> &[usize] {
        &self.tuple_dims
    }

    /// Product of the tuple dimensions, saturating at `usize::MAX`.
    ///
    /// Matrices built from outside input are checked with
    /// [`tuple_count`](Self::tuple_count) first.
    pub fn num_tuples(&self) -> usize {
        Self::tuple_count(&self.tuple_dims).unwrap_or(usize::MAX)
    }

    /// Tuple count described by `tuple_dims`. Empty dims mean zero tuples.
    pub fn tuple_count(tuple_dims: &[usize]) -> MosaicResult<usize> {
        if tuple_dims.is_empty() {
            Ok(0)
        } else {
            checked_product(tuple_dims)
        }
    }

    /// Number of arrays.
    pub fn num_arrays(&self) -> usize {
        self.arrays.len()
    }

    /// Check if the matrix holds no arrays.
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Array names in insertion order.
    pub fn array_names(&self) -> Vec<&str> {
        self.arrays.iter().map(AnyArray::name).collect()
    }

    /// Iterate over arrays in insertion order.
    pub fn arrays(&self) -> impl Iterator<Item = &AnyArray> {
        self.arrays.iter()
    }

    /// Check if an array with this name exists.
    pub fn contains_array(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.arrays.iter().position(|a| a.name() == name)
    }

    /// Get an array by name.
    pub fn array(&self, name: &str) -> Option<&AnyArray> {
        self.arrays.iter().find(|a| a.name() == name)
    }

    /// Get an array by name, mutably.
    ///
    /// Changing the tuple count through this handle breaks the matrix
    /// invariant; use [`resize_tuples`](Self::resize_tuples) instead.
    pub fn array_mut(&mut self, name: &str) -> Option<&mut AnyArray> {
        self.arrays.iter_mut().find(|a| a.name() == name)
    }

    /// Get a typed array; `None` if missing or of another type.
    pub fn array_as<T: Primitive>(&self, name: &str) -> Option<&DataArray<T>> {
        self.array(name).and_then(AnyArray::downcast_ref::<T>)
    }

    /// Get a typed array mutably; `None` if missing or of another type.
    pub fn array_as_mut<T: Primitive>(&mut self, name: &str) -> Option<&mut DataArray<T>> {
        self.array_mut(name).and_then(AnyArray::downcast_mut::<T>)
    }

    fn check_tuples(&self, array: &AnyArray) -> MosaicResult<()> {
        if array.num_tuples() != self.num_tuples() {
            return Err(MosaicError::shape_mismatch(format!(
                "array '{}' has {} tuples but attribute matrix '{}' has {} tuples {}",
                array.name(),
                array.num_tuples(),
                self.name,
                self.num_tuples(),
                format_dims(&self.tuple_dims)
            )));
        }
        Ok(())
    }

    /// Insert by name, replacing any array of the same name.
    ///
    /// Returns the replaced array. Fails without modifying the matrix if the
    /// tuple count does not match.
    pub fn insert_or_assign(&mut self, array: impl Into<AnyArray>) -> MosaicResult<Option<AnyArray>> {
        let array = array.into();
        self.check_tuples(&array)?;
        match self.position(array.name()) {
            Some(idx) => Ok(Some(std::mem::replace(&mut self.arrays[idx], array))),
            None => {
                self.arrays.push(array);
                Ok(None)
            }
        }
    }

    /// Insert a new array, failing if the name is taken.
    pub fn add_array(&mut self, array: impl Into<AnyArray>) -> MosaicResult<()> {
        let array = array.into();
        if self.contains_array(array.name()) {
            return Err(MosaicError::name_collision(format!(
                "attribute matrix '{}' already contains an array named '{}'",
                self.name,
                array.name()
            )));
        }
        self.check_tuples(&array)?;
        self.arrays.push(array);
        Ok(())
    }

    /// Construct an array sized to this matrix and insert it, replacing any
    /// array of the same name.
    pub fn create_and_add_array<T: Primitive>(
        &mut self,
        name: &str,
        init_value: T,
        component_dims: &[usize],
    ) -> MosaicResult<&mut DataArray<T>> {
        let array = DataArray::with_value(name, self.num_tuples(), component_dims, init_value)?;
        self.insert_or_assign(array)?;
        self.array_as_mut::<T>(name)
            .ok_or_else(|| MosaicError::internal(format!("array '{name}' vanished after insert")))
    }

    /// Remove an array, transferring ownership to the caller.
    pub fn remove_array(&mut self, name: &str) -> Option<AnyArray> {
        self.position(name).map(|idx| self.arrays.remove(idx))
    }

    /// Rename an array in place.
    pub fn rename_array(&mut self, old_name: &str, new_name: &str) -> MosaicResult<()> {
        if old_name == new_name {
            return if self.contains_array(old_name) {
                Ok(())
            } else {
                Err(self.missing(old_name))
            };
        }
        if self.contains_array(new_name) {
            return Err(MosaicError::name_collision(format!(
                "attribute matrix '{}' already contains an array named '{new_name}'",
                self.name
            )));
        }
        let missing = self.missing(old_name);
        let array = self.array_mut(old_name).ok_or(missing)?;
        array.set_name(new_name);
        Ok(())
    }

    fn missing(&self, name: &str) -> MosaicError {
        MosaicError::path_not_found(format!(
            "array '{name}' does not exist in attribute matrix '{}'",
            self.name
        ))
    }

    /// Change the tuple dimensions, resizing every array in lock-step.
    ///
    /// Nothing changes if the new size of any array would overflow.
    pub fn resize_tuples(&mut self, tuple_dims: impl Into<Vec<usize>>) -> MosaicResult<()> {
        let tuple_dims = tuple_dims.into();
        let num_tuples = Self::tuple_count(&tuple_dims)?;
        for array in &self.arrays {
            checked_product(&[num_tuples, array.num_components()])?;
        }
        for array in &mut self.arrays {
            array.resize_tuples(num_tuples)?;
        }
        self.tuple_dims = tuple_dims;
        Ok(())
    }

    /// Verify the tuple-count invariant for every array.
    pub fn validate(&self) -> MosaicResult<()> {
        self.arrays.iter().try_for_each(|a| self.check_tuples(a))
    }

    /// Duplicate the matrix and all of its arrays under a new name.
    pub fn deep_copy(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn cell_matrix() -> AttributeMatrix {
        AttributeMatrix::new("CellData", vec![4, 4, 4], AttributeMatrixType::Cell)
    }

    #[test]
    fn test_num_tuples() {
        assert_eq!(cell_matrix().num_tuples(), 64);
        let empty = AttributeMatrix::new("E", Vec::new(), AttributeMatrixType::Generic);
        assert_eq!(empty.num_tuples(), 0);
    }

    #[test]
    fn test_insert_rejects_tuple_mismatch() {
        let mut matrix = cell_matrix();
        let wrong = DataArray::<f32>::create("Confidence", 63, &[1]).unwrap();

        let err = matrix.insert_or_assign(wrong).unwrap_err();
        assert!(matches!(err, MosaicError::ShapeMismatch(_)));
        assert!(err.to_string().contains("63"));
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_insert_or_assign_replaces() {
        let mut matrix = cell_matrix();
        matrix
            .insert_or_assign(DataArray::<i32>::create("Phases", 64, &[1]).unwrap())
            .unwrap();
        let replaced = matrix
            .insert_or_assign(DataArray::<f64>::create("Phases", 64, &[3]).unwrap())
            .unwrap()
            .unwrap();

        assert_eq!(replaced.data_type(), DataType::Int32);
        assert_eq!(matrix.num_arrays(), 1);
        assert!(matrix.array_as::<i32>("Phases").is_none());
        assert_eq!(matrix.array_as::<f64>("Phases").unwrap().num_components(), 3);
    }

    #[test]
    fn test_add_array_rejects_duplicate() {
        let mut matrix = cell_matrix();
        matrix.create_and_add_array::<u8>("RGB", 0, &[3]).unwrap();
        let err = matrix
            .add_array(DataArray::<u8>::create("RGB", 64, &[3]).unwrap())
            .unwrap_err();
        assert!(matches!(err, MosaicError::NameCollision(_)));
    }

    #[test]
    fn test_create_and_add_array() {
        let mut matrix = cell_matrix();
        let array = matrix.create_and_add_array::<f32>("Euler", 1.5, &[3]).unwrap();
        assert_eq!(array.num_tuples(), 64);
        assert!(array.as_slice().iter().all(|&v| v == 1.5));
        assert_eq!(matrix.array_names(), vec!["Euler"]);
    }

    #[test]
    fn test_remove_transfers_ownership() {
        let mut matrix = cell_matrix();
        matrix.create_and_add_array::<i64>("Ids", 7, &[1]).unwrap();
        let removed = matrix.remove_array("Ids").unwrap();
        assert_eq!(removed.downcast_ref::<i64>().unwrap().value(0), 7);
        assert!(!matrix.contains_array("Ids"));
        assert!(matrix.remove_array("Ids").is_none());
    }

    #[test]
    fn test_rename_array() {
        let mut matrix = cell_matrix();
        matrix.create_and_add_array::<u8>("A", 0, &[1]).unwrap();
        matrix.create_and_add_array::<u8>("B", 0, &[1]).unwrap();

        assert!(matrix.rename_array("A", "B").is_err());
        assert!(matrix.rename_array("Missing", "C").is_err());
        matrix.rename_array("A", "C").unwrap();
        assert_eq!(matrix.array_names(), vec!["C", "B"]);
    }

    #[test]
    fn test_resize_lock_step() {
        let mut matrix = cell_matrix();
        matrix.create_and_add_array::<u8>("RGB", 9, &[3]).unwrap();
        matrix.create_and_add_array::<bool>("Mask", true, &[1]).unwrap();

        matrix.resize_tuples(vec![2, 2, 2]).unwrap();
        assert_eq!(matrix.num_tuples(), 8);
        assert!(matrix.arrays().all(|a| a.num_tuples() == 8));
        assert!(matrix.validate().is_ok());
    }

    #[test]
    fn test_resize_overflow_leaves_matrix_intact() {
        let mut matrix = cell_matrix();
        matrix.create_and_add_array::<u8>("RGB", 9, &[3]).unwrap();
        assert!(matrix.resize_tuples(vec![u64::MAX as usize, 2]).is_err());
        assert!(matrix.resize_tuples(vec![u64::MAX as usize / 2]).is_err());
        assert_eq!(matrix.tuple_dims(), &[4, 4, 4]);
        assert!(matrix.validate().is_ok());
    }
}
