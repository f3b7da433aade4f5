//! The data container registry.
//!
//! [`DataContainerArray`] owns every container of a pipeline. All data is
//! reached by resolving a [`DataArrayPath`]; a path that does not resolve is
//! reported as an error and never panics.

use log::debug;

use common_error::{MosaicError, MosaicResult};

use crate::array::{AnyArray, DataArray};
use crate::container::DataContainer;
use crate::geometry::Geometry;
use crate::matrix::AttributeMatrix;
use crate::path::DataArrayPath;
use crate::structure::{ContainerStructure, RegistryStructure};
use crate::types::Primitive;

/// Ordered, name-keyed collection of data containers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataContainerArray {
    containers: Vec<DataContainer>,
}

impl DataContainerArray {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Check if the registry holds no containers.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Container names in insertion order.
    pub fn container_names(&self) -> Vec<&str> {
        self.containers.iter().map(DataContainer::name).collect()
    }

    /// Iterate containers in insertion order.
    pub fn containers(&self) -> impl Iterator<Item = &DataContainer> {
        self.containers.iter()
    }

    /// Check if a container with `name` exists.
    pub fn contains_container(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.containers.iter().position(|c| c.name() == name)
    }

    /// Look up a container by name.
    pub fn container(&self, name: &str) -> Option<&DataContainer> {
        self.containers.iter().find(|c| c.name() == name)
    }

    /// Look up a container by name, mutably.
    pub fn container_mut(&mut self, name: &str) -> Option<&mut DataContainer> {
        self.containers.iter_mut().find(|c| c.name() == name)
    }

    /// Add a container, failing if the name is taken.
    pub fn add_container(&mut self, container: DataContainer) -> MosaicResult<()> {
        if self.contains_container(container.name()) {
            return Err(MosaicError::name_collision(format!(
                "a data container named '{}' already exists",
                container.name()
            )));
        }
        container.validate()?;
        debug!("Adding data container '{}'", container.name());
        self.containers.push(container);
        Ok(())
    }

    /// Remove a container. Its geometry, matrices and arrays go with it.
    pub fn remove_container(&mut self, name: &str) -> Option<DataContainer> {
        let idx = self.position(name)?;
        debug!("Removing data container '{name}'");
        Some(self.containers.remove(idx))
    }

    /// Rename a container in place.
    pub fn rename_container(&mut self, old_name: &str, new_name: &str) -> MosaicResult<()> {
        if old_name != new_name && self.contains_container(new_name) {
            return Err(MosaicError::name_collision(format!(
                "a data container named '{new_name}' already exists"
            )));
        }
        let container = self.container_mut(old_name).ok_or_else(|| {
            MosaicError::path_not_found(format!("data container '{old_name}' does not exist"))
        })?;
        container.set_name(new_name);
        Ok(())
    }

    // =========================================================================
    // Path resolution
    // =========================================================================

    /// Resolve the container part of `path`.
    pub fn resolve_container(&self, path: &DataArrayPath) -> MosaicResult<&DataContainer> {
        path.require_container()?;
        self.container(&path.container)
            .ok_or_else(|| container_missing(path))
    }

    /// Resolve the container part of `path`, mutably.
    pub fn resolve_container_mut(
        &mut self,
        path: &DataArrayPath,
    ) -> MosaicResult<&mut DataContainer> {
        path.require_container()?;
        let missing = container_missing(path);
        self.container_mut(&path.container).ok_or(missing)
    }

    /// Resolve the geometry of the container named by `path`.
    pub fn resolve_geometry(&self, path: &DataArrayPath) -> MosaicResult<&Geometry> {
        self.resolve_container(path)?.geometry().ok_or_else(|| {
            MosaicError::geometry_missing(format!(
                "data container '{}' has no geometry",
                path.container
            ))
        })
    }

    /// Resolve the matrix part of `path`.
    pub fn resolve_matrix(&self, path: &DataArrayPath) -> MosaicResult<&AttributeMatrix> {
        path.require_matrix()?;
        self.resolve_container(path)?
            .matrix(&path.matrix)
            .ok_or_else(|| matrix_missing(path))
    }

    /// Resolve the matrix part of `path`, mutably.
    pub fn resolve_matrix_mut(&mut self, path: &DataArrayPath) -> MosaicResult<&mut AttributeMatrix> {
        path.require_matrix()?;
        let missing = matrix_missing(path);
        self.resolve_container_mut(path)?
            .matrix_mut(&path.matrix)
            .ok_or(missing)
    }

    /// Resolve `path` to an array.
    pub fn resolve_array(&self, path: &DataArrayPath) -> MosaicResult<&AnyArray> {
        path.require_array()?;
        self.resolve_matrix(path)?
            .array(&path.array)
            .ok_or_else(|| array_missing(path))
    }

    /// Resolve `path` to an array, mutably.
    pub fn resolve_array_mut(&mut self, path: &DataArrayPath) -> MosaicResult<&mut AnyArray> {
        path.require_array()?;
        let missing = array_missing(path);
        self.resolve_matrix_mut(path)?
            .array_mut(&path.array)
            .ok_or(missing)
    }

    /// Resolve `path` to an array of element type `T`.
    pub fn resolve_typed<T: Primitive>(&self, path: &DataArrayPath) -> MosaicResult<&DataArray<T>> {
        let array = self.resolve_array(path)?;
        let found = array.data_type();
        array
            .downcast_ref::<T>()
            .ok_or_else(|| type_mismatch::<T>(path, found))
    }

    /// Resolve `path` to an array of element type `T`, mutably.
    pub fn resolve_typed_mut<T: Primitive>(
        &mut self,
        path: &DataArrayPath,
    ) -> MosaicResult<&mut DataArray<T>> {
        let array = self.resolve_array_mut(path)?;
        let found = array.data_type();
        array
            .downcast_mut::<T>()
            .ok_or_else(|| type_mismatch::<T>(path, found))
    }

    /// Check whether `path` resolves as far as it is specified.
    pub fn contains_path(&self, path: &DataArrayPath) -> bool {
        if path.is_array_path() {
            self.resolve_array(path).is_ok()
        } else if path.has_matrix() {
            self.resolve_matrix(path).is_ok()
        } else {
            self.resolve_container(path).is_ok()
        }
    }

    /// Remove the array at `path`, transferring ownership to the caller.
    pub fn take_array(&mut self, path: &DataArrayPath) -> MosaicResult<AnyArray> {
        path.require_array()?;
        let missing = array_missing(path);
        self.resolve_matrix_mut(path)?
            .remove_array(&path.array)
            .ok_or(missing)
    }

    /// Insert `array` into the matrix named by `path`, replacing any array of
    /// the same name. The array part of `path` is ignored.
    pub fn insert_array(
        &mut self,
        path: &DataArrayPath,
        array: impl Into<AnyArray>,
    ) -> MosaicResult<Option<AnyArray>> {
        self.resolve_matrix_mut(path)?.insert_or_assign(array)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Verify every container's invariants.
    pub fn validate(&self) -> MosaicResult<()> {
        self.containers.iter().try_for_each(DataContainer::validate)
    }

    /// Enumerate the layout of every container, matrix and array.
    pub fn structure(&self) -> RegistryStructure {
        RegistryStructure {
            containers: self.containers.iter().map(ContainerStructure::from).collect(),
        }
    }

    /// Render the layout as an indented tree.
    pub fn structure_tree(&self) -> String {
        self.structure().outline().to_string()
    }

    /// Paths of every array in the registry, in storage order.
    pub fn array_paths(&self) -> Vec<DataArrayPath> {
        self.containers
            .iter()
            .flat_map(|c| {
                c.matrices().flat_map(move |m| {
                    m.array_names()
                        .into_iter()
                        .map(move |a| DataArrayPath::new(c.name(), m.name(), a))
                })
            })
            .collect()
    }
}

fn container_missing(path: &DataArrayPath) -> MosaicError {
    MosaicError::path_not_found(format!(
        "data container '{}' does not exist (path '{path}')",
        path.container
    ))
}

fn matrix_missing(path: &DataArrayPath) -> MosaicError {
    MosaicError::path_not_found(format!(
        "attribute matrix '{}' does not exist in data container '{}' (path '{path}')",
        path.matrix, path.container
    ))
}

fn array_missing(path: &DataArrayPath) -> MosaicError {
    MosaicError::path_not_found(format!(
        "data array '{}' does not exist in attribute matrix '{}' (path '{path}')",
        path.array, path.matrix
    ))
}

fn type_mismatch<T: Primitive>(path: &DataArrayPath, found: crate::types::DataType) -> MosaicError {
    MosaicError::type_mismatch(format!(
        "data array '{path}' is {found}, expected {}",
        T::DATA_TYPE
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ImageGeometry;
    use crate::matrix::AttributeMatrixType;
    use common_error::codes;

    fn registry() -> DataContainerArray {
        let mut dc =
            DataContainer::with_geometry("Image", Geometry::Image(ImageGeometry::new([2, 2, 1])));
        let mut cell = AttributeMatrix::new("CellData", vec![2, 2, 1], AttributeMatrixType::Cell);
        cell.create_and_add_array::<u8>("RGB", 7, &[3]).unwrap();
        dc.add_matrix(cell).unwrap();
        let mut dca = DataContainerArray::new();
        dca.add_container(dc).unwrap();
        dca
    }

    #[test]
    fn test_resolution_errors_are_reported() {
        let dca = registry();
        let cases = [
            ("Missing|CellData|RGB", codes::PATH_NOT_FOUND),
            ("Image|Missing|RGB", codes::PATH_NOT_FOUND),
            ("Image|CellData|Missing", codes::PATH_NOT_FOUND),
            ("Image|CellData|", codes::PATH_EMPTY),
            ("", codes::PATH_EMPTY),
        ];
        for (text, code) in cases {
            let path: DataArrayPath = text.parse().unwrap();
            assert_eq!(dca.resolve_array(&path).unwrap_err().code(), code, "{text}");
        }

        let mut dca = registry();
        dca.add_container(DataContainer::new("Bare")).unwrap();
        let bare = DataArrayPath::container_only("Bare");
        assert_eq!(dca.resolve_geometry(&bare).unwrap_err().code(), codes::GEOMETRY_MISSING);
        assert!(dca.resolve_geometry(&DataArrayPath::container_only("Image")).is_ok());
    }

    #[test]
    fn test_typed_resolution() {
        let mut dca = registry();
        let path = DataArrayPath::new("Image", "CellData", "RGB");
        assert_eq!(dca.resolve_typed::<u8>(&path).unwrap().value(0), 7);
        assert_eq!(
            dca.resolve_typed::<f32>(&path).unwrap_err().code(),
            codes::TYPE_MISMATCH
        );
        dca.resolve_typed_mut::<u8>(&path).unwrap().set_value(0, 9);
        assert_eq!(dca.resolve_array(&path).unwrap().value_as_f64(0), 9.0);
    }

    #[test]
    fn test_take_and_insert_array() {
        let mut dca = registry();
        let path = DataArrayPath::new("Image", "CellData", "RGB");
        let mut array = dca.take_array(&path).unwrap();
        assert!(!dca.contains_path(&path));

        array.set_name("Color");
        dca.insert_array(&path, array).unwrap();
        assert!(dca.contains_path(&path.with_array("Color")));
        assert_eq!(dca.array_paths(), vec![path.with_array("Color")]);
    }

    #[test]
    fn test_container_names_unique() {
        let mut dca = registry();
        assert!(dca.add_container(DataContainer::new("Image")).is_err());
        dca.add_container(DataContainer::new("Other")).unwrap();
        assert!(dca.rename_container("Other", "Image").is_err());
        dca.rename_container("Other", "Renamed").unwrap();
        assert_eq!(dca.container_names(), vec!["Image", "Renamed"]);
        assert!(dca.remove_container("Renamed").is_some());
        assert_eq!(dca.len(), 1);
    }

    #[test]
    fn test_structure_tree() {
        let dca = registry();
        let structure = dca.structure();
        assert_eq!(structure.num_arrays(), 1);
        assert_eq!(structure.containers[0].matrices[0].tuple_dims, vec![2, 2, 1]);

        let tree = dca.structure_tree();
        assert!(tree.starts_with("DataContainerArray (1 containers)"));
        assert!(tree.contains("ImageGeometry"));
        assert!(tree.contains("RGB (uint8 x[3], 4 tuples)"));
        assert!(tree.lines().all(|l| !l.ends_with(' ')));
    }
}
