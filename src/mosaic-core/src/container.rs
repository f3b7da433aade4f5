//! Data containers: an optional geometry plus named attribute matrices.

use common_display::format_dims;
use common_error::{MosaicError, MosaicResult};

use crate::geometry::Geometry;
use crate::matrix::AttributeMatrix;

/// A named group of attribute matrices sharing one (optional) geometry.
///
/// Element matrices (`Vertex`, `Edge`, `Face`, `Cell`) must agree with the
/// geometry's element counts. The check runs when either side changes, so a
/// container never holds a geometry and an element matrix that disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct DataContainer {
    name: String,
    geometry: Option<Geometry>,
    matrices: Vec<AttributeMatrix>,
}

impl DataContainer {
    /// Create an empty container without geometry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry: None,
            matrices: Vec::new(),
        }
    }

    /// Create a container owning `geometry`.
    pub fn with_geometry(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            geometry: Some(geometry),
            matrices: Vec::new(),
        }
    }

    /// Container name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The owned geometry, if any.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Mutable access to the owned geometry.
    ///
    /// Changing element counts through this handle bypasses the category
    /// check; call [`validate`](Self::validate) afterwards.
    pub fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        self.geometry.as_mut()
    }

    /// Check if a geometry is set.
    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    /// Install a geometry, returning the previous one.
    ///
    /// Fails without modification if an existing element matrix disagrees
    /// with the new geometry's element counts.
    pub fn set_geometry(&mut self, geometry: Geometry) -> MosaicResult<Option<Geometry>> {
        for matrix in &self.matrices {
            check_category(&self.name, Some(&geometry), matrix)?;
        }
        Ok(self.geometry.replace(geometry))
    }

    /// Remove and return the geometry.
    pub fn take_geometry(&mut self) -> Option<Geometry> {
        self.geometry.take()
    }

    /// Number of matrices.
    pub fn num_matrices(&self) -> usize {
        self.matrices.len()
    }

    /// Matrix names in insertion order.
    pub fn matrix_names(&self) -> Vec<&str> {
        self.matrices.iter().map(AttributeMatrix::name).collect()
    }

    /// Iterate matrices in insertion order.
    pub fn matrices(&self) -> impl Iterator<Item = &AttributeMatrix> {
        self.matrices.iter()
    }

    /// Check if a matrix with `name` exists.
    pub fn contains_matrix(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.matrices.iter().position(|m| m.name() == name)
    }

    /// Look up a matrix by name.
    pub fn matrix(&self, name: &str) -> Option<&AttributeMatrix> {
        self.matrices.iter().find(|m| m.name() == name)
    }

    /// Look up a matrix by name, mutably.
    pub fn matrix_mut(&mut self, name: &str) -> Option<&mut AttributeMatrix> {
        self.matrices.iter_mut().find(|m| m.name() == name)
    }

    /// Add a matrix, failing on a name collision or a category mismatch.
    pub fn add_matrix(&mut self, matrix: AttributeMatrix) -> MosaicResult<()> {
        if self.contains_matrix(matrix.name()) {
            return Err(MosaicError::name_collision(format!(
                "data container '{}' already contains an attribute matrix named '{}'",
                self.name,
                matrix.name()
            )));
        }
        check_category(&self.name, self.geometry.as_ref(), &matrix)?;
        self.matrices.push(matrix);
        Ok(())
    }

    /// Add or replace a matrix by name, returning the replaced one.
    pub fn insert_or_assign_matrix(
        &mut self,
        matrix: AttributeMatrix,
    ) -> MosaicResult<Option<AttributeMatrix>> {
        check_category(&self.name, self.geometry.as_ref(), &matrix)?;
        match self.position(matrix.name()) {
            Some(idx) => Ok(Some(std::mem::replace(&mut self.matrices[idx], matrix))),
            None => {
                self.matrices.push(matrix);
                Ok(None)
            }
        }
    }

    /// Remove a matrix, transferring ownership (and its arrays) to the caller.
    pub fn remove_matrix(&mut self, name: &str) -> Option<AttributeMatrix> {
        self.position(name).map(|idx| self.matrices.remove(idx))
    }

    /// Rename a matrix in place.
    pub fn rename_matrix(&mut self, old_name: &str, new_name: &str) -> MosaicResult<()> {
        if old_name != new_name && self.contains_matrix(new_name) {
            return Err(MosaicError::name_collision(format!(
                "data container '{}' already contains an attribute matrix named '{new_name}'",
                self.name
            )));
        }
        let container = self.name.clone();
        let matrix = self.matrix_mut(old_name).ok_or_else(|| {
            MosaicError::path_not_found(format!(
                "attribute matrix '{old_name}' does not exist in data container '{container}'"
            ))
        })?;
        matrix.set_name(new_name);
        Ok(())
    }

    /// Verify every matrix's tuple invariant and category binding.
    pub fn validate(&self) -> MosaicResult<()> {
        for matrix in &self.matrices {
            matrix.validate()?;
            check_category(&self.name, self.geometry.as_ref(), matrix)?;
        }
        Ok(())
    }

    /// Duplicate the container, its geometry and every matrix.
    pub fn deep_copy(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

/// Check an element matrix's tuple count against the geometry.
///
/// Containers without geometry do not constrain categories.
fn check_category(
    container: &str,
    geometry: Option<&Geometry>,
    matrix: &AttributeMatrix,
) -> MosaicResult<()> {
    let Some(geometry) = geometry else {
        return Ok(());
    };
    let Some(expected) = geometry.tuple_count_for(matrix.category())? else {
        return Ok(());
    };
    if matrix.num_tuples() != expected {
        return Err(MosaicError::shape_mismatch(format!(
            "{} attribute matrix '{}' {} has {} tuples but the {} of data container '{container}' defines {expected}",
            matrix.category(),
            matrix.name(),
            format_dims(matrix.tuple_dims()),
            matrix.num_tuples(),
            geometry.kind(),
        )));
    }
    Ok(())
}
