//! Serializable description of a registry's layout.
//!
//! The structure lists containers, matrices and arrays with their shapes and
//! type tags but no element data. Together with [`AnyArray::to_le_bytes`]
//! it is enough to persist and rebuild a registry.
//!
//! [`AnyArray::to_le_bytes`]: crate::array::AnyArray::to_le_bytes

use serde::{Deserialize, Serialize};

use common_display::{format_dims, Outline};

use crate::array::{AnyArray, DataArray};
use crate::container::DataContainer;
use crate::geometry::{Geometry, GeometryKind};
use crate::matrix::{AttributeMatrix, AttributeMatrixType};
use crate::types::{DataType, Primitive};

/// Layout of a whole registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryStructure {
    pub containers: Vec<ContainerStructure>,
}

/// Layout of one data container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerStructure {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryStructure>,
    pub matrices: Vec<MatrixStructure>,
}

/// Summary of a geometry and the arrays it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryStructure {
    pub kind: GeometryKind,
    pub num_vertices: usize,
    pub num_elements: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arrays: Vec<ArrayStructure>,
}

/// Layout of one attribute matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixStructure {
    pub name: String,
    pub category: AttributeMatrixType,
    pub tuple_dims: Vec<usize>,
    pub arrays: Vec<ArrayStructure>,
}

/// Shape and type of one array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayStructure {
    pub name: String,
    pub data_type: DataType,
    pub num_tuples: usize,
    pub component_dims: Vec<usize>,
}

impl RegistryStructure {
    /// Total number of arrays across all matrices.
    pub fn num_arrays(&self) -> usize {
        self.containers
            .iter()
            .flat_map(|c| &c.matrices)
            .map(|m| m.arrays.len())
            .sum()
    }
}

impl From<&AnyArray> for ArrayStructure {
    fn from(array: &AnyArray) -> Self {
        Self {
            name: array.name().to_string(),
            data_type: array.data_type(),
            num_tuples: array.num_tuples(),
            component_dims: array.component_dims().to_vec(),
        }
    }
}

impl<T: Primitive> From<&DataArray<T>> for ArrayStructure {
    fn from(array: &DataArray<T>) -> Self {
        Self {
            name: array.name().to_string(),
            data_type: T::DATA_TYPE,
            num_tuples: array.num_tuples(),
            component_dims: array.component_dims().to_vec(),
        }
    }
}

impl From<&AttributeMatrix> for MatrixStructure {
    fn from(matrix: &AttributeMatrix) -> Self {
        Self {
            name: matrix.name().to_string(),
            category: matrix.category(),
            tuple_dims: matrix.tuple_dims().to_vec(),
            arrays: matrix.arrays().map(ArrayStructure::from).collect(),
        }
    }
}

impl From<&Geometry> for GeometryStructure {
    fn from(geometry: &Geometry) -> Self {
        let arrays = match geometry {
            Geometry::RectGrid(g) => g
                .bounds()
                .into_iter()
                .map(ArrayStructure::from)
                .collect(),
            _ => geometry
                .as_mesh()
                .map(|m| {
                    let mut arrays = vec![ArrayStructure::from(m.vertices())];
                    if let Some(conn) = m.connectivity() {
                        arrays.push(ArrayStructure::from(conn));
                    }
                    arrays
                })
                .unwrap_or_default(),
        };
        Self {
            kind: geometry.kind(),
            num_vertices: geometry.num_vertices(),
            num_elements: geometry.num_elements(),
            arrays,
        }
    }
}

impl From<&DataContainer> for ContainerStructure {
    fn from(container: &DataContainer) -> Self {
        Self {
            name: container.name().to_string(),
            geometry: container.geometry().map(GeometryStructure::from),
            matrices: container.matrices().map(MatrixStructure::from).collect(),
        }
    }
}

impl RegistryStructure {
    /// Containers at depth 1, their geometry and matrices at depth 2, arrays
    /// at depth 3.
    pub fn outline(&self) -> Outline {
        let mut out = Outline::new();
        out.push(0, format!("DataContainerArray ({} containers)", self.containers.len()));
        for container in &self.containers {
            out.push(1, &container.name);
            if let Some(geometry) = &container.geometry {
                out.push(
                    2,
                    format!(
                        "{} ({} vertices, {} elements)",
                        geometry.kind, geometry.num_vertices, geometry.num_elements
                    ),
                );
                for array in &geometry.arrays {
                    out.push(3, array.summary());
                }
            }
            for matrix in &container.matrices {
                out.push(
                    2,
                    format!(
                        "{} ({} {})",
                        matrix.name,
                        matrix.category,
                        format_dims(&matrix.tuple_dims)
                    ),
                );
                for array in &matrix.arrays {
                    out.push(3, array.summary());
                }
            }
        }
        out
    }
}

impl ArrayStructure {
    fn summary(&self) -> String {
        format!(
            "{} ({} x{}, {} tuples)",
            self.name,
            self.data_type,
            format_dims(&self.component_dims),
            self.num_tuples
        )
    }
}
