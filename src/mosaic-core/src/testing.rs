//! Test fixtures for building registries.
//!
//! These builders are used by the unit tests of this crate and by the
//! integration tests of the engine and filter crates.

use common_error::MosaicResult;

use crate::array::DataArray;
use crate::container::DataContainer;
use crate::geometry::{Geometry, GeometryKind, ImageGeometry, SHARED_VERTEX_LIST};
use crate::matrix::{AttributeMatrix, AttributeMatrixType};
use crate::path::DataArrayPath;
use crate::registry::DataContainerArray;
use crate::types::Primitive;

/// Name of the image container created by [`RegistryFixture::image`].
pub const IMAGE_CONTAINER: &str = "ImageDataContainer";
/// Name of the cell matrix created by [`RegistryFixture::image`].
pub const CELL_DATA: &str = "CellData";

/// Builder for registries used in tests.
pub struct RegistryFixture {
    registry: DataContainerArray,
}

impl RegistryFixture {
    /// Create an empty fixture.
    pub fn new() -> Self {
        Self {
            registry: DataContainerArray::new(),
        }
    }

    /// Add an image container with an empty cell matrix of `dims` cells.
    pub fn image(mut self, dims: [usize; 3]) -> MosaicResult<Self> {
        let mut dc =
            DataContainer::with_geometry(IMAGE_CONTAINER, Geometry::Image(ImageGeometry::new(dims)));
        dc.add_matrix(AttributeMatrix::new(
            CELL_DATA,
            dims.to_vec(),
            AttributeMatrixType::Cell,
        ))?;
        self.registry.add_container(dc)?;
        Ok(self)
    }

    /// Add a cell array whose values are produced by `f(flat_index)`.
    pub fn cell_array<T: Primitive>(
        mut self,
        name: &str,
        component_dims: &[usize],
        f: impl Fn(usize) -> T,
    ) -> MosaicResult<Self> {
        let path = DataArrayPath::matrix_only(IMAGE_CONTAINER, CELL_DATA);
        let matrix = self.registry.resolve_matrix_mut(&path)?;
        let array = matrix.create_and_add_array::<T>(name, T::default(), component_dims)?;
        for (i, v) in array.as_mut_slice().iter_mut().enumerate() {
            *v = f(i);
        }
        Ok(self)
    }

    /// Add a container without geometry holding a `SharedVertexList` in the
    /// generic matrix `VertexData` and a connectivity list for `kind` in the
    /// generic matrix `ElementData`, ready for geometry construction.
    pub fn mesh_sources(
        mut self,
        name: &str,
        vertices: Vec<f32>,
        kind: GeometryKind,
        connectivity: Vec<i64>,
    ) -> MosaicResult<Self> {
        let width = kind.connectivity_width().unwrap_or(1);
        let verts = DataArray::from_vec(SHARED_VERTEX_LIST, vertices, &[3])?;
        let conn_name = kind.connectivity_name().unwrap_or("Connectivity");
        let conn = DataArray::from_vec(conn_name, connectivity, &[width])?;

        let generic = AttributeMatrixType::Generic;
        let mut vertex_data = AttributeMatrix::new("VertexData", vec![verts.num_tuples()], generic);
        vertex_data.add_array(verts)?;
        let mut element_data = AttributeMatrix::new("ElementData", vec![conn.num_tuples()], generic);
        element_data.add_array(conn)?;

        let mut dc = DataContainer::new(name);
        dc.add_matrix(vertex_data)?;
        dc.add_matrix(element_data)?;
        self.registry.add_container(dc)?;
        Ok(self)
    }

    /// Finish building.
    pub fn build(self) -> DataContainerArray {
        self.registry
    }
}

impl Default for RegistryFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Path to a cell array of the fixture image container.
pub fn cell_path(array: &str) -> DataArrayPath {
    DataArrayPath::new(IMAGE_CONTAINER, CELL_DATA, array)
}

/// A `[4, 4, 4]` image with a `uint8 x[3]` array `RGB` holding `(i, 2i, 3i) mod 256`.
pub fn rgb_image() -> MosaicResult<DataContainerArray> {
    Ok(RegistryFixture::new()
        .image([4, 4, 4])?
        .cell_array::<u8>("RGB", &[3], |i| {
            let (tuple, comp) = (i / 3, i % 3);
            ((tuple * (comp + 1)) % 256) as u8
        })?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_image_fixture() {
        let dca = rgb_image().unwrap();
        let rgb = dca.resolve_typed::<u8>(&cell_path("RGB")).unwrap();
        assert_eq!(rgb.num_tuples(), 64);
        assert_eq!(rgb.tuple(5), &[5, 10, 15]);
    }

    #[test]
    fn test_mesh_sources_fixture() {
        let dca = RegistryFixture::new()
            .mesh_sources("Mesh", vec![0.0; 15], GeometryKind::Edge, vec![0, 1, 5, 0])
            .unwrap()
            .build();
        let path = DataArrayPath::new("Mesh", "ElementData", "SharedEdgeList");
        assert_eq!(dca.resolve_typed::<i64>(&path).unwrap().num_tuples(), 2);
    }
}
