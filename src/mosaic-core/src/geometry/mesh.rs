//! Explicit (vertex-list based) geometries.

use crate::array::DataArray;

/// Shared vertex list plus an optional fixed-width connectivity list.
///
/// Vertex geometries have no connectivity. Connectivity entries are indices
/// into the vertex list.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry {
    pub(crate) vertices: DataArray<f32>,
    pub(crate) connectivity: Option<DataArray<i64>>,
}

impl MeshGeometry {
    /// Point cloud: vertices only.
    pub fn point_cloud(vertices: DataArray<f32>) -> Self {
        Self {
            vertices,
            connectivity: None,
        }
    }

    /// Vertices plus connectivity.
    pub fn with_connectivity(vertices: DataArray<f32>, connectivity: DataArray<i64>) -> Self {
        Self {
            vertices,
            connectivity: Some(connectivity),
        }
    }

    /// Shared vertex list (x, y, z per tuple).
    pub fn vertices(&self) -> &DataArray<f32> {
        &self.vertices
    }

    /// Shared vertex list, mutably.
    pub fn vertices_mut(&mut self) -> &mut DataArray<f32> {
        &mut self.vertices
    }

    /// Element connectivity.
    pub fn connectivity(&self) -> Option<&DataArray<i64>> {
        self.connectivity.as_ref()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.num_tuples()
    }

    /// Number of connectivity tuples, zero for a point cloud.
    pub fn num_connectivity_tuples(&self) -> usize {
        self.connectivity.as_ref().map_or(0, |c| c.num_tuples())
    }

    /// Axis-aligned bounding box of the vertices, `None` if there are none.
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        if self.vertices.num_components() != 3 || self.vertices.num_tuples() == 0 {
            return None;
        }
        let mut lo = [f32::INFINITY; 3];
        let mut hi = [f32::NEG_INFINITY; 3];
        for xyz in self.vertices.as_slice().chunks_exact(3) {
            for d in 0..3 {
                lo[d] = lo[d].min(xyz[d]);
                hi[d] = hi[d].max(xyz[d]);
            }
        }
        Some((lo, hi))
    }
}
