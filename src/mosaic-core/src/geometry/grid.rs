//! Implicit grid geometries.

use serde::{Deserialize, Serialize};

use common_error::{MosaicError, MosaicResult};

use crate::array::{checked_product, DataArray};

/// Regular grid described by extents, origin and spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry {
    /// Number of cells along x, y and z.
    pub dimensions: [usize; 3],
    /// Coordinates of the first grid vertex.
    pub origin: [f32; 3],
    /// Cell size along x, y and z.
    pub spacing: [f32; 3],
}

impl ImageGeometry {
    /// Create a grid with unit spacing at the origin.
    pub fn new(dimensions: [usize; 3]) -> Self {
        Self {
            dimensions,
            origin: [0.0; 3],
            spacing: [1.0; 3],
        }
    }

    /// Set the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: [f32; 3]) -> Self {
        self.origin = origin;
        self
    }

    /// Set the spacing.
    #[must_use]
    pub fn with_spacing(mut self, spacing: [f32; 3]) -> Self {
        self.spacing = spacing;
        self
    }

    /// Number of cells, saturating at `usize::MAX`. See [`checked_counts`](Self::checked_counts).
    pub fn num_cells(&self) -> usize {
        checked_product(&self.dimensions).unwrap_or(usize::MAX)
    }

    /// Number of grid vertices, saturating at `usize::MAX`.
    pub fn num_vertices(&self) -> usize {
        self.vertex_dims()
            .and_then(|dims| checked_product(&dims).ok())
            .unwrap_or(usize::MAX)
    }

    /// Cell and vertex counts, failing if either overflows.
    pub fn checked_counts(&self) -> MosaicResult<(usize, usize)> {
        let overflow = || {
            MosaicError::invalid_parameter(format!(
                "image dimensions {:?} overflow the vertex count",
                self.dimensions
            ))
        };
        let vertex_dims = self.vertex_dims().ok_or_else(overflow)?;
        Ok((checked_product(&self.dimensions)?, checked_product(&vertex_dims)?))
    }

    fn vertex_dims(&self) -> Option<[usize; 3]> {
        let [x, y, z] = self.dimensions;
        Some([x.checked_add(1)?, y.checked_add(1)?, z.checked_add(1)?])
    }
}

/// Rectilinear grid described by three monotonic coordinate arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct RectGridGeometry {
    pub(crate) x_bounds: DataArray<f32>,
    pub(crate) y_bounds: DataArray<f32>,
    pub(crate) z_bounds: DataArray<f32>,
}

impl RectGridGeometry {
    /// Assemble from bound arrays. Call [`Geometry::validate`](super::Geometry::validate) afterwards.
    pub fn new(x_bounds: DataArray<f32>, y_bounds: DataArray<f32>, z_bounds: DataArray<f32>) -> Self {
        Self {
            x_bounds,
            y_bounds,
            z_bounds,
        }
    }

    /// The x, y and z bound arrays.
    pub fn bounds(&self) -> [&DataArray<f32>; 3] {
        [&self.x_bounds, &self.y_bounds, &self.z_bounds]
    }

    /// Number of cells along each axis (one less than the bound count).
    pub fn dimensions(&self) -> [usize; 3] {
        self.bounds().map(|b| b.len().saturating_sub(1))
    }

    /// Number of cells.
    pub fn num_cells(&self) -> usize {
        self.dimensions().iter().product()
    }

    /// Number of grid vertices.
    pub fn num_vertices(&self) -> usize {
        self.bounds().iter().map(|b| b.len()).product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_counts() {
        let image = ImageGeometry::new([4, 3, 2]);
        assert_eq!(image.num_cells(), 24);
        assert_eq!(image.num_vertices(), 5 * 4 * 3);
    }

    #[test]
    fn test_image_counts_overflow() {
        let image = ImageGeometry::new([usize::MAX, 2, 1]);
        assert!(image.checked_counts().is_err());
        assert_eq!(image.num_cells(), usize::MAX);
        assert_eq!(ImageGeometry::new([4, 3, 2]).checked_counts().unwrap(), (24, 60));
    }

    #[test]
    fn test_rect_grid_counts() {
        let x = DataArray::from_vec("x", vec![0.0, 1.0, 3.0], &[1]).unwrap();
        let y = DataArray::from_vec("y", vec![0.0, 2.0], &[1]).unwrap();
        let z = DataArray::from_vec("z", vec![0.0, 1.0, 2.0, 3.0], &[1]).unwrap();
        let grid = RectGridGeometry::new(x, y, z);
        assert_eq!(grid.dimensions(), [2, 1, 3]);
        assert_eq!(grid.num_cells(), 6);
        assert_eq!(grid.num_vertices(), 24);
    }
}
