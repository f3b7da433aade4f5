//! Sample data generation for playground examples.
//!
//! The demo registry holds two containers:
//! - `Image`: an image geometry with a `uint8 x[3]` color gradient `RGB`
//! - `Strip`: a geometry-less container with a vertex list and a triangle
//!   connectivity list, ready for geometry construction

use common_config::MosaicConfig;
use common_error::MosaicResult;
use mosaic_core::geometry::{ImageGeometry, SHARED_VERTEX_LIST};
use mosaic_core::{
    AttributeMatrix, AttributeMatrixType, DataArray, DataArrayPath, DataContainer,
    DataContainerArray, DataType, Geometry, GeometryKind,
};
use mosaic_filters::{
    ArrayHandling, ConversionMethod, ConvertColorToGrayScale, CreateDataArray, CreateGeometry,
    GeometrySource, PipelineDefinition, ScaleArray,
};

/// Name of the demo image container.
pub const IMAGE: &str = "Image";
/// Name of the demo mesh container.
pub const STRIP: &str = "Strip";

/// Create an image container with a color gradient over `dims` cells.
///
/// Red follows x, green follows y and blue follows z, each scaled to the
/// full `u8` range.
pub fn create_rgb_image(dims: [usize; 3]) -> MosaicResult<DataContainer> {
    let [nx, ny, nz] = dims;
    let ramp = |i: usize, n: usize| if n > 1 { (i * 255 / (n - 1)) as u8 } else { 0 };

    let mut rgb = Vec::with_capacity(nx * ny * nz * 3);
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                rgb.extend([ramp(x, nx), ramp(y, ny), ramp(z, nz)]);
            }
        }
    }

    let mut cells = AttributeMatrix::new("CellData", dims.to_vec(), AttributeMatrixType::Cell);
    cells.add_array(DataArray::from_vec("RGB", rgb, &[3])?)?;

    let geometry = ImageGeometry::new(dims).with_spacing([0.5, 0.5, 1.0]);
    let mut container = DataContainer::with_geometry(IMAGE, Geometry::Image(geometry));
    container.add_matrix(cells)?;
    Ok(container)
}

/// Create a container holding a strip of `quads` unit squares split into
/// triangles, stored as plain arrays without a geometry.
pub fn create_strip_mesh_sources(quads: usize) -> MosaicResult<DataContainer> {
    let mut vertices = Vec::with_capacity((quads + 1) * 6);
    for i in 0..=quads {
        vertices.extend([i as f32, 0.0, 0.0, i as f32, 1.0, 0.0]);
    }
    let mut triangles = Vec::with_capacity(quads * 6);
    for i in 0..quads as i64 {
        let (a, b, c, d) = (2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3);
        triangles.extend([a, c, b, b, c, d]);
    }

    let generic = AttributeMatrixType::Generic;
    let verts = DataArray::from_vec(SHARED_VERTEX_LIST, vertices, &[3])?;
    let conn_name = GeometryKind::Triangle.connectivity_name().unwrap_or("Triangles");
    let tris = DataArray::from_vec(conn_name, triangles, &[3])?;

    let mut vertex_data = AttributeMatrix::new("Points", vec![verts.num_tuples()], generic);
    vertex_data.add_array(verts)?;
    let mut face_data = AttributeMatrix::new("Triangles", vec![tris.num_tuples()], generic);
    face_data.add_array(tris)?;

    let mut container = DataContainer::new(STRIP);
    container.add_matrix(vertex_data)?;
    container.add_matrix(face_data)?;
    Ok(container)
}

/// The full demo registry.
pub fn create_demo_registry() -> MosaicResult<DataContainerArray> {
    let mut registry = DataContainerArray::new();
    registry.add_container(create_rgb_image([32, 24, 8])?)?;
    registry.add_container(create_strip_mesh_sources(16)?)?;
    Ok(registry)
}

/// A pipeline over [`create_demo_registry`]: grayscale conversion, an
/// intensity rescale, triangle geometry construction and a face array.
pub fn demo_pipeline() -> PipelineDefinition {
    let rgb = DataArrayPath::new(IMAGE, "CellData", "RGB");
    let gray = rgb.with_array("Gray_RGB");
    let geometry = CreateGeometry::new(
        STRIP,
        GeometrySource::Triangle {
            vertices: DataArrayPath::new(STRIP, "Points", SHARED_VERTEX_LIST),
            triangles: DataArrayPath::new(STRIP, "Triangles", "SharedTriList"),
        },
    )
    .with_array_handling(ArrayHandling::Move);

    PipelineDefinition::new(MosaicConfig::default())
        .with_filter(
            ConvertColorToGrayScale::new(vec![rgb]).with_conversion(ConversionMethod::luminosity()),
        )
        .with_filter(ScaleArray::new(gray, 0.5))
        .with_filter(geometry)
        .with_filter(
            CreateDataArray::new(DataArrayPath::new(STRIP, "FaceData", "Area"), DataType::Float32)
                .with_init_value(0.5),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_registry_is_consistent() {
        let registry = create_demo_registry().unwrap();
        registry.validate().unwrap();
        assert_eq!(registry.container_names(), vec![IMAGE, STRIP]);

        let rgb = registry
            .resolve_typed::<u8>(&DataArrayPath::new(IMAGE, "CellData", "RGB"))
            .unwrap();
        assert_eq!(rgb.num_tuples(), 32 * 24 * 8);
        assert_eq!(rgb.tuple(0), &[0, 0, 0]);
        assert_eq!(rgb.tuple(rgb.num_tuples() - 1), &[255, 255, 255]);
    }

    #[test]
    fn test_demo_pipeline_runs() {
        let mut registry = create_demo_registry().unwrap();
        let mut pipeline = demo_pipeline().into_pipeline();
        let report = pipeline.execute(&mut registry, None).unwrap();
        assert!(report.is_success(), "{:?}", report.diagnostics);
        assert_eq!(report.executed, 4);

        let strip = registry.container(STRIP).unwrap();
        assert_eq!(strip.geometry().unwrap().num_faces(), Some(32));
        assert_eq!(strip.matrix("FaceData").unwrap().num_tuples(), 32);
    }
}
