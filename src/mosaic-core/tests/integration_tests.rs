//! Integration tests for mosaic-core
//!
//! These tests exercise the data model end to end through the public API,
//! without duplicating the unit tests in individual modules.

use mosaic_core::geometry::{ImageGeometry, SHARED_VERTEX_LIST};
use mosaic_core::structure::RegistryStructure;
use mosaic_core::testing::{cell_path, rgb_image, RegistryFixture};
use mosaic_core::*;

use common_error::codes;

#[test]
fn test_int32_round_trip_and_deep_copy() {
    let values: Vec<i32> = (0..100).map(|i| i * 7 - 300).collect();
    let original: AnyArray = DataArray::from_vec("Counts", values.clone(), &[1]).unwrap().into();

    let bytes = original.to_le_bytes();
    assert_eq!(bytes.len(), 400);
    let rebuilt = AnyArray::from_le_bytes(DataType::Int32, "Counts", 100, &[1], &bytes).unwrap();
    assert_eq!(rebuilt, original);

    let mut copy = original.deep_copy("CountsCopy");
    assert_eq!(copy.name(), "CountsCopy");
    assert_eq!(copy.data_type(), DataType::Int32);
    assert_eq!(copy.num_tuples(), 100);
    assert_eq!(copy.downcast_ref::<i32>().unwrap().as_slice(), values.as_slice());

    copy.downcast_mut::<i32>().unwrap().set_value(0, 1);
    assert_eq!(original.downcast_ref::<i32>().unwrap().value(0), -300);
}

#[test]
fn test_bytes_with_wrong_length_rejected() {
    let err = AnyArray::from_le_bytes(DataType::Float64, "F", 4, &[1], &[0u8; 31]).unwrap_err();
    assert_eq!(err.kind(), common_error::ErrorKind::ShapeMismatch);
}

#[test]
fn test_structure_serializes() {
    let dca = rgb_image().unwrap();
    let structure = dca.structure();
    let json = serde_json::to_string(&structure).unwrap();
    let parsed: RegistryStructure = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, structure);

    let container = &parsed.containers[0];
    let geometry = container.geometry.as_ref().unwrap();
    assert_eq!(geometry.kind, GeometryKind::Image);
    assert_eq!(geometry.num_elements, 64);
    let array = &container.matrices[0].arrays[0];
    assert_eq!(array.data_type, DataType::UInt8);
    assert_eq!(array.component_dims, vec![3]);
}

#[test]
fn test_registry_rebuilt_from_structure_and_bytes() {
    let dca = rgb_image().unwrap();
    let structure = dca.structure();

    let mut rebuilt = DataContainerArray::new();
    for c in &structure.containers {
        let mut dc = DataContainer::new(&c.name);
        for m in &c.matrices {
            let mut matrix = AttributeMatrix::new(&m.name, m.tuple_dims.clone(), m.category);
            for a in &m.arrays {
                let path = DataArrayPath::new(&c.name, &m.name, &a.name);
                let bytes = dca.resolve_array(&path).unwrap().to_le_bytes();
                let array =
                    AnyArray::from_le_bytes(a.data_type, &a.name, a.num_tuples, &a.component_dims, &bytes)
                        .unwrap();
                matrix.add_array(array).unwrap();
            }
            dc.add_matrix(matrix).unwrap();
        }
        rebuilt.add_container(dc).unwrap();
    }

    let path = cell_path("RGB");
    assert_eq!(rebuilt.resolve_array(&path).unwrap(), dca.resolve_array(&path).unwrap());
}

#[test]
fn test_paths_survive_structural_change() {
    let mut dca = rgb_image().unwrap();
    let path = cell_path("RGB");

    let matrix_path = path.matrix_path();
    dca.resolve_matrix_mut(&matrix_path)
        .unwrap()
        .create_and_add_array::<f32>("Confidence", 1.0, &[1])
        .unwrap();

    // The path is a value; it resolves again after unrelated insertions.
    assert_eq!(dca.resolve_typed::<u8>(&path).unwrap().tuple(1), &[1, 2, 3]);
    dca.resolve_matrix_mut(&matrix_path).unwrap().rename_array("RGB", "Color").unwrap();
    assert_eq!(dca.resolve_array(&path).unwrap_err().code(), codes::PATH_NOT_FOUND);
}

#[test]
fn test_mismatched_matrix_rejected_on_image() {
    let mut dca = RegistryFixture::new().image([3, 2, 1]).unwrap().build();
    let container = dca.container_mut(mosaic_core::testing::IMAGE_CONTAINER).unwrap();

    let vertices = AttributeMatrix::new("VertexData", vec![4, 3, 2], AttributeMatrixType::Vertex);
    container.add_matrix(vertices).unwrap();
    let wrong = AttributeMatrix::new("Wrong", vec![5], AttributeMatrixType::Vertex);
    assert!(container.add_matrix(wrong).is_err());
    assert!(dca.validate().is_ok());
}

#[test]
fn test_geometry_replacement_checks_matrices() {
    let mut dc = DataContainer::with_geometry("Image", Geometry::Image(ImageGeometry::new([2, 2, 2])));
    dc.add_matrix(AttributeMatrix::new("CellData", vec![2, 2, 2], AttributeMatrixType::Cell))
        .unwrap();

    let vertices = DataArray::<f32>::create(SHARED_VERTEX_LIST, 8, &[3]).unwrap();
    let err = dc.set_geometry(Geometry::vertex(vertices)).unwrap_err();
    assert_eq!(err.kind(), common_error::ErrorKind::ShapeMismatch);
    assert_eq!(dc.geometry().map(Geometry::kind), Some(GeometryKind::Image));
}
