//! Property-based tests for the data model.
//!
//! Strategies here generate arrays, matrices and connectivity lists to check
//! the model's shape invariants under arbitrary inputs.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use common_error::codes;

    use crate::array::{AnyArray, DataArray};
    use crate::geometry::{Geometry, GeometryKind, IssueSeverity, SHARED_VERTEX_LIST};
    use crate::matrix::{AttributeMatrix, AttributeMatrixType};
    use crate::path::DataArrayPath;
    use crate::types::DataType;

    // =========================================================================
    // Strategies
    // =========================================================================

    fn arb_data_type() -> impl Strategy<Value = DataType> {
        prop::sample::select(DataType::ALL.to_vec())
    }

    /// (type, tuple count, component dims) triples for array creation.
    fn arb_array_shape() -> impl Strategy<Value = (DataType, usize, Vec<usize>)> {
        (
            arb_data_type(),
            0usize..40,
            prop::collection::vec(1usize..4, 1..3),
        )
    }

    fn arb_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9_ ]{0,12}"
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    proptest! {
        /// Every array accepted by a matrix has the matrix's tuple count and
        /// rejected inserts leave the matrix untouched.
        #[test]
        fn matrix_tuple_agreement(
            tuples in 0usize..40,
            shapes in prop::collection::vec(arb_array_shape(), 0..12)
        ) {
            let mut matrix = AttributeMatrix::new("M", vec![tuples], AttributeMatrixType::Generic);
            for (i, (ty, n, dims)) in shapes.into_iter().enumerate() {
                let before = matrix.clone();
                let array = AnyArray::create(ty, format!("A{i}"), n, &dims).unwrap();
                match matrix.insert_or_assign(array) {
                    Ok(_) => prop_assert_eq!(n, tuples),
                    Err(e) => {
                        prop_assert_ne!(n, tuples);
                        prop_assert_eq!(e.code(), codes::TUPLE_MISMATCH);
                        prop_assert_eq!(&matrix, &before);
                    }
                }
            }
            prop_assert!(matrix.arrays().all(|a| a.num_tuples() == tuples));
            prop_assert!(matrix.validate().is_ok());
        }

        /// Resizing a matrix keeps every array in lock-step.
        #[test]
        fn matrix_resize_lock_step(
            tuples in 0usize..30,
            new_tuples in 0usize..30,
            types in prop::collection::vec(arb_data_type(), 1..6)
        ) {
            let mut matrix = AttributeMatrix::new("M", vec![tuples], AttributeMatrixType::Generic);
            for (i, ty) in types.iter().enumerate() {
                matrix.add_array(AnyArray::create(*ty, format!("A{i}"), tuples, &[2]).unwrap()).unwrap();
            }
            matrix.resize_tuples(vec![new_tuples]).unwrap();
            for array in matrix.arrays() {
                prop_assert_eq!(array.num_tuples(), new_tuples);
                prop_assert_eq!(array.len(), new_tuples * 2);
            }
        }

        /// A connectivity error is reported exactly when some index falls
        /// outside `[0, vertex_count)`.
        #[test]
        fn connectivity_bound(
            num_vertices in 1usize..20,
            conn in prop::collection::vec(-2i64..25, 0..20)
        ) {
            let conn: Vec<i64> = conn.iter().copied().take(conn.len() / 2 * 2).collect();
            let out_of_range = conn.iter().any(|&i| i < 0 || i >= num_vertices as i64);

            let vertices = DataArray::<f32>::create(SHARED_VERTEX_LIST, num_vertices, &[3]).unwrap();
            let edges = DataArray::from_vec("SharedEdgeList", conn, &[2]).unwrap();
            let geom = Geometry::mesh(GeometryKind::Edge, vertices, edges).unwrap();

            let errors: Vec<_> = geom
                .validate()
                .into_iter()
                .filter(|i| i.severity == IssueSeverity::Error)
                .collect();
            prop_assert_eq!(!errors.is_empty(), out_of_range);
            prop_assert!(errors.iter().all(|i| i.code == codes::CONNECTIVITY_OUT_OF_RANGE));
        }

        /// The textual path form parses back to the same path.
        #[test]
        fn path_text_form(c in arb_name(), m in arb_name(), a in arb_name()) {
            let path = DataArrayPath::new(c, m, a);
            let parsed: DataArrayPath = path.to_string().parse().unwrap();
            prop_assert_eq!(parsed, path);
        }

        /// Raw bytes rebuild an array of identical type, shape and content.
        #[test]
        fn int32_bytes_rebuild(values in prop::collection::vec(any::<i32>(), 0..64)) {
            let tuples = values.len() / 2;
            let values: Vec<i32> = values.into_iter().take(tuples * 2).collect();
            let array: AnyArray = DataArray::from_vec("I", values, &[2]).unwrap().into();

            let bytes = array.to_le_bytes();
            let rebuilt = AnyArray::from_le_bytes(DataType::Int32, "I", tuples, &[2], &bytes).unwrap();
            prop_assert_eq!(rebuilt, array);
        }
    }
}
