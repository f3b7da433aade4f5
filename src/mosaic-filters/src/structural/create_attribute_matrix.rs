//! Create an empty attribute matrix.

use serde::{Deserialize, Serialize};

use common_error::codes;
use mosaic_core::{AttributeMatrixType, DataArrayPath, DataContainerArray};
use mosaic_engine::prereq::{create_non_prereq_matrix, get_prereq_container, get_prereq_geometry};
use mosaic_engine::{Filter, FilterContext};

/// Creates an attribute matrix with fixed tuple dimensions in an existing
/// container. Element categories need a geometry to agree with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAttributeMatrix {
    /// `container|matrix` path of the new matrix.
    pub path: DataArrayPath,
    pub category: AttributeMatrixType,
    pub tuple_dims: Vec<usize>,
}

impl CreateAttributeMatrix {
    pub fn new(path: DataArrayPath, category: AttributeMatrixType, tuple_dims: Vec<usize>) -> Self {
        Self {
            path,
            category,
            tuple_dims,
        }
    }
}

impl Filter for CreateAttributeMatrix {
    fn name(&self) -> &str {
        "Create Attribute Matrix"
    }

    fn required_inputs(&self) -> Vec<DataArrayPath> {
        vec![self.path.container_path()]
    }

    fn created_outputs(&self) -> Vec<DataArrayPath> {
        vec![self.path.matrix_path()]
    }

    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        if self.tuple_dims.is_empty() || self.tuple_dims.contains(&0) {
            ctx.set_error(
                codes::INVALID_PARAMETER,
                format!(
                    "tuple dimensions {:?} must be non-empty with every extent at least 1",
                    self.tuple_dims
                ),
            );
            return;
        }
        if get_prereq_container(registry, ctx, &self.path).is_none() {
            return;
        }
        if self.category.element_kind().is_some()
            && get_prereq_geometry(registry, ctx, &self.path).is_none()
        {
            return;
        }
        create_non_prereq_matrix(registry, ctx, &self.path, &self.tuple_dims, self.category);
    }

    fn execute(&self, _registry: &mut DataContainerArray, _ctx: &mut FilterContext) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::testing::{RegistryFixture, IMAGE_CONTAINER};
    use mosaic_core::DataContainer;
    use mosaic_engine::FilterRunner;

    #[test]
    fn test_feature_matrix_is_free() {
        let mut dca = RegistryFixture::new().image([2, 2, 2]).unwrap().build();
        let path = DataArrayPath::matrix_only(IMAGE_CONTAINER, "Grains");
        let mut runner =
            FilterRunner::new(CreateAttributeMatrix::new(path.clone(), AttributeMatrixType::CellFeature, vec![12]));
        assert_eq!(runner.execute(&mut dca), codes::NO_ERROR);
        assert_eq!(dca.resolve_matrix(&path).unwrap().num_tuples(), 12);
    }

    #[test]
    fn test_cell_matrix_must_match_geometry() {
        let mut dca = RegistryFixture::new().image([2, 2, 2]).unwrap().build();
        let path = DataArrayPath::matrix_only(IMAGE_CONTAINER, "MoreCells");
        let mut runner =
            FilterRunner::new(CreateAttributeMatrix::new(path.clone(), AttributeMatrixType::Cell, vec![7]));
        assert_eq!(runner.validate(&mut dca), codes::TUPLE_MISMATCH);
        assert!(!dca.contains_path(&path));
    }

    #[test]
    fn test_zero_extent_rejected() {
        let mut dca = RegistryFixture::new().image([2, 2, 2]).unwrap().build();
        let path = DataArrayPath::matrix_only(IMAGE_CONTAINER, "M");
        let mut runner =
            FilterRunner::new(CreateAttributeMatrix::new(path, AttributeMatrixType::Generic, vec![3, 0]));
        assert_eq!(runner.validate(&mut dca), codes::INVALID_PARAMETER);
    }

    #[test]
    fn test_element_matrix_needs_geometry() {
        let mut dca = DataContainerArray::new();
        dca.add_container(DataContainer::new("Bare")).unwrap();
        let path = DataArrayPath::matrix_only("Bare", "CellData");
        let mut runner =
            FilterRunner::new(CreateAttributeMatrix::new(path.clone(), AttributeMatrixType::Cell, vec![4]));
        assert_eq!(runner.validate(&mut dca), codes::GEOMETRY_MISSING);
        assert!(!dca.contains_path(&path));

        let generic = DataArrayPath::matrix_only("Bare", "Table");
        let mut runner =
            FilterRunner::new(CreateAttributeMatrix::new(generic.clone(), AttributeMatrixType::Generic, vec![4]));
        assert_eq!(runner.validate(&mut dca), codes::NO_ERROR);
        assert!(dca.contains_path(&generic));
    }

    #[test]
    fn test_overflowing_tuple_dims_rejected() {
        let mut dca = RegistryFixture::new().image([2, 2, 2]).unwrap().build();
        let path = DataArrayPath::matrix_only(IMAGE_CONTAINER, "Huge");
        let dims = vec![u64::MAX as usize, 2];
        let mut runner =
            FilterRunner::new(CreateAttributeMatrix::new(path.clone(), AttributeMatrixType::Generic, dims));
        assert_eq!(runner.validate(&mut dca), codes::INVALID_PARAMETER);
        assert!(!dca.contains_path(&path));
    }
}
