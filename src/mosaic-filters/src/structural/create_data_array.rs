//! Create a data array of a runtime-selected type.

use serde::{Deserialize, Serialize};

use common_error::codes;
use mosaic_core::{DataArray, DataArrayPath, DataContainerArray, DataType, Primitive, Scalar};
use mosaic_engine::prereq::{create_non_prereq_array, get_prereq_matrix};
use mosaic_engine::{dispatch_mut, ArrayVisitorMut, Filter, FilterContext};

/// Creates an array of `data_type` sized to its matrix and fills it with
/// `init_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDataArray {
    pub path: DataArrayPath,
    pub data_type: DataType,
    #[serde(default = "default_component_dims")]
    pub component_dims: Vec<usize>,
    #[serde(default)]
    pub init_value: Scalar,
}

fn default_component_dims() -> Vec<usize> {
    vec![1]
}

impl CreateDataArray {
    pub fn new(path: DataArrayPath, data_type: DataType) -> Self {
        Self {
            path,
            data_type,
            component_dims: default_component_dims(),
            init_value: Scalar::default(),
        }
    }

    pub fn with_component_dims(mut self, dims: Vec<usize>) -> Self {
        self.component_dims = dims;
        self
    }

    pub fn with_init_value(mut self, value: impl Into<Scalar>) -> Self {
        self.init_value = value.into();
        self
    }
}

struct FillWith(Scalar);

impl ArrayVisitorMut for FillWith {
    type Output = ();

    fn visit_mut<T: Primitive>(&mut self, array: &mut DataArray<T>) {
        array.fill(self.0.to_primitive::<T>());
    }
}

impl Filter for CreateDataArray {
    fn name(&self) -> &str {
        "Create Data Array"
    }

    fn required_inputs(&self) -> Vec<DataArrayPath> {
        vec![self.path.matrix_path()]
    }

    fn created_outputs(&self) -> Vec<DataArrayPath> {
        vec![self.path.clone()]
    }

    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        if !self.init_value.fits(self.data_type) {
            ctx.set_error(
                codes::INVALID_PARAMETER,
                format!(
                    "initialization value {} cannot be represented as {}",
                    self.init_value, self.data_type
                ),
            );
            return;
        }
        if get_prereq_matrix(registry, ctx, &self.path, None).is_none() {
            return;
        }
        create_non_prereq_array(registry, ctx, &self.path, self.data_type, &self.component_dims);
    }

    fn execute(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        let Some(array) = ctx.check(registry.resolve_array_mut(&self.path)) else {
            return;
        };
        dispatch_mut(array, &self.path, ctx, &mut FillWith(self.init_value));
    }
}
