//! Deep copy an array within its matrix.

use serde::{Deserialize, Serialize};

use mosaic_core::{AnyArray, DataArray, DataArrayPath, DataContainerArray, Primitive};
use mosaic_engine::prereq::{create_non_prereq_array, get_prereq_array};
use mosaic_engine::{dispatch, ArrayRequirement, ArrayVisitor, Filter, FilterContext};

/// Copies `source` to a sibling array named `destination_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyArray {
    pub source: DataArrayPath,
    pub destination_name: String,
}

impl CopyArray {
    pub fn new(source: DataArrayPath, destination_name: impl Into<String>) -> Self {
        Self {
            source,
            destination_name: destination_name.into(),
        }
    }

    fn destination(&self) -> DataArrayPath {
        self.source.with_array(self.destination_name.clone())
    }
}

struct CopyTo<'a>(&'a str);

impl ArrayVisitor for CopyTo<'_> {
    type Output = AnyArray;

    fn visit<T: Primitive>(&mut self, array: &DataArray<T>) -> AnyArray {
        array.deep_copy(self.0).into()
    }
}

impl Filter for CopyArray {
    fn name(&self) -> &str {
        "Copy Data Array"
    }

    fn required_inputs(&self) -> Vec<DataArrayPath> {
        vec![self.source.clone()]
    }

    fn created_outputs(&self) -> Vec<DataArrayPath> {
        vec![self.destination()]
    }

    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        let Some(source) = get_prereq_array(registry, ctx, &self.source, &ArrayRequirement::any())
        else {
            return;
        };
        let (data_type, dims) = (source.data_type(), source.component_dims().to_vec());
        create_non_prereq_array(registry, ctx, &self.destination(), data_type, &dims);
    }

    fn execute(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        let Some(source) = ctx.check(registry.resolve_array(&self.source)) else {
            return;
        };
        let Some(copy) = dispatch(source, &self.source, ctx, &mut CopyTo(&self.destination_name))
        else {
            return;
        };
        ctx.check(registry.insert_array(&self.source, copy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_error::codes;
    use mosaic_core::testing::{cell_path, rgb_image};
    use mosaic_engine::FilterRunner;

    #[test]
    fn test_copy_is_independent() {
        let mut dca = rgb_image().unwrap();
        let mut runner = FilterRunner::new(CopyArray::new(cell_path("RGB"), "RGB_Copy"));
        assert_eq!(runner.execute(&mut dca), codes::NO_ERROR);

        let copy = dca.resolve_typed_mut::<u8>(&cell_path("RGB_Copy")).unwrap();
        assert_eq!(copy.component_dims(), &[3]);
        copy.fill(0);
        let original = dca.resolve_typed::<u8>(&cell_path("RGB")).unwrap();
        assert_eq!(original.tuple(1), &[1, 2, 3]);
    }

    #[test]
    fn test_missing_source() {
        let mut dca = rgb_image().unwrap();
        let mut runner = FilterRunner::new(CopyArray::new(cell_path("Nope"), "Copy"));
        assert_eq!(runner.validate(&mut dca), codes::PATH_NOT_FOUND);
    }
}
