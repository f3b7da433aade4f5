//! Convert an array to another element type.

use serde::{Deserialize, Serialize};

use common_error::MosaicResult;
use mosaic_core::{match_any_array, AnyArray, DataArray, DataArrayPath, DataContainerArray, DataType, Primitive};
use mosaic_engine::prereq::{create_non_prereq_array, get_prereq_array};
use mosaic_engine::{dispatch_type, ArrayRequirement, Filter, FilterContext, TypeVisitor};

/// Writes a copy of `input` converted to `output_type` next to it.
///
/// Integer to integer conversions are exact and saturate at the target
/// bounds. Float sources round to nearest. Boolean targets are `true` for
/// any non-zero value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertArrayType {
    pub input: DataArrayPath,
    pub output_type: DataType,
    pub output_name: String,
}

impl ConvertArrayType {
    pub fn new(input: DataArrayPath, output_type: DataType, output_name: impl Into<String>) -> Self {
        Self {
            input,
            output_type,
            output_name: output_name.into(),
        }
    }

    fn output(&self) -> DataArrayPath {
        self.input.with_array(self.output_name.clone())
    }
}

/// Instantiated for the target type, then matches on the source type.
struct ConvertTo<'a> {
    source: &'a AnyArray,
    name: &'a str,
}

impl TypeVisitor for ConvertTo<'_> {
    type Output = MosaicResult<AnyArray>;

    fn visit_type<T: Primitive>(&mut self) -> Self::Output {
        let name = self.name;
        match_any_array!(self.source, a => convert::<_, T>(a, name))
    }
}

fn convert<S: Primitive, T: Primitive>(source: &DataArray<S>, name: &str) -> MosaicResult<AnyArray> {
    let data = source.as_slice().iter().map(|v| v.cast::<T>()).collect();
    Ok(DataArray::from_vec(name, data, source.component_dims())?.into())
}

impl Filter for ConvertArrayType {
    fn name(&self) -> &str {
        "Convert Array Type"
    }

    fn required_inputs(&self) -> Vec<DataArrayPath> {
        vec![self.input.clone()]
    }

    fn created_outputs(&self) -> Vec<DataArrayPath> {
        vec![self.output()]
    }

    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        let Some(input) = get_prereq_array(registry, ctx, &self.input, &ArrayRequirement::any())
        else {
            return;
        };
        let dims = input.component_dims().to_vec();
        create_non_prereq_array(registry, ctx, &self.output(), self.output_type, &dims);
    }

    fn execute(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        let Some(source) = ctx.check(registry.resolve_array(&self.input)) else {
            return;
        };
        let mut visitor = ConvertTo {
            source,
            name: &self.output_name,
        };
        let Some(result) = dispatch_type(self.output_type, &self.output(), ctx, &mut visitor) else {
            return;
        };
        if let Some(converted) = ctx.check(result) {
            ctx.check(registry.insert_array(&self.input, converted));
        }
    }
}
