//! Rename an array in place.

use serde::{Deserialize, Serialize};

use common_error::codes;
use mosaic_core::{DataArrayPath, DataContainerArray};
use mosaic_engine::{Filter, FilterContext};

/// Renames the array at `path` to `new_name`.
///
/// Renaming only touches the registry structure, so it happens during
/// validation and later filters can refer to the new name. Validating again
/// after the rename is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameArray {
    pub path: DataArrayPath,
    pub new_name: String,
}

impl RenameArray {
    pub fn new(path: DataArrayPath, new_name: impl Into<String>) -> Self {
        Self {
            path,
            new_name: new_name.into(),
        }
    }
}

impl Filter for RenameArray {
    fn name(&self) -> &str {
        "Rename Data Array"
    }

    fn required_inputs(&self) -> Vec<DataArrayPath> {
        vec![self.path.clone()]
    }

    fn created_outputs(&self) -> Vec<DataArrayPath> {
        vec![self.path.with_array(self.new_name.clone())]
    }

    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        if self.new_name.is_empty() {
            ctx.set_error(codes::PATH_EMPTY, "new array name must not be empty");
            return;
        }
        if let Err(e) = self.path.require_array() {
            ctx.record(&e);
            return;
        }
        let Some(matrix) = ctx.check(registry.resolve_matrix_mut(&self.path)) else {
            return;
        };
        if self.path.array == self.new_name {
            return;
        }
        if !matrix.contains_array(&self.path.array) && matrix.contains_array(&self.new_name) {
            // already renamed by an earlier validation
            return;
        }
        ctx.check(matrix.rename_array(&self.path.array, &self.new_name));
    }

    fn execute(&self, _registry: &mut DataContainerArray, _ctx: &mut FilterContext) {}
}
