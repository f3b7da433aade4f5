//! Move an array between attribute matrices of one container.

use serde::{Deserialize, Serialize};

use common_error::codes;
use mosaic_core::{DataArrayPath, DataContainerArray};
use mosaic_engine::{Filter, FilterContext};

/// Reparents the array at `source` into the matrix `destination_matrix` of
/// the same container. Both matrices must have the same tuple count.
///
/// Like [`RenameArray`](super::RenameArray) this only changes structure and
/// is applied during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveArray {
    pub source: DataArrayPath,
    pub destination_matrix: String,
}

impl MoveArray {
    pub fn new(source: DataArrayPath, destination_matrix: impl Into<String>) -> Self {
        Self {
            source,
            destination_matrix: destination_matrix.into(),
        }
    }

    fn destination(&self) -> DataArrayPath {
        DataArrayPath::new(
            self.source.container.clone(),
            self.destination_matrix.clone(),
            self.source.array.clone(),
        )
    }
}

impl Filter for MoveArray {
    fn name(&self) -> &str {
        "Move Data Array"
    }

    fn required_inputs(&self) -> Vec<DataArrayPath> {
        vec![self.source.clone(), self.destination().matrix_path()]
    }

    fn created_outputs(&self) -> Vec<DataArrayPath> {
        vec![self.destination()]
    }

    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        if let Err(e) = self.source.require_array() {
            ctx.record(&e);
            return;
        }
        let destination = self.destination();
        if destination.matrix == self.source.matrix {
            return;
        }
        let Some(target) = ctx.check(registry.resolve_matrix(&destination)) else {
            return;
        };
        let target_tuples = target.num_tuples();
        let target_has_array = target.contains_array(&destination.array);
        let Some(source) = ctx.check(registry.resolve_matrix(&self.source)) else {
            return;
        };
        if !source.contains_array(&self.source.array) && target_has_array {
            // already moved by an earlier validation
            return;
        }
        if source.num_tuples() != target_tuples {
            ctx.set_error(
                codes::TUPLE_MISMATCH,
                format!(
                    "cannot move '{}' with {} tuples into '{}' with {target_tuples}",
                    self.source,
                    source.num_tuples(),
                    destination.matrix_path()
                ),
            );
            return;
        }
        if target_has_array {
            ctx.set_error(
                codes::NAME_COLLISION,
                format!("data array '{destination}' already exists"),
            );
            return;
        }
        let Some(array) = ctx.check(registry.take_array(&self.source)) else {
            return;
        };
        ctx.check(registry.insert_array(&destination, array));
    }

    fn execute(&self, _registry: &mut DataContainerArray, _ctx: &mut FilterContext) {}
}
