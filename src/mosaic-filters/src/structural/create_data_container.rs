//! Create an empty data container.

use serde::{Deserialize, Serialize};

use mosaic_core::{DataArrayPath, DataContainerArray};
use mosaic_engine::prereq::create_non_prereq_container;
use mosaic_engine::{Filter, FilterContext};

/// Creates an empty, geometry-less data container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDataContainer {
    pub name: String,
}

impl CreateDataContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Filter for CreateDataContainer {
    fn name(&self) -> &str {
        "Create Data Container"
    }

    fn created_outputs(&self) -> Vec<DataArrayPath> {
        vec![DataArrayPath::container_only(self.name.clone())]
    }

    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        create_non_prereq_container(registry, ctx, &self.name);
    }

    fn execute(&self, _registry: &mut DataContainerArray, _ctx: &mut FilterContext) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_error::codes;
    use mosaic_engine::FilterRunner;

    #[test]
    fn test_creates_container() {
        let mut dca = DataContainerArray::new();
        let mut runner = FilterRunner::new(CreateDataContainer::new("Image"));
        assert_eq!(runner.execute(&mut dca), codes::NO_ERROR);
        assert_eq!(dca.container_names(), vec!["Image"]);
        assert_eq!(runner.validate(&mut dca), codes::NO_ERROR);
        assert_eq!(dca.len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut dca = DataContainerArray::new();
        let mut runner = FilterRunner::new(CreateDataContainer::new(""));
        assert_eq!(runner.validate(&mut dca), codes::PATH_EMPTY);
        assert!(dca.is_empty());
    }
}
