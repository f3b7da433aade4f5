//! JSON pipeline definitions.
//!
//! A pipeline file lists filters by name together with their parameters:
//!
//! ```json
//! {
//!   "config": { "engine": { "treat_warnings_as_errors": true } },
//!   "filters": [
//!     { "filter": "ScaleArray", "path": { "container": "Image", "matrix": "CellData", "array": "Density" }, "factor": 2.0 }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use common_config::MosaicConfig;
use common_error::MosaicResult;
use mosaic_engine::{Filter, Pipeline};

use crate::structural::{
    ConvertArrayType, CopyArray, CreateAttributeMatrix, CreateDataArray, CreateDataContainer,
    MoveArray, RenameArray,
};
use crate::geometry::CreateGeometry;
use crate::processing::{ConvertColorToGrayScale, ScaleArray};

/// One filter with its parameters, tagged by filter name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter")]
pub enum FilterDefinition {
    CreateDataContainer(CreateDataContainer),
    CreateAttributeMatrix(CreateAttributeMatrix),
    CreateDataArray(CreateDataArray),
    CopyArray(CopyArray),
    RenameArray(RenameArray),
    MoveArray(MoveArray),
    ConvertArrayType(ConvertArrayType),
    ConvertColorToGrayScale(ConvertColorToGrayScale),
    ScaleArray(ScaleArray),
    CreateGeometry(CreateGeometry),
}

macro_rules! filter_definitions {
    ($($variant:ident),* $(,)?) => {
        impl FilterDefinition {
            /// Instantiate the filter.
            pub fn into_filter(self) -> Box<dyn Filter> {
                match self {
                    $(Self::$variant(f) => Box::new(f),)*
                }
            }
        }

        $(
            impl From<$variant> for FilterDefinition {
                fn from(filter: $variant) -> Self {
                    Self::$variant(filter)
                }
            }
        )*
    };
}

filter_definitions!(
    CreateDataContainer,
    CreateAttributeMatrix,
    CreateDataArray,
    CopyArray,
    RenameArray,
    MoveArray,
    ConvertArrayType,
    ConvertColorToGrayScale,
    ScaleArray,
    CreateGeometry,
);

/// Engine configuration plus an ordered filter list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    #[serde(default)]
    pub config: MosaicConfig,
    pub filters: Vec<FilterDefinition>,
}

impl PipelineDefinition {
    pub fn new(config: MosaicConfig) -> Self {
        Self {
            config,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<FilterDefinition>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Parse a definition from JSON text.
    pub fn from_json_str(json: &str) -> MosaicResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a definition from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> MosaicResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> MosaicResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a runnable pipeline.
    pub fn into_pipeline(self) -> Pipeline {
        let mut pipeline = Pipeline::new().with_config(self.config);
        for definition in self.filters {
            pipeline.push_boxed(definition.into_filter());
        }
        pipeline
    }
}
