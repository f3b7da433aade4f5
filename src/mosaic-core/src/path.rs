//! Addresses of containers, matrices and arrays in the registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use common_error::{MosaicError, MosaicResult};

/// Separator used by the textual form `container|matrix|array`.
pub const PATH_SEPARATOR: char = '|';

/// A `(container, matrix, array)` address.
///
/// Paths are plain values; they hold no reference into the registry and must
/// be resolved again after any structural change. Trailing parts may be
/// empty, so the same type addresses a container, a matrix or an array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataArrayPath {
    pub container: String,
    pub matrix: String,
    pub array: String,
}

impl DataArrayPath {
    /// Address of an array.
    pub fn new(
        container: impl Into<String>,
        matrix: impl Into<String>,
        array: impl Into<String>,
    ) -> Self {
        Self {
            container: container.into(),
            matrix: matrix.into(),
            array: array.into(),
        }
    }

    /// Address of a container.
    pub fn container_only(container: impl Into<String>) -> Self {
        Self::new(container, "", "")
    }

    /// Address of an attribute matrix.
    pub fn matrix_only(container: impl Into<String>, matrix: impl Into<String>) -> Self {
        Self::new(container, matrix, "")
    }

    /// True if every part is empty.
    pub fn is_empty(&self) -> bool {
        self.container.is_empty() && self.matrix.is_empty() && self.array.is_empty()
    }

    /// True if all three parts are set.
    pub fn is_array_path(&self) -> bool {
        !self.container.is_empty() && !self.matrix.is_empty() && !self.array.is_empty()
    }

    /// True if container and matrix are set.
    pub fn has_matrix(&self) -> bool {
        !self.container.is_empty() && !self.matrix.is_empty()
    }

    /// This path truncated to its container.
    pub fn container_path(&self) -> Self {
        Self::container_only(self.container.clone())
    }

    /// This path truncated to its matrix.
    pub fn matrix_path(&self) -> Self {
        Self::matrix_only(self.container.clone(), self.matrix.clone())
    }

    /// Sibling array in the same matrix.
    pub fn with_array(&self, array: impl Into<String>) -> Self {
        Self::new(self.container.clone(), self.matrix.clone(), array)
    }

    /// Same array name under another matrix path.
    pub fn with_matrix(&self, matrix: impl Into<String>) -> Self {
        Self::new(self.container.clone(), matrix, self.array.clone())
    }

    /// Fail with a path error unless the container part is set.
    pub fn require_container(&self) -> MosaicResult<()> {
        if self.container.is_empty() {
            return Err(MosaicError::path_empty(format!(
                "path '{self}' has no data container name"
            )));
        }
        Ok(())
    }

    /// Fail with a path error unless container and matrix are set.
    pub fn require_matrix(&self) -> MosaicResult<()> {
        self.require_container()?;
        if self.matrix.is_empty() {
            return Err(MosaicError::path_empty(format!(
                "path '{self}' has no attribute matrix name"
            )));
        }
        Ok(())
    }

    /// Fail with a path error unless all three parts are set.
    pub fn require_array(&self) -> MosaicResult<()> {
        self.require_matrix()?;
        if self.array.is_empty() {
            return Err(MosaicError::path_empty(format!(
                "path '{self}' has no data array name"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DataArrayPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{PATH_SEPARATOR}{}{PATH_SEPARATOR}{}",
            self.container, self.matrix, self.array
        )
    }
}

impl FromStr for DataArrayPath {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(PATH_SEPARATOR);
        let container = parts.next().unwrap_or_default();
        let matrix = parts.next().unwrap_or_default();
        let array = parts.next().unwrap_or_default();
        if parts.next().is_some() {
            return Err(MosaicError::invalid_parameter(format!(
                "'{s}' has more than three path components"
            )));
        }
        Ok(Self::new(container, matrix, array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let path = DataArrayPath::new("Image", "CellData", "RGB");
        assert_eq!(path.to_string(), "Image|CellData|RGB");
        assert_eq!("Image|CellData|RGB".parse::<DataArrayPath>().unwrap(), path);
    }

    #[test]
    fn test_partial_paths() {
        let path: DataArrayPath = "Image".parse().unwrap();
        assert_eq!(path, DataArrayPath::container_only("Image"));
        assert!(path.require_container().is_ok());
        assert!(path.require_matrix().is_err());

        let path: DataArrayPath = "Image|CellData".parse().unwrap();
        assert!(path.has_matrix());
        assert!(!path.is_array_path());
        assert!("a|b|c|d".parse::<DataArrayPath>().is_err());
        assert!(DataArrayPath::default().is_empty());
    }

    #[test]
    fn test_derived_paths() {
        let path = DataArrayPath::new("Image", "CellData", "RGB");
        assert_eq!(path.with_array("Gray"), DataArrayPath::new("Image", "CellData", "Gray"));
        assert_eq!(path.matrix_path(), DataArrayPath::matrix_only("Image", "CellData"));
        assert_eq!(path.container_path().to_string(), "Image||");
        assert_eq!(path.with_matrix("Other").matrix, "Other");
    }

    #[test]
    fn test_empty_path_code() {
        let err = DataArrayPath::new("", "", "").require_array().unwrap_err();
        assert_eq!(err.code(), common_error::codes::PATH_EMPTY);
    }
}
