//! Core error types for Mosaic.

use thiserror::Error;

use crate::codes;

/// Result type alias using `MosaicError`.
pub type MosaicResult<T> = std::result::Result<T, MosaicError>;

/// Core error type for Mosaic operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MosaicError {
    /// A data path did not resolve.
    #[error("PathNotFound: {0}")]
    PathNotFound(String),

    /// A data path is missing a required part.
    #[error("PathEmpty: {0}")]
    PathEmpty(String),

    /// A container has no geometry where one is required.
    #[error("GeometryMissing: {0}")]
    GeometryMissing(String),

    /// Tuple or component shape disagreement.
    #[error("ShapeMismatch: {0}")]
    ShapeMismatch(String),

    /// Array primitive type disagreement.
    #[error("TypeMismatch: {0}")]
    TypeMismatch(String),

    /// No code path exists for an array's primitive type.
    #[error("UnsupportedType: {0}")]
    UnsupportedType(String),

    /// An object of the same name already exists.
    #[error("NameCollision: {0}")]
    NameCollision(String),

    /// Geometry or bounds data violate an invariant.
    #[error("StructuralViolation: {0}")]
    StructuralViolation(String),

    /// Invalid parameter provided.
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),

    /// Filter execution error.
    #[error("ExecutionError: {0}")]
    ExecutionError(String),

    /// Pipeline execution was cancelled.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Internal error (bug in Mosaic).
    #[error("InternalError: {0}")]
    InternalError(String),

    /// IO error.
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl MosaicError {
    /// Create a new `PathNotFound` error.
    pub fn path_not_found<S: Into<String>>(msg: S) -> Self {
        Self::PathNotFound(msg.into())
    }

    /// Create a new `PathEmpty` error.
    pub fn path_empty<S: Into<String>>(msg: S) -> Self {
        Self::PathEmpty(msg.into())
    }

    /// Create a new `GeometryMissing` error.
    pub fn geometry_missing<S: Into<String>>(msg: S) -> Self {
        Self::GeometryMissing(msg.into())
    }

    /// Create a new `ShapeMismatch` error.
    pub fn shape_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create a new `TypeMismatch` error.
    pub fn type_mismatch<S: Into<String>>(msg: S) -> Self {
        Self::TypeMismatch(msg.into())
    }

    /// Create a new `UnsupportedType` error.
    pub fn unsupported_type<S: Into<String>>(msg: S) -> Self {
        Self::UnsupportedType(msg.into())
    }

    /// Create a new `NameCollision` error.
    pub fn name_collision<S: Into<String>>(msg: S) -> Self {
        Self::NameCollision(msg.into())
    }

    /// Create a new `StructuralViolation` error.
    pub fn structural<S: Into<String>>(msg: S) -> Self {
        Self::StructuralViolation(msg.into())
    }

    /// Create a new `InvalidParameter` error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a new `ExecutionError`.
    pub fn execution<S: Into<String>>(msg: S) -> Self {
        Self::ExecutionError(msg.into())
    }

    /// Create a new `Cancelled` error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Create a new `InternalError`.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalError(msg.into())
    }

    /// The diagnostic code recorded when this error reaches a filter's message channel.
    pub fn code(&self) -> i32 {
        match self {
            Self::PathNotFound(_) => codes::PATH_NOT_FOUND,
            Self::PathEmpty(_) => codes::PATH_EMPTY,
            Self::GeometryMissing(_) => codes::GEOMETRY_MISSING,
            Self::ShapeMismatch(_) => codes::TUPLE_MISMATCH,
            Self::TypeMismatch(_) => codes::TYPE_MISMATCH,
            Self::UnsupportedType(_) => codes::UNSUPPORTED_ARRAY_TYPE,
            Self::NameCollision(_) => codes::NAME_COLLISION,
            Self::StructuralViolation(_) => codes::STRUCTURAL_VIOLATION,
            Self::InvalidParameter(_) => codes::INVALID_PARAMETER,
            Self::ExecutionError(_) => codes::EXECUTION_FAILED,
            Self::Cancelled(_) => codes::CANCELLED,
            Self::InternalError(_) => codes::INTERNAL,
            Self::IoError(_) => codes::IO,
            Self::SerdeJsonError(_) => codes::SERDE_JSON,
        }
    }

    /// The taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_code(self.code())
    }

    /// The message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::PathNotFound(m)
            | Self::PathEmpty(m)
            | Self::GeometryMissing(m)
            | Self::ShapeMismatch(m)
            | Self::TypeMismatch(m)
            | Self::UnsupportedType(m)
            | Self::NameCollision(m)
            | Self::StructuralViolation(m)
            | Self::InvalidParameter(m)
            | Self::ExecutionError(m)
            | Self::Cancelled(m)
            | Self::InternalError(m) => m.clone(),
            Self::IoError(e) => e.to_string(),
            Self::SerdeJsonError(e) => e.to_string(),
        }
    }
}

/// Error taxonomy used to classify diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A path does not resolve to an existing object.
    PathResolution,
    /// Tuple count, component or category disagreement.
    ShapeMismatch,
    /// Primitive type is not the one required.
    TypeMismatch,
    /// Output name collides with an incompatible existing object.
    NameCollision,
    /// Data violates a structural invariant.
    StructuralViolation,
    /// A parameter value is invalid.
    InvalidParameter,
    /// Anything else (execution, IO, cancellation, internal).
    Other,
}

impl ErrorKind {
    /// Classify a diagnostic code. Positive codes are classified by magnitude.
    pub fn from_code(code: i32) -> Self {
        match code.unsigned_abs() / 100 {
            1 => Self::PathResolution,
            2 => Self::ShapeMismatch,
            3 => Self::TypeMismatch,
            4 => Self::NameCollision,
            5 => Self::StructuralViolation,
            6 => Self::InvalidParameter,
            _ => Self::Other,
        }
    }
}

/// Return early with an error if a condition does not hold.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::MosaicError::ExecutionError($msg.to_string()));
        }
    };
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::MosaicError::$variant(format!($($msg)*)));
        }
    };
}

/// Return early with a `ShapeMismatch`.
#[macro_export]
macro_rules! shape_err {
    ($($arg:tt)*) => {
        return Err($crate::MosaicError::ShapeMismatch(format!($($arg)*)))
    };
}

/// Return early with a `TypeMismatch`.
#[macro_export]
macro_rules! type_err {
    ($($arg:tt)*) => {
        return Err($crate::MosaicError::TypeMismatch(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MosaicError::type_mismatch("expected uint8, got float32");
        assert_eq!(err.to_string(), "TypeMismatch: expected uint8, got float32");
        assert_eq!(err.message(), "expected uint8, got float32");
    }

    #[test]
    fn test_error_codes_are_negative() {
        let errors = [
            MosaicError::path_not_found("a"),
            MosaicError::shape_mismatch("b"),
            MosaicError::type_mismatch("c"),
            MosaicError::unsupported_type("d"),
            MosaicError::name_collision("e"),
            MosaicError::structural("f"),
            MosaicError::invalid_parameter("g"),
            MosaicError::execution("h"),
            MosaicError::cancelled("i"),
            MosaicError::internal("j"),
        ];
        for err in &errors {
            assert!(err.code() < 0, "{err} should map to a negative code");
        }
    }

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(
            MosaicError::path_not_found("x").kind(),
            ErrorKind::PathResolution
        );
        assert_eq!(
            ErrorKind::from_code(codes::CONNECTIVITY_OUT_OF_RANGE),
            ErrorKind::StructuralViolation
        );
        assert_eq!(
            ErrorKind::from_code(codes::STRUCTURAL_WARNING),
            ErrorKind::StructuralViolation
        );
        assert_eq!(ErrorKind::from_code(codes::CANCELLED), ErrorKind::Other);
    }

    fn checked(n: usize) -> MosaicResult<usize> {
        crate::ensure!(n > 0, InvalidParameter: "n must be positive, got {}", n);
        Ok(n)
    }

    #[test]
    fn test_ensure_macro() {
        assert!(checked(1).is_ok());
        let err = checked(0).unwrap_err();
        assert!(matches!(err, MosaicError::InvalidParameter(_)));
    }
}
