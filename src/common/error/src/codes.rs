//! Stable diagnostic codes.
//!
//! Error codes are negative, warning codes are positive, and zero means
//! "no error". Codes are grouped by [`ErrorKind`](crate::ErrorKind) in blocks of 100.

/// No error recorded.
pub const NO_ERROR: i32 = 0;

/// A container, matrix or array path did not resolve.
pub const PATH_NOT_FOUND: i32 = -100;
/// A path was empty where a name was required.
pub const PATH_EMPTY: i32 = -101;
/// A geometry was required but the container has none.
pub const GEOMETRY_MISSING: i32 = -102;

/// Tuple count disagreement.
pub const TUPLE_MISMATCH: i32 = -200;
/// Component dimension disagreement.
pub const COMPONENT_MISMATCH: i32 = -201;
/// Matrix category is not compatible with the requested use.
pub const CATEGORY_MISMATCH: i32 = -202;

/// Array has a different primitive type than the consumer requires.
pub const TYPE_MISMATCH: i32 = -300;
/// The type dispatcher found no supported type for an array.
pub const UNSUPPORTED_ARRAY_TYPE: i32 = -301;

/// An object with the same name exists and is incompatible.
pub const NAME_COLLISION: i32 = -400;

/// Geometry or bounds data violate a structural invariant.
pub const STRUCTURAL_VIOLATION: i32 = -500;
/// Connectivity references a vertex that does not exist.
pub const CONNECTIVITY_OUT_OF_RANGE: i32 = -501;
/// Rectilinear grid bounds are not monotonic.
pub const BOUNDS_NOT_MONOTONIC: i32 = -502;

/// A filter parameter is invalid.
pub const INVALID_PARAMETER: i32 = -600;

/// Generic execution failure.
pub const EXECUTION_FAILED: i32 = -700;
/// Execution was cancelled.
pub const CANCELLED: i32 = -800;
/// Internal invariant broken.
pub const INTERNAL: i32 = -900;
/// IO failure.
pub const IO: i32 = -1000;
/// JSON (de)serialization failure.
pub const SERDE_JSON: i32 = -1001;

/// Warning: structural issue recorded as a warning.
pub const STRUCTURAL_WARNING: i32 = 500;
/// Warning: an existing array was replaced.
pub const ARRAY_REPLACED: i32 = 400;
/// Warning: a value was clamped to the target type range.
pub const VALUE_CLAMPED: i32 = 700;
