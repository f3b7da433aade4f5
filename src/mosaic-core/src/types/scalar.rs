//! Scalar parameter values.

use serde::{Deserialize, Serialize};

use crate::types::{DataType, Primitive};

/// A scalar supplied through configuration, e.g. an initialization value.
///
/// Scalars are converted to the concrete element type only once the target
/// array type is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point.
    Float(f64),
    /// Boolean.
    Bool(bool),
}

impl Scalar {
    /// Value as `f64`.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(v) => v as f64,
            Self::UInt(v) => v as f64,
            Self::Float(v) => v,
            Self::Bool(v) => bool::to_f64(v),
        }
    }

    /// Convert to the element type `T`.
    ///
    /// Integers convert exactly up to saturation; floats go through `f64`.
    pub fn to_primitive<T: Primitive>(&self) -> T {
        match *self {
            Self::Int(v) => T::from_i128(i128::from(v)),
            Self::UInt(v) => T::from_i128(i128::from(v)),
            Self::Float(v) => T::from_f64(v),
            Self::Bool(v) => T::from_i128(i128::from(v)),
        }
    }

    /// Check whether the value is representable in `ty` without clamping.
    pub fn fits(&self, ty: DataType) -> bool {
        let (min, max) = match ty {
            DataType::Int8 => (f64::from(i8::MIN), f64::from(i8::MAX)),
            DataType::UInt8 => (0.0, f64::from(u8::MAX)),
            DataType::Int16 => (f64::from(i16::MIN), f64::from(i16::MAX)),
            DataType::UInt16 => (0.0, f64::from(u16::MAX)),
            DataType::Int32 => (f64::from(i32::MIN), f64::from(i32::MAX)),
            DataType::UInt32 => (0.0, f64::from(u32::MAX)),
            DataType::Int64 => {
                return match *self {
                    Self::UInt(v) => i64::try_from(v).is_ok(),
                    Self::Float(v) => v.is_finite() && v.fract() == 0.0,
                    Self::Int(_) | Self::Bool(_) => true,
                }
            }
            DataType::UInt64 => {
                return match *self {
                    Self::Int(v) => v >= 0,
                    Self::Float(v) => v.is_finite() && v >= 0.0 && v.fract() == 0.0,
                    Self::UInt(_) | Self::Bool(_) => true,
                }
            }
            DataType::Float32 => {
                let v = self.as_f64();
                return !v.is_finite() || v.abs() <= f64::from(f32::MAX);
            }
            DataType::Float64 | DataType::Bool => return true,
        };
        let v = self.as_f64();
        let integral = !matches!(self, Self::Float(f) if f.fract() != 0.0);
        integral && v >= min && v <= max
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_primitive() {
        assert_eq!(Scalar::Int(7).to_primitive::<u8>(), 7u8);
        assert_eq!(Scalar::Float(2.5).to_primitive::<f32>(), 2.5f32);
        assert_eq!(Scalar::Int(i64::MAX).to_primitive::<i64>(), i64::MAX);
        assert_eq!(Scalar::UInt(u64::MAX).to_primitive::<u64>(), u64::MAX);
        assert!(Scalar::Bool(true).to_primitive::<bool>());
        assert_eq!(Scalar::Int(-1).to_primitive::<u16>(), 0);
    }

    #[test]
    fn test_fits() {
        assert!(Scalar::Int(255).fits(DataType::UInt8));
        assert!(!Scalar::Int(256).fits(DataType::UInt8));
        assert!(!Scalar::Int(-1).fits(DataType::UInt32));
        assert!(!Scalar::Float(1.5).fits(DataType::Int16));
        assert!(Scalar::Float(1.5).fits(DataType::Float32));
        assert!(!Scalar::UInt(u64::MAX).fits(DataType::Int64));
        assert!(Scalar::Int(3).fits(DataType::Bool));
    }
}
