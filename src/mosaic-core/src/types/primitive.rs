//! Compile-time side of the type system.

use std::fmt::Debug;

use crate::array::{AnyArray, DataArray};
use crate::types::DataType;

mod sealed {
    pub trait Sealed {}
}

/// A primitive element type that can be stored in a [`DataArray`].
///
/// The set is closed: it is implemented for exactly the eleven types listed
/// in [`DataType::ALL`], which lets [`AnyArray`] be a plain enum.
pub trait Primitive:
    Copy + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static + sealed::Sealed
{
    /// Runtime tag for this type.
    const DATA_TYPE: DataType;

    /// Lossy conversion to `f64` (`true` is 1.0).
    fn to_f64(self) -> f64;

    /// Conversion from `f64`. Integers round to nearest and saturate at the
    /// type bounds; NaN maps to zero.
    fn from_f64(value: f64) -> Self;

    /// Exact integer value for integer and boolean types, `None` for floats.
    fn to_i128(self) -> Option<i128>;

    /// Conversion from an integer. Integers saturate at the type bounds,
    /// floats round to nearest, booleans are `true` for non-zero values.
    fn from_i128(value: i128) -> Self;

    /// Convert to another element type. Integer to integer conversions are
    /// exact up to saturation; anything involving a float goes through `f64`.
    fn cast<T: Primitive>(self) -> T {
        match self.to_i128() {
            Some(v) => T::from_i128(v),
            None => T::from_f64(self.to_f64()),
        }
    }

    /// Append the little-endian encoding of `self`.
    fn extend_le_bytes(self, out: &mut Vec<u8>);

    /// Decode from exactly `DATA_TYPE.size_of()` little-endian bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;

    /// Wrap a typed array into the type-erased enum.
    fn into_any(array: DataArray<Self>) -> AnyArray;

    /// Borrow the typed array if the tag matches.
    fn as_typed(array: &AnyArray) -> Option<&DataArray<Self>>;

    /// Mutably borrow the typed array if the tag matches.
    fn as_typed_mut(array: &mut AnyArray) -> Option<&mut DataArray<Self>>;

    /// Unwrap the typed array if the tag matches, otherwise hand the input back.
    fn into_typed(array: AnyArray) -> Result<DataArray<Self>, AnyArray>;
}

macro_rules! impl_variant_access {
    ($variant:ident) => {
        fn into_any(array: DataArray<Self>) -> AnyArray {
            AnyArray::$variant(array)
        }

        fn as_typed(array: &AnyArray) -> Option<&DataArray<Self>> {
            match array {
                AnyArray::$variant(a) => Some(a),
                _ => None,
            }
        }

        fn as_typed_mut(array: &mut AnyArray) -> Option<&mut DataArray<Self>> {
            match array {
                AnyArray::$variant(a) => Some(a),
                _ => None,
            }
        }

        fn into_typed(array: AnyArray) -> Result<DataArray<Self>, AnyArray> {
            match array {
                AnyArray::$variant(a) => Ok(a),
                other => Err(other),
            }
        }
    };
}

macro_rules! impl_integer {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl Primitive for $t {
            const DATA_TYPE: DataType = DataType::$variant;

            #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn from_f64(value: f64) -> Self {
                // `as` saturates at the bounds and maps NaN to zero.
                value.round() as $t
            }

            fn to_i128(self) -> Option<i128> {
                Some(i128::from(self))
            }

            fn from_i128(value: i128) -> Self {
                <$t>::try_from(value).unwrap_or(if value < 0 { <$t>::MIN } else { <$t>::MAX })
            }

            fn extend_le_bytes(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(bytes);
                <$t>::from_le_bytes(raw)
            }

            impl_variant_access!($variant);
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl Primitive for $t {
            const DATA_TYPE: DataType = DataType::$variant;

            #[allow(clippy::cast_lossless)]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[allow(clippy::cast_possible_truncation)]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            fn to_i128(self) -> Option<i128> {
                None
            }

            #[allow(clippy::cast_precision_loss)]
            fn from_i128(value: i128) -> Self {
                value as $t
            }

            fn extend_le_bytes(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(bytes);
                <$t>::from_le_bytes(raw)
            }

            impl_variant_access!($variant);
        }
    )*};
}

impl_integer! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
}

impl_float! {
    f32 => Float32,
    f64 => Float64,
}

impl sealed::Sealed for bool {}

impl Primitive for bool {
    const DATA_TYPE: DataType = DataType::Bool;

    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn from_f64(value: f64) -> Self {
        value != 0.0 && !value.is_nan()
    }

    fn to_i128(self) -> Option<i128> {
        Some(i128::from(self))
    }

    fn from_i128(value: i128) -> Self {
        value != 0
    }

    fn extend_le_bytes(self, out: &mut Vec<u8>) {
        out.push(u8::from(self));
    }

    fn from_le_slice(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    impl_variant_access!(Bool);
}
