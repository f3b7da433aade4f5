//! Dynamic dispatch from runtime type tags to monomorphized code.
//!
//! An algorithm written once as a generic `visit::<T>` is instantiated for
//! every primitive type. At run time the array's tag selects the instance.
//! Tags are checked in the fixed order int8, uint8, int16, uint16, int32,
//! uint32, int64, uint64, float, double, bool.
//!
//! ```text
//! AnyArray ──tag──▶ supported? ──no──▶ UNSUPPORTED_ARRAY_TYPE diagnostic
//!                        │
//!                       yes
//!                        ▼
//!               visitor.visit::<T>(&DataArray<T>)
//! ```

use std::fmt;

use mosaic_core::{with_primitive_type, match_any_array};
use mosaic_core::{AnyArray, DataArray, DataArrayPath, DataType, Primitive};

use common_error::codes;

use crate::context::FilterContext;

/// A set of primitive types an algorithm supports.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeSet(u16);

impl TypeSet {
    /// Every primitive type.
    pub const ALL: Self = Self(0x07FF);
    /// Every type except bool.
    pub const NUMERIC: Self = Self(0x03FF);
    /// Signed and unsigned integers.
    pub const INTEGER: Self = Self(0x00FF);
    /// float and double.
    pub const FLOAT: Self = Self(0x0300);
    /// No types.
    pub const EMPTY: Self = Self(0);

    const fn bit(data_type: DataType) -> u16 {
        1 << data_type as u16
    }

    /// Set containing exactly `types`.
    pub fn of(types: &[DataType]) -> Self {
        Self(types.iter().fold(0, |acc, t| acc | Self::bit(*t)))
    }

    /// This set plus `data_type`.
    pub const fn with(self, data_type: DataType) -> Self {
        Self(self.0 | Self::bit(data_type))
    }

    /// This set without `data_type`.
    pub const fn without(self, data_type: DataType) -> Self {
        Self(self.0 & !Self::bit(data_type))
    }

    /// Check membership.
    pub const fn contains(self, data_type: DataType) -> bool {
        self.0 & Self::bit(data_type) != 0
    }

    /// Members in dispatch order.
    pub fn types(self) -> Vec<DataType> {
        DataType::ALL.into_iter().filter(|t| self.contains(*t)).collect()
    }
}

impl fmt::Debug for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.types()).finish()
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.types().into_iter().map(DataType::name).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Read-only algorithm over a typed array.
pub trait ArrayVisitor {
    type Output;

    /// Types this visitor handles.
    fn supported(&self) -> TypeSet {
        TypeSet::ALL
    }

    fn visit<T: Primitive>(&mut self, array: &DataArray<T>) -> Self::Output;
}

/// Mutating algorithm over a typed array.
pub trait ArrayVisitorMut {
    type Output;

    /// Types this visitor handles.
    fn supported(&self) -> TypeSet {
        TypeSet::ALL
    }

    fn visit_mut<T: Primitive>(&mut self, array: &mut DataArray<T>) -> Self::Output;
}

/// Algorithm selected by a type tag alone, without an array.
pub trait TypeVisitor {
    type Output;

    /// Types this visitor handles.
    fn supported(&self) -> TypeSet {
        TypeSet::ALL
    }

    fn visit_type<T: Primitive>(&mut self) -> Self::Output;
}

fn unsupported(ctx: &mut FilterContext, path: &DataArrayPath, data_type: DataType, set: TypeSet) {
    ctx.set_error(
        codes::UNSUPPORTED_ARRAY_TYPE,
        format!(
            "data array '{path}' has type {data_type}, which is not one of the supported types {set}"
        ),
    );
}

/// Run `visitor` on `array` instantiated for its element type.
///
/// Returns `None` after recording exactly one `UNSUPPORTED_ARRAY_TYPE`
/// error if the array's type is outside [`ArrayVisitor::supported`].
pub fn dispatch<V: ArrayVisitor>(
    array: &AnyArray,
    path: &DataArrayPath,
    ctx: &mut FilterContext,
    visitor: &mut V,
) -> Option<V::Output> {
    let set = visitor.supported();
    if !set.contains(array.data_type()) {
        unsupported(ctx, path, array.data_type(), set);
        return None;
    }
    Some(match_any_array!(array, a => visitor.visit(a)))
}

/// Run a mutating `visitor` on `array` instantiated for its element type.
pub fn dispatch_mut<V: ArrayVisitorMut>(
    array: &mut AnyArray,
    path: &DataArrayPath,
    ctx: &mut FilterContext,
    visitor: &mut V,
) -> Option<V::Output> {
    let set = visitor.supported();
    let data_type = array.data_type();
    if !set.contains(data_type) {
        unsupported(ctx, path, data_type, set);
        return None;
    }
    Some(match_any_array!(array, a => visitor.visit_mut(a)))
}

/// Run `visitor` instantiated for `data_type`.
pub fn dispatch_type<V: TypeVisitor>(
    data_type: DataType,
    path: &DataArrayPath,
    ctx: &mut FilterContext,
    visitor: &mut V,
) -> Option<V::Output> {
    let set = visitor.supported();
    if !set.contains(data_type) {
        unsupported(ctx, path, data_type, set);
        return None;
    }
    Some(with_primitive_type!(data_type, T => visitor.visit_type::<T>()))
}

/// Run `visitor` for the type named `type_name`.
///
/// An unknown name is reported like an unsupported type.
pub fn dispatch_type_name<V: TypeVisitor>(
    type_name: &str,
    path: &DataArrayPath,
    ctx: &mut FilterContext,
    visitor: &mut V,
) -> Option<V::Output> {
    match DataType::from_name(type_name) {
        Some(data_type) => dispatch_type(data_type, path, ctx, visitor),
        None => {
            ctx.set_error(
                codes::UNSUPPORTED_ARRAY_TYPE,
                format!(
                    "'{type_name}' is not a known array type for '{path}'; expected one of {}",
                    visitor.supported()
                ),
            );
            None
        }
    }
}
