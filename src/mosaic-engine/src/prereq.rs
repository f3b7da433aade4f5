//! Prerequisite resolution and output creation for `data_check`.
//!
//! The `get_prereq_*` functions resolve inputs and record a diagnostic for
//! every failed check, returning `None`. The `create_non_prereq_*` functions
//! create outputs sized from the registry without touching existing buffers.
//!
//! Creation is idempotent: an existing object with a compatible shape is
//! reused as is, so validating twice leaves the same structure. An existing
//! object with an incompatible shape is handled per [`ArrayInsertPolicy`].

use common_config::ArrayInsertPolicy;
use common_display::format_dims;
use common_error::codes;
use mosaic_core::{
    AnyArray, AttributeMatrix, AttributeMatrixType, DataArray, DataArrayPath, DataContainer,
    DataContainerArray, DataType, Geometry, Primitive,
};

use crate::context::FilterContext;
use crate::dispatch::TypeSet;

/// Checks applied to a prerequisite array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayRequirement {
    /// Accepted element types.
    pub types: TypeSet,
    /// Required component dimensions, if constrained.
    pub component_dims: Option<Vec<usize>>,
}

impl ArrayRequirement {
    /// Accept any array.
    pub fn any() -> Self {
        Self {
            types: TypeSet::ALL,
            component_dims: None,
        }
    }

    /// Accept arrays whose type is in `types`.
    pub fn of_types(types: TypeSet) -> Self {
        Self {
            types,
            component_dims: None,
        }
    }

    /// Also require exactly these component dimensions.
    pub fn with_component_dims(mut self, dims: &[usize]) -> Self {
        self.component_dims = Some(dims.to_vec());
        self
    }
}

impl Default for ArrayRequirement {
    fn default() -> Self {
        Self::any()
    }
}

/// Resolve a required container.
pub fn get_prereq_container<'a>(
    registry: &'a DataContainerArray,
    ctx: &mut FilterContext,
    path: &DataArrayPath,
) -> Option<&'a DataContainer> {
    ctx.check(registry.resolve_container(path))
}

/// Resolve the geometry of a required container.
pub fn get_prereq_geometry<'a>(
    registry: &'a DataContainerArray,
    ctx: &mut FilterContext,
    path: &DataArrayPath,
) -> Option<&'a Geometry> {
    ctx.check(registry.resolve_geometry(path))
}

/// Resolve a required matrix, optionally checking its category.
pub fn get_prereq_matrix<'a>(
    registry: &'a DataContainerArray,
    ctx: &mut FilterContext,
    path: &DataArrayPath,
    category: Option<AttributeMatrixType>,
) -> Option<&'a AttributeMatrix> {
    let matrix = ctx.check(registry.resolve_matrix(path))?;
    match category {
        Some(expected) if matrix.category() != expected => {
            ctx.set_error(
                codes::CATEGORY_MISMATCH,
                format!(
                    "attribute matrix '{}' is a {} matrix, expected {expected}",
                    path.matrix_path(),
                    matrix.category()
                ),
            );
            None
        }
        _ => Some(matrix),
    }
}

/// Resolve a required array and check its type and component shape.
pub fn get_prereq_array<'a>(
    registry: &'a DataContainerArray,
    ctx: &mut FilterContext,
    path: &DataArrayPath,
    requirement: &ArrayRequirement,
) -> Option<&'a AnyArray> {
    let array = ctx.check(registry.resolve_array(path))?;
    if !requirement.types.contains(array.data_type()) {
        ctx.set_error(
            codes::TYPE_MISMATCH,
            format!(
                "data array '{path}' has type {}, expected one of {}",
                array.data_type(),
                requirement.types
            ),
        );
        return None;
    }
    if let Some(dims) = &requirement.component_dims {
        if array.component_dims() != dims.as_slice() {
            ctx.set_error(
                codes::COMPONENT_MISMATCH,
                format!(
                    "data array '{path}' has component dimensions {}, expected {}",
                    format_dims(array.component_dims()),
                    format_dims(dims)
                ),
            );
            return None;
        }
    }
    Some(array)
}

/// Resolve a required array of element type `T`.
pub fn get_prereq_typed<'a, T: Primitive>(
    registry: &'a DataContainerArray,
    ctx: &mut FilterContext,
    path: &DataArrayPath,
    component_dims: Option<&[usize]>,
) -> Option<&'a DataArray<T>> {
    let mut requirement = ArrayRequirement::of_types(TypeSet::of(&[T::DATA_TYPE]));
    if let Some(dims) = component_dims {
        requirement = requirement.with_component_dims(dims);
    }
    get_prereq_array(registry, ctx, path, &requirement)?.downcast_ref::<T>()
}

/// Check that all `paths` resolve to arrays with the same tuple count.
pub fn check_tuple_agreement(
    registry: &DataContainerArray,
    ctx: &mut FilterContext,
    paths: &[DataArrayPath],
) -> bool {
    let mut expected: Option<(usize, &DataArrayPath)> = None;
    for path in paths {
        let Some(array) = ctx.check(registry.resolve_array(path)) else {
            return false;
        };
        match expected {
            None => expected = Some((array.num_tuples(), path)),
            Some((n, first)) if n != array.num_tuples() => {
                ctx.set_error(
                    codes::TUPLE_MISMATCH,
                    format!(
                        "data array '{path}' has {} tuples but '{first}' has {n}",
                        array.num_tuples()
                    ),
                );
                return false;
            }
            Some(_) => {}
        }
    }
    true
}

/// Ensure a container named `name` exists, creating an empty one if not.
pub fn create_non_prereq_container(
    registry: &mut DataContainerArray,
    ctx: &mut FilterContext,
    name: &str,
) -> bool {
    if name.is_empty() {
        ctx.set_error(codes::PATH_EMPTY, "data container name must not be empty");
        return false;
    }
    if registry.contains_container(name) {
        return true;
    }
    ctx.check(registry.add_container(DataContainer::new(name)))
        .is_some()
}

/// Ensure the matrix at `path` exists with `tuple_dims` and `category`.
pub fn create_non_prereq_matrix(
    registry: &mut DataContainerArray,
    ctx: &mut FilterContext,
    path: &DataArrayPath,
    tuple_dims: &[usize],
    category: AttributeMatrixType,
) -> bool {
    if let Err(e) = path.require_matrix() {
        ctx.record(&e);
        return false;
    }
    if ctx.check(AttributeMatrix::tuple_count(tuple_dims)).is_none() {
        return false;
    }
    let policy = ctx.insert_policy();
    let Some(container) = ctx.check(registry.resolve_container_mut(path)) else {
        return false;
    };

    if let Some(existing) = container.matrix(&path.matrix) {
        if existing.category() == category && existing.tuple_dims() == tuple_dims {
            return true;
        }
        let message = format!(
            "attribute matrix '{}' already exists as {} {}, requested {category} {}",
            path.matrix_path(),
            existing.category(),
            format_dims(existing.tuple_dims()),
            format_dims(tuple_dims)
        );
        match policy {
            ArrayInsertPolicy::RejectIncompatible => {
                ctx.set_error(codes::NAME_COLLISION, message);
                return false;
            }
            ArrayInsertPolicy::Replace => {
                ctx.set_warning(codes::ARRAY_REPLACED, message);
                let matrix = AttributeMatrix::new(&path.matrix, tuple_dims.to_vec(), category);
                return ctx.check(container.insert_or_assign_matrix(matrix)).is_some();
            }
        }
    }

    let matrix = AttributeMatrix::new(&path.matrix, tuple_dims.to_vec(), category);
    ctx.check(container.add_matrix(matrix)).is_some()
}

/// Ensure the array at `path` exists with `data_type` and `component_dims`,
/// sized to its matrix. New arrays are zero-filled.
pub fn create_non_prereq_array(
    registry: &mut DataContainerArray,
    ctx: &mut FilterContext,
    path: &DataArrayPath,
    data_type: DataType,
    component_dims: &[usize],
) -> bool {
    if let Err(e) = path.require_array() {
        ctx.record(&e);
        return false;
    }
    let policy = ctx.insert_policy();
    let Some(matrix) = ctx.check(registry.resolve_matrix_mut(path)) else {
        return false;
    };

    if let Some(existing) = matrix.array(&path.array) {
        if existing.is_compatible_with(data_type, component_dims) {
            return true;
        }
        let message = format!(
            "data array '{path}' already exists as {}, requested {data_type} x{}",
            existing.describe(),
            format_dims(component_dims)
        );
        match policy {
            ArrayInsertPolicy::RejectIncompatible => {
                ctx.set_error(codes::NAME_COLLISION, message);
                return false;
            }
            ArrayInsertPolicy::Replace => ctx.set_warning(codes::ARRAY_REPLACED, message),
        }
    }

    let num_tuples = matrix.num_tuples();
    let Some(array) = ctx.check(AnyArray::create(
        data_type,
        &path.array,
        num_tuples,
        component_dims,
    )) else {
        return false;
    };
    ctx.check(matrix.insert_or_assign(array)).is_some()
}
