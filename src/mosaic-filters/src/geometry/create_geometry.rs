//! Construct a geometry on a data container from existing arrays.

use log::debug;
use serde::{Deserialize, Serialize};

use common_error::{codes, MosaicError, MosaicResult};
use mosaic_core::array::checked_product;
use mosaic_core::geometry::{check_bounds, check_connectivity, ImageGeometry, SHARED_VERTEX_LIST};
use mosaic_core::{
    AnyArray, DataArray, DataArrayPath, DataContainerArray, DataType, ElementKind, Geometry,
    GeometryIssue, GeometryKind, Primitive,
};
use mosaic_engine::prereq::{create_non_prereq_matrix, get_prereq_container, get_prereq_typed};
use mosaic_engine::{Filter, FilterContext};

/// What happens to the source arrays when the geometry takes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrayHandling {
    /// Deep copy the sources, leaving them in place.
    #[default]
    Copy,
    /// Remove the sources from their matrices.
    Move,
}

/// Geometry to build and the arrays it is built from.
///
/// Vertex lists are `float32 x[3]`, grid bounds are `float32 x[1]` and
/// connectivity lists are `int64` with one component per element corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GeometrySource {
    Image {
        dimensions: [usize; 3],
        #[serde(default)]
        origin: [f32; 3],
        #[serde(default = "unit_spacing")]
        spacing: [f32; 3],
    },
    RectGrid {
        x_bounds: DataArrayPath,
        y_bounds: DataArrayPath,
        z_bounds: DataArrayPath,
    },
    Vertex {
        vertices: DataArrayPath,
    },
    Edge {
        vertices: DataArrayPath,
        edges: DataArrayPath,
    },
    Triangle {
        vertices: DataArrayPath,
        triangles: DataArrayPath,
    },
    Quad {
        vertices: DataArrayPath,
        quads: DataArrayPath,
    },
    Tetrahedral {
        vertices: DataArrayPath,
        tetrahedra: DataArrayPath,
    },
    Hexahedral {
        vertices: DataArrayPath,
        hexahedra: DataArrayPath,
    },
}

fn unit_spacing() -> [f32; 3] {
    [1.0; 3]
}

impl GeometrySource {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Image { .. } => GeometryKind::Image,
            Self::RectGrid { .. } => GeometryKind::RectGrid,
            Self::Vertex { .. } => GeometryKind::Vertex,
            Self::Edge { .. } => GeometryKind::Edge,
            Self::Triangle { .. } => GeometryKind::Triangle,
            Self::Quad { .. } => GeometryKind::Quad,
            Self::Tetrahedral { .. } => GeometryKind::Tetrahedral,
            Self::Hexahedral { .. } => GeometryKind::Hexahedral,
        }
    }

    /// Vertex list and connectivity list of mesh kinds.
    fn mesh_parts(&self) -> Option<(&DataArrayPath, &DataArrayPath)> {
        match self {
            Self::Edge { vertices, edges: c }
            | Self::Triangle { vertices, triangles: c }
            | Self::Quad { vertices, quads: c }
            | Self::Tetrahedral { vertices, tetrahedra: c }
            | Self::Hexahedral { vertices, hexahedra: c } => Some((vertices, c)),
            _ => None,
        }
    }

    /// Every array the geometry is built from.
    pub fn source_paths(&self) -> Vec<DataArrayPath> {
        self.typed_sources().into_iter().map(|(p, _)| p.clone()).collect()
    }

    fn typed_sources(&self) -> Vec<(&DataArrayPath, DataType)> {
        match self {
            Self::Image { .. } => Vec::new(),
            Self::RectGrid {
                x_bounds,
                y_bounds,
                z_bounds,
            } => [x_bounds, y_bounds, z_bounds]
                .map(|p| (p, DataType::Float32))
                .to_vec(),
            Self::Vertex { vertices } => vec![(vertices, DataType::Float32)],
            _ => self
                .mesh_parts()
                .map(|(v, c)| vec![(v, DataType::Float32), (c, DataType::Int64)])
                .unwrap_or_default(),
        }
    }
}

/// Where the geometry arrays come from while it is assembled.
enum Sources<'a> {
    /// Deep copies out of the registry.
    Borrowed(&'a DataContainerArray),
    /// Arrays already detached from their matrices.
    Taken(Vec<(DataArrayPath, AnyArray)>),
}

impl Sources<'_> {
    fn get<T: Primitive>(&mut self, path: &DataArrayPath, name: &str) -> MosaicResult<DataArray<T>> {
        match self {
            Self::Borrowed(registry) => Ok(registry.resolve_typed::<T>(path)?.deep_copy(name)),
            Self::Taken(taken) => {
                let idx = taken.iter().position(|(p, _)| p == path).ok_or_else(|| {
                    MosaicError::internal(format!("data array '{path}' was not detached"))
                })?;
                let (_, array) = taken.swap_remove(idx);
                let mut array = array.into_typed::<T>().map_err(|other| {
                    MosaicError::type_mismatch(format!(
                        "data array '{path}' has type {}, expected {}",
                        other.data_type(),
                        T::DATA_TYPE
                    ))
                })?;
                array.set_name(name);
                Ok(array)
            }
        }
    }
}

/// Shape of the geometry as seen during validation.
struct GeometryShape {
    kind: GeometryKind,
    num_vertices: usize,
    element_dims: Vec<usize>,
}

impl GeometryShape {
    fn element_count(&self, element: ElementKind) -> Option<usize> {
        if element == ElementKind::Vertex {
            return Some(self.num_vertices);
        }
        (self.kind.primary_element() == element).then(|| self.element_dims.iter().product())
    }
}

/// Builds a geometry for a container that has none and creates the
/// attribute matrix for its primary elements.
///
/// The geometry is a structural change, so it is attached during
/// validation and later filters see it in preflight. The source arrays are
/// checked in place first (connectivity in range, monotonic bounds,
/// positive spacing) and nothing is touched unless every check passes.
/// Validating again once the geometry is attached is a no-op.
///
/// With `strict_topology` off, out-of-range connectivity and
/// non-monotonic bounds are recorded as warnings and the geometry is
/// attached anyway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGeometry {
    pub container: String,
    pub geometry: GeometrySource,
    #[serde(default)]
    pub array_handling: ArrayHandling,
    /// Name of the element matrix; defaults to `CellData`, `FaceData`,
    /// `EdgeData` or `VertexData` after the primary element.
    #[serde(default)]
    pub element_matrix_name: Option<String>,
    #[serde(default = "strict")]
    pub strict_topology: bool,
}

fn strict() -> bool {
    true
}

impl CreateGeometry {
    pub fn new(container: impl Into<String>, geometry: GeometrySource) -> Self {
        Self {
            container: container.into(),
            geometry,
            array_handling: ArrayHandling::Copy,
            element_matrix_name: None,
            strict_topology: true,
        }
    }

    pub fn with_strict_topology(mut self, strict: bool) -> Self {
        self.strict_topology = strict;
        self
    }

    pub fn with_array_handling(mut self, handling: ArrayHandling) -> Self {
        self.array_handling = handling;
        self
    }

    pub fn with_element_matrix_name(mut self, name: impl Into<String>) -> Self {
        self.element_matrix_name = Some(name.into());
        self
    }

    /// Path of the element matrix this filter creates.
    pub fn element_matrix_path(&self) -> DataArrayPath {
        let name = self.element_matrix_name.clone().unwrap_or_else(|| {
            match self.geometry.kind().primary_element() {
                ElementKind::Vertex => "VertexData",
                ElementKind::Edge => "EdgeData",
                ElementKind::Face => "FaceData",
                ElementKind::Cell => "CellData",
            }
            .to_string()
        });
        DataArrayPath::matrix_only(self.container.clone(), name)
    }

    /// Record `issue`, downgrading data-dependent topology errors to
    /// warnings when topology checks are lenient.
    fn record_issue(&self, ctx: &mut FilterContext, issue: &GeometryIssue) {
        let topology = [codes::CONNECTIVITY_OUT_OF_RANGE, codes::BOUNDS_NOT_MONOTONIC]
            .contains(&-issue.code.abs());
        if issue.is_error() && topology && !self.strict_topology {
            ctx.set_warning(issue.code, issue.message.clone());
        } else {
            ctx.record_issue(issue);
        }
    }

    /// Check the sources and work out the resulting shape. Issues found in
    /// the source data are recorded on `ctx`.
    fn inspect(&self, registry: &DataContainerArray, ctx: &mut FilterContext) -> Option<GeometryShape> {
        let kind = self.geometry.kind();
        let start = ctx.diagnostics().len();
        let shape = match &self.geometry {
            GeometrySource::Image {
                dimensions,
                origin,
                spacing,
            } => {
                let image = ImageGeometry::new(*dimensions)
                    .with_origin(*origin)
                    .with_spacing(*spacing);
                let num_vertices = image.num_vertices();
                for issue in Geometry::Image(image).validate() {
                    self.record_issue(ctx, &issue);
                }
                GeometryShape {
                    kind,
                    num_vertices,
                    element_dims: dimensions.to_vec(),
                }
            }
            GeometrySource::RectGrid {
                x_bounds,
                y_bounds,
                z_bounds,
            } => {
                let mut lens = Vec::with_capacity(3);
                for (axis, path) in [("x", x_bounds), ("y", y_bounds), ("z", z_bounds)] {
                    let bounds = get_prereq_typed::<f32>(registry, ctx, path, Some(&[1]))?;
                    for issue in check_bounds(axis, bounds.as_slice(), 1) {
                        self.record_issue(ctx, &issue);
                    }
                    lens.push(bounds.len());
                }
                GeometryShape {
                    kind,
                    num_vertices: ctx.check(checked_product(&lens))?,
                    element_dims: lens.iter().map(|n| n.saturating_sub(1)).collect(),
                }
            }
            GeometrySource::Vertex { vertices } => {
                let verts = get_prereq_typed::<f32>(registry, ctx, vertices, Some(&[3]))?;
                GeometryShape {
                    kind,
                    num_vertices: verts.num_tuples(),
                    element_dims: vec![verts.num_tuples()],
                }
            }
            _ => {
                let (vertices, connectivity) = self.geometry.mesh_parts()?;
                let width = kind.connectivity_width()?;
                let verts = get_prereq_typed::<f32>(registry, ctx, vertices, Some(&[3]))?;
                let conn = get_prereq_typed::<i64>(registry, ctx, connectivity, Some(&[width]))?;
                let label = format!("connectivity list '{connectivity}'");
                for issue in check_connectivity(&label, conn.as_slice(), width, verts.num_tuples()) {
                    self.record_issue(ctx, &issue);
                }
                GeometryShape {
                    kind,
                    num_vertices: verts.num_tuples(),
                    element_dims: vec![conn.num_tuples()],
                }
            }
        };
        let failed = ctx.diagnostics()[start..].iter().any(|d| d.is_error());
        (!failed).then_some(shape)
    }

    /// Element-bound matrices already in the container must agree with the
    /// new geometry.
    fn check_existing_matrices(
        &self,
        registry: &DataContainerArray,
        ctx: &mut FilterContext,
        shape: &GeometryShape,
    ) -> bool {
        let Some(container) = registry.container(&self.container) else {
            return false;
        };
        for matrix in container.matrices() {
            let Some(element) = matrix.category().element_kind() else {
                continue;
            };
            match shape.element_count(element) {
                Some(n) if n == matrix.num_tuples() => {}
                expected => {
                    let expected = expected.map_or_else(|| format!("no {element} elements"), |n| n.to_string());
                    ctx.set_error(
                        codes::TUPLE_MISMATCH,
                        format!(
                            "{} attribute matrix '{}' has {} tuples but the new {} defines {expected}",
                            matrix.category(),
                            matrix.name(),
                            matrix.num_tuples(),
                            shape.kind
                        ),
                    );
                    return false;
                }
            }
        }
        true
    }

    fn build(&self, sources: &mut Sources<'_>) -> MosaicResult<Geometry> {
        let kind = self.geometry.kind();
        match &self.geometry {
            GeometrySource::Image {
                dimensions,
                origin,
                spacing,
            } => Ok(Geometry::Image(
                ImageGeometry::new(*dimensions)
                    .with_origin(*origin)
                    .with_spacing(*spacing),
            )),
            GeometrySource::RectGrid {
                x_bounds,
                y_bounds,
                z_bounds,
            } => {
                let x = sources.get::<f32>(x_bounds, "xBounds")?;
                let y = sources.get::<f32>(y_bounds, "yBounds")?;
                let z = sources.get::<f32>(z_bounds, "zBounds")?;
                Ok(Geometry::rect_grid(x, y, z))
            }
            GeometrySource::Vertex { vertices } => {
                Ok(Geometry::vertex(sources.get::<f32>(vertices, SHARED_VERTEX_LIST)?))
            }
            _ => {
                let (vertices, connectivity) = self
                    .geometry
                    .mesh_parts()
                    .ok_or_else(|| MosaicError::internal(format!("{kind} has no mesh sources")))?;
                let conn_name = kind.connectivity_name().unwrap_or("Connectivity");
                let verts = sources.get::<f32>(vertices, SHARED_VERTEX_LIST)?;
                let conn = sources.get::<i64>(connectivity, conn_name)?;
                Geometry::mesh(kind, verts, conn)
            }
        }
    }

    /// Build the geometry, detaching the sources in move mode. Every source
    /// is resolved and type checked before the first one is detached.
    fn assemble(&self, registry: &mut DataContainerArray) -> MosaicResult<Geometry> {
        if self.array_handling == ArrayHandling::Copy {
            return self.build(&mut Sources::Borrowed(&*registry));
        }
        let sources = self.geometry.typed_sources();
        for (path, data_type) in &sources {
            let array = registry.resolve_array(path)?;
            if array.data_type() != *data_type {
                return Err(MosaicError::type_mismatch(format!(
                    "data array '{path}' has type {}, expected {data_type}",
                    array.data_type()
                )));
            }
        }
        let taken = sources
            .into_iter()
            .map(|(path, _)| Ok((path.clone(), registry.take_array(path)?)))
            .collect::<MosaicResult<Vec<_>>>()?;
        self.build(&mut Sources::Taken(taken))
    }

    /// Check whether an earlier validation already attached this geometry.
    fn is_attached(&self, registry: &DataContainerArray, existing: &Geometry) -> bool {
        let kind = self.geometry.kind();
        if existing.kind() != kind {
            return false;
        }
        let matrix_matches = registry
            .resolve_matrix(&self.element_matrix_path())
            .is_ok_and(|m| {
                m.category() == kind.element_matrix_type() && m.num_tuples() == existing.num_elements()
            });
        matrix_matches
            && match self.array_handling {
                ArrayHandling::Move => self
                    .geometry
                    .source_paths()
                    .iter()
                    .all(|p| !registry.contains_path(p)),
                ArrayHandling::Copy => self
                    .build(&mut Sources::Borrowed(registry))
                    .is_ok_and(|g| &g == existing),
            }
    }
}

impl Filter for CreateGeometry {
    fn name(&self) -> &str {
        "Create Geometry"
    }

    fn required_inputs(&self) -> Vec<DataArrayPath> {
        let mut inputs = vec![DataArrayPath::container_only(self.container.clone())];
        inputs.extend(self.geometry.source_paths());
        inputs
    }

    fn created_outputs(&self) -> Vec<DataArrayPath> {
        vec![self.element_matrix_path()]
    }

    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        let container_path = DataArrayPath::container_only(self.container.clone());
        let Some(container) = get_prereq_container(registry, ctx, &container_path) else {
            return;
        };
        if let Some(existing) = container.geometry() {
            if self.is_attached(registry, existing) {
                for issue in existing.validate() {
                    self.record_issue(ctx, &issue);
                }
            } else {
                ctx.set_error(
                    codes::NAME_COLLISION,
                    format!("data container '{}' already has a {}", self.container, existing.kind()),
                );
            }
            return;
        }
        if self.array_handling == ArrayHandling::Move {
            let mut sources = self.geometry.source_paths();
            sources.sort();
            if sources.windows(2).any(|w| w[0] == w[1]) {
                ctx.set_error(
                    codes::INVALID_PARAMETER,
                    "the same array cannot be moved into the geometry twice",
                );
                return;
            }
        }

        let Some(shape) = self.inspect(registry, ctx) else {
            return;
        };
        if !self.check_existing_matrices(registry, ctx, &shape) {
            return;
        }
        if !create_non_prereq_matrix(
            registry,
            ctx,
            &self.element_matrix_path(),
            &shape.element_dims,
            shape.kind.element_matrix_type(),
        ) {
            return;
        }
        let Some(geometry) = ctx.check(self.assemble(registry)) else {
            return;
        };
        debug!(
            "Attaching {} with {} elements to '{}'",
            geometry.kind(),
            geometry.num_elements(),
            self.container
        );
        if let Some(container) = ctx.check(registry.resolve_container_mut(&container_path)) {
            ctx.check(container.set_geometry(geometry));
        }
    }

    fn execute(&self, _registry: &mut DataContainerArray, _ctx: &mut FilterContext) {}
}
