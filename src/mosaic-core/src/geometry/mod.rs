//! Geometry variants owned by data containers.
//!
//! A [`Geometry`] is a closed enum over eight topology kinds. Shared queries
//! (element counts, validation) are implemented by matching on the variant.
//!
//! | Kind | Storage | Primary element | Connectivity width |
//! |------|---------|-----------------|--------------------|
//! | Image | implicit grid | cell | - |
//! | RectGrid | x/y/z bounds | cell | - |
//! | Vertex | vertex list | vertex | - |
//! | Edge | vertices + edges | edge | 2 |
//! | Triangle | vertices + faces | face | 3 |
//! | Quad | vertices + faces | face | 4 |
//! | Tetrahedral | vertices + cells | cell | 4 |
//! | Hexahedral | vertices + cells | cell | 8 |

mod grid;
mod mesh;
mod validate;

pub use grid::{ImageGeometry, RectGridGeometry};
pub use mesh::MeshGeometry;
pub use validate::{
    check_bounds, check_connectivity, first_non_monotonic, scan_connectivity, ConnectivityScan,
    GeometryIssue, IssueSeverity, MonotonicViolation,
};

use serde::{Deserialize, Serialize};

use common_error::{codes, MosaicError, MosaicResult};

use crate::array::DataArray;
use crate::matrix::{AttributeMatrixType, ElementKind};

/// Discriminant of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Image,
    RectGrid,
    Vertex,
    Edge,
    Triangle,
    Quad,
    Tetrahedral,
    Hexahedral,
}

impl GeometryKind {
    /// Indices per element for mesh kinds with connectivity.
    pub const fn connectivity_width(self) -> Option<usize> {
        match self {
            Self::Edge => Some(2),
            Self::Triangle => Some(3),
            Self::Quad | Self::Tetrahedral => Some(4),
            Self::Hexahedral => Some(8),
            Self::Image | Self::RectGrid | Self::Vertex => None,
        }
    }

    /// Check if this kind stores an explicit vertex list.
    pub const fn has_vertex_list(self) -> bool {
        !matches!(self, Self::Image | Self::RectGrid)
    }

    /// Element kind that the connectivity (or grid) describes.
    pub const fn primary_element(self) -> ElementKind {
        match self {
            Self::Vertex => ElementKind::Vertex,
            Self::Edge => ElementKind::Edge,
            Self::Triangle | Self::Quad => ElementKind::Face,
            Self::Image | Self::RectGrid | Self::Tetrahedral | Self::Hexahedral => {
                ElementKind::Cell
            }
        }
    }

    /// Conventional name of the connectivity array.
    pub const fn connectivity_name(self) -> Option<&'static str> {
        match self {
            Self::Edge => Some("SharedEdgeList"),
            Self::Triangle => Some("SharedTriList"),
            Self::Quad => Some("SharedQuadList"),
            Self::Tetrahedral => Some("SharedTetList"),
            Self::Hexahedral => Some("SharedHexList"),
            Self::Image | Self::RectGrid | Self::Vertex => None,
        }
    }

    /// Matrix category bound to the primary element.
    pub const fn element_matrix_type(self) -> AttributeMatrixType {
        match self.primary_element() {
            ElementKind::Vertex => AttributeMatrixType::Vertex,
            ElementKind::Edge => AttributeMatrixType::Edge,
            ElementKind::Face => AttributeMatrixType::Face,
            ElementKind::Cell => AttributeMatrixType::Cell,
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}Geometry")
    }
}

/// Conventional name of the shared vertex array.
pub const SHARED_VERTEX_LIST: &str = "SharedVertexList";

/// Topology of a data container.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Image(ImageGeometry),
    RectGrid(RectGridGeometry),
    Vertex(MeshGeometry),
    Edge(MeshGeometry),
    Triangle(MeshGeometry),
    Quad(MeshGeometry),
    Tetrahedral(MeshGeometry),
    Hexahedral(MeshGeometry),
}

impl Geometry {
    /// Build a mesh geometry of `kind` from a vertex list and connectivity.
    pub fn mesh(
        kind: GeometryKind,
        vertices: DataArray<f32>,
        connectivity: DataArray<i64>,
    ) -> MosaicResult<Self> {
        let mesh = MeshGeometry::with_connectivity(vertices, connectivity);
        Ok(match kind {
            GeometryKind::Edge => Self::Edge(mesh),
            GeometryKind::Triangle => Self::Triangle(mesh),
            GeometryKind::Quad => Self::Quad(mesh),
            GeometryKind::Tetrahedral => Self::Tetrahedral(mesh),
            GeometryKind::Hexahedral => Self::Hexahedral(mesh),
            other => {
                return Err(MosaicError::invalid_parameter(format!(
                    "{other} does not use a connectivity list"
                )))
            }
        })
    }

    /// Point cloud geometry.
    pub fn vertex(vertices: DataArray<f32>) -> Self {
        Self::Vertex(MeshGeometry::point_cloud(vertices))
    }

    /// Rectilinear grid geometry.
    pub fn rect_grid(x: DataArray<f32>, y: DataArray<f32>, z: DataArray<f32>) -> Self {
        Self::RectGrid(RectGridGeometry::new(x, y, z))
    }

    /// Kind discriminant.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Image(_) => GeometryKind::Image,
            Self::RectGrid(_) => GeometryKind::RectGrid,
            Self::Vertex(_) => GeometryKind::Vertex,
            Self::Edge(_) => GeometryKind::Edge,
            Self::Triangle(_) => GeometryKind::Triangle,
            Self::Quad(_) => GeometryKind::Quad,
            Self::Tetrahedral(_) => GeometryKind::Tetrahedral,
            Self::Hexahedral(_) => GeometryKind::Hexahedral,
        }
    }

    /// Mesh payload for vertex-list based kinds.
    pub fn as_mesh(&self) -> Option<&MeshGeometry> {
        match self {
            Self::Vertex(m)
            | Self::Edge(m)
            | Self::Triangle(m)
            | Self::Quad(m)
            | Self::Tetrahedral(m)
            | Self::Hexahedral(m) => Some(m),
            Self::Image(_) | Self::RectGrid(_) => None,
        }
    }

    /// Mesh payload, mutably.
    pub fn as_mesh_mut(&mut self) -> Option<&mut MeshGeometry> {
        match self {
            Self::Vertex(m)
            | Self::Edge(m)
            | Self::Triangle(m)
            | Self::Quad(m)
            | Self::Tetrahedral(m)
            | Self::Hexahedral(m) => Some(m),
            Self::Image(_) | Self::RectGrid(_) => None,
        }
    }

    /// Number of vertices (grid points for implicit grids).
    pub fn num_vertices(&self) -> usize {
        match self {
            Self::Image(g) => g.num_vertices(),
            Self::RectGrid(g) => g.num_vertices(),
            Self::Vertex(m)
            | Self::Edge(m)
            | Self::Triangle(m)
            | Self::Quad(m)
            | Self::Tetrahedral(m)
            | Self::Hexahedral(m) => m.num_vertices(),
        }
    }

    /// Number of primary elements (vertices, edges, faces or cells).
    pub fn num_elements(&self) -> usize {
        match self {
            Self::Image(g) => g.num_cells(),
            Self::RectGrid(g) => g.num_cells(),
            Self::Vertex(m) => m.num_vertices(),
            Self::Edge(m)
            | Self::Triangle(m)
            | Self::Quad(m)
            | Self::Tetrahedral(m)
            | Self::Hexahedral(m) => m.num_connectivity_tuples(),
        }
    }

    /// Count of elements of `kind`, `None` if this geometry does not define them.
    pub fn element_count(&self, kind: ElementKind) -> Option<usize> {
        if kind == ElementKind::Vertex {
            return Some(self.num_vertices());
        }
        (self.kind().primary_element() == kind).then(|| self.num_elements())
    }

    /// Number of cells, for grid, tetrahedral and hexahedral geometries.
    pub fn num_cells(&self) -> Option<usize> {
        self.element_count(ElementKind::Cell)
    }

    /// Number of faces, for triangle and quad geometries.
    pub fn num_faces(&self) -> Option<usize> {
        self.element_count(ElementKind::Face)
    }

    /// Number of edges, for edge geometries.
    pub fn num_edges(&self) -> Option<usize> {
        self.element_count(ElementKind::Edge)
    }

    /// Element count a matrix of `category` must match, if the category is
    /// bound to elements this geometry defines.
    pub fn element_count_for(&self, category: AttributeMatrixType) -> Option<usize> {
        category.element_kind().and_then(|kind| self.element_count(kind))
    }

    /// Cell dimensions of implicit grids.
    pub fn dimensions(&self) -> Option<[usize; 3]> {
        match self {
            Self::Image(g) => Some(g.dimensions),
            Self::RectGrid(g) => Some(g.dimensions()),
            _ => None,
        }
    }

    /// Axis-aligned bounding box of the vertex list.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        self.as_mesh().and_then(MeshGeometry::bounding_box)
    }

    /// Required tuple count for a matrix of `category`.
    ///
    /// `Ok(None)` means the category is not bound to geometry elements.
    pub fn tuple_count_for(&self, category: AttributeMatrixType) -> MosaicResult<Option<usize>> {
        let Some(kind) = category.element_kind() else {
            return Ok(None);
        };
        self.element_count(kind).map(Some).ok_or_else(|| {
            MosaicError::shape_mismatch(format!(
                "{} has no {kind} elements for a {category} attribute matrix",
                self.kind()
            ))
        })
    }

    /// Tuple dimensions for the element matrix created alongside this geometry.
    pub fn element_tuple_dims(&self) -> Vec<usize> {
        match self {
            Self::Image(g) => g.dimensions.to_vec(),
            Self::RectGrid(g) => g.dimensions().to_vec(),
            _ => vec![self.num_elements()],
        }
    }

    /// Run every structural check. An empty result means the geometry is valid.
    pub fn validate(&self) -> Vec<GeometryIssue> {
        match self {
            Self::Image(g) => validate_image(g),
            Self::RectGrid(g) => ["x", "y", "z"]
                .iter()
                .zip(g.bounds())
                .flat_map(|(axis, b)| check_bounds(axis, b.as_slice(), b.num_components()))
                .collect(),
            Self::Vertex(m)
            | Self::Edge(m)
            | Self::Triangle(m)
            | Self::Quad(m)
            | Self::Tetrahedral(m)
            | Self::Hexahedral(m) => validate_mesh(self.kind(), m),
        }
    }

    /// Validate and convert the first error into a `MosaicError`.
    pub fn ensure_valid(&self) -> MosaicResult<()> {
        match self.validate().into_iter().find(GeometryIssue::is_error) {
            Some(issue) => Err(MosaicError::structural(issue.message)),
            None => Ok(()),
        }
    }
}

fn validate_image(g: &ImageGeometry) -> Vec<GeometryIssue> {
    let mut issues = Vec::new();
    if g.dimensions.contains(&0) {
        issues.push(GeometryIssue::error(
            codes::STRUCTURAL_VIOLATION,
            format!("image dimensions {:?} must all be at least 1", g.dimensions),
        ));
    }
    if let Err(e) = g.checked_counts() {
        issues.push(GeometryIssue::error(codes::INVALID_PARAMETER, e.message()));
    }
    if g.spacing.iter().any(|s| !(*s > 0.0)) {
        issues.push(GeometryIssue::error(
            codes::STRUCTURAL_VIOLATION,
            format!("image spacing {:?} must be strictly positive", g.spacing),
        ));
    }
    issues
}

fn validate_mesh(kind: GeometryKind, mesh: &MeshGeometry) -> Vec<GeometryIssue> {
    let mut issues = Vec::new();
    let vertices = mesh.vertices();
    if vertices.num_components() != 3 {
        issues.push(GeometryIssue::error(
            codes::COMPONENT_MISMATCH,
            format!(
                "vertex list '{}' must have 3 components, found {}",
                vertices.name(),
                vertices.num_components()
            ),
        ));
    }

    let Some(width) = kind.connectivity_width() else {
        return issues;
    };
    let Some(connectivity) = mesh.connectivity() else {
        issues.push(GeometryIssue::error(
            codes::STRUCTURAL_VIOLATION,
            format!("{kind} requires a connectivity list"),
        ));
        return issues;
    };
    if connectivity.num_components() != width {
        issues.push(GeometryIssue::error(
            codes::COMPONENT_MISMATCH,
            format!(
                "connectivity list '{}' must have {width} components for {kind}, found {}",
                connectivity.name(),
                connectivity.num_components()
            ),
        ));
        return issues;
    }
    issues.extend(check_connectivity(
        &format!("connectivity list '{}'", connectivity.name()),
        connectivity.as_slice(),
        width,
        mesh.num_vertices(),
    ));
    issues
}
