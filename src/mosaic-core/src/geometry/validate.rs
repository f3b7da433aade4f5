//! Structural checks over geometry buffers.
//!
//! All checks are single linear passes over the underlying buffers and
//! report problems as [`GeometryIssue`] values; none of them panic on bad data.

use common_error::codes;

/// Whether an issue blocks use of the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueSeverity {
    /// The geometry is unusable.
    Error,
    /// The geometry is usable but suspicious.
    Warning,
}

/// A problem found while validating a geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryIssue {
    pub severity: IssueSeverity,
    pub code: i32,
    pub message: String,
}

impl GeometryIssue {
    pub(crate) fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            message: message.into(),
        }
    }

    pub(crate) fn warning(code: i32, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Check if this issue is an error.
    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}

impl std::fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Summary of one pass over a connectivity buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityScan {
    /// Smallest index seen.
    pub min_index: i64,
    /// Largest index seen.
    pub max_index: i64,
    /// Elements that reference the same vertex more than once.
    pub degenerate_elements: usize,
}

/// Scan `connectivity` (`width` indices per element) once, tracking the
/// index range and degenerate elements. Returns `None` for an empty buffer.
pub fn scan_connectivity(connectivity: &[i64], width: usize) -> Option<ConnectivityScan> {
    let first = *connectivity.first()?;
    let mut scan = ConnectivityScan {
        min_index: first,
        max_index: first,
        degenerate_elements: 0,
    };
    for element in connectivity.chunks_exact(width.max(1)) {
        let mut repeated = false;
        for (i, &idx) in element.iter().enumerate() {
            scan.min_index = scan.min_index.min(idx);
            scan.max_index = scan.max_index.max(idx);
            repeated = repeated || element[..i].contains(&idx);
        }
        if repeated {
            scan.degenerate_elements += 1;
        }
    }
    Some(scan)
}

/// Check connectivity indices against the vertex count.
pub fn check_connectivity(
    label: &str,
    connectivity: &[i64],
    width: usize,
    num_vertices: usize,
) -> Vec<GeometryIssue> {
    let Some(scan) = scan_connectivity(connectivity, width) else {
        return Vec::new();
    };
    let mut issues = Vec::new();

    if scan.min_index < 0 {
        issues.push(GeometryIssue::error(
            codes::CONNECTIVITY_OUT_OF_RANGE,
            format!("{label} contains a negative vertex index ({})", scan.min_index),
        ));
    }
    if u64::try_from(scan.max_index).is_ok_and(|max| max >= num_vertices as u64) {
        issues.push(GeometryIssue::error(
            codes::CONNECTIVITY_OUT_OF_RANGE,
            format!(
                "{label} contains a vertex index ({}) which is >= the vertex count ({num_vertices})",
                scan.max_index
            ),
        ));
    }
    if scan.degenerate_elements > 0 {
        issues.push(GeometryIssue::warning(
            codes::STRUCTURAL_WARNING,
            format!(
                "{label} contains {} degenerate element(s) that repeat a vertex",
                scan.degenerate_elements
            ),
        ));
    }
    issues
}

/// Location of the first non-monotonic pair in a bounds array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonotonicViolation {
    pub index: usize,
    pub value: f32,
    pub next_value: f32,
}

/// Pairwise scan for monotonically non-decreasing values, stopping at the
/// first violation. NaN never compares as ordered and therefore violates.
pub fn first_non_monotonic(values: &[f32]) -> Option<MonotonicViolation> {
    values
        .windows(2)
        .position(|pair| !(pair[1] >= pair[0]))
        .map(|index| MonotonicViolation {
            index,
            value: values[index],
            next_value: values[index + 1],
        })
}

/// Check one rectilinear-grid bound array.
pub fn check_bounds(axis: &str, values: &[f32], num_components: usize) -> Vec<GeometryIssue> {
    if num_components != 1 {
        return vec![GeometryIssue::error(
            codes::COMPONENT_MISMATCH,
            format!("{axis} bounds must have 1 component, found {num_components}"),
        )];
    }
    if values.len() < 2 {
        return vec![GeometryIssue::error(
            codes::STRUCTURAL_VIOLATION,
            format!("{axis} bounds need at least 2 values, found {}", values.len()),
        )];
    }
    match first_non_monotonic(values) {
        Some(v) => vec![GeometryIssue::error(
            codes::BOUNDS_NOT_MONOTONIC,
            format!(
                "{axis} bounds are not monotonically non-decreasing: index {} ({}) > index {} ({})",
                v.index,
                v.value,
                v.index + 1,
                v.next_value
            ),
        )],
        None => Vec::new(),
    }
}
