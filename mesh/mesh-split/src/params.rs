//! Split parameters.

use mesh_types::Axis;

/// Policy for vertices that lie exactly on the cut plane.
///
/// Strict `<`/`>` comparisons drop boundary vertices, and with them
/// every face touching the cut plane exactly. That is the historical
/// behavior of the select-then-delete filter pipeline this operation
/// replaces, and it is the default here. Callers that cannot afford to
/// lose cut-plane geometry can assign boundary vertices to one half
/// instead.
///
/// # Example
///
/// ```
/// use mesh_split::{bisect, BoundaryPolicy, SplitParams};
/// use mesh_types::{IndexedMesh, Vertex, Axis, MeshTopology};
///
/// // All vertices at x = 5: the bounding box is degenerate and every
/// // vertex sits on the midpoint.
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(5.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(5.0, 1.0, 0.0));
///
/// let dropped = bisect(mesh.clone(), &SplitParams::along(Axis::X)).unwrap();
/// assert_eq!(dropped.low.vertex_count() + dropped.high.vertex_count(), 0);
///
/// let params = SplitParams::along(Axis::X).with_boundary(BoundaryPolicy::Low);
/// let kept = bisect(mesh, &params).unwrap();
/// assert_eq!(kept.low.vertex_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Boundary vertices belong to neither half (strict comparisons).
    #[default]
    Drop,
    /// Boundary vertices are assigned to the low half.
    Low,
    /// Boundary vertices are assigned to the high half.
    High,
}

/// Parameters for a bisection.
///
/// # Example
///
/// ```
/// use mesh_split::{BoundaryPolicy, SplitParams};
/// use mesh_types::Axis;
///
/// let params = SplitParams::along(Axis::Z)
///     .with_boundary(BoundaryPolicy::High);
/// assert_eq!(params.axis, Axis::Z);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitParams {
    /// Axis whose bounding-box midpoint defines the cut plane.
    pub axis: Axis,

    /// What happens to vertices exactly on the cut plane.
    pub boundary: BoundaryPolicy,
}

impl SplitParams {
    /// Create params cutting along the given axis with the default
    /// boundary policy.
    #[inline]
    #[must_use]
    pub fn along(axis: Axis) -> Self {
        Self {
            axis,
            boundary: BoundaryPolicy::default(),
        }
    }

    /// Set the boundary policy.
    #[inline]
    #[must_use]
    pub const fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }
}

impl Default for SplitParams {
    /// Defaults to the X axis, which separates hemispheres in
    /// RAS-oriented meshes.
    fn default() -> Self {
        Self::along(Axis::X)
    }
}
