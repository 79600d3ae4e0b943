//! Midpoint bisection.

use mesh_types::{IndexedMesh, MeshBounds};
use tracing::{debug, info};

use crate::error::SplitError;
use crate::params::{BoundaryPolicy, SplitParams};

/// Which half a vertex is assigned to.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Low,
    High,
    Dropped,
}

/// The two halves of a bisected mesh.
///
/// Both halves are fully owned; the input mesh is consumed. Either
/// half may be empty (a mesh entirely on one side of its own midpoint
/// cannot happen for a non-degenerate bounding box, but boundary
/// policy and degenerate boxes can empty a half).
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// The half below the cut plane.
    pub low: IndexedMesh,
    /// The half above the cut plane.
    pub high: IndexedMesh,
    /// The cut coordinate along the split axis.
    pub midpoint: f64,
    /// Number of vertices assigned to neither half.
    pub dropped_vertices: usize,
}

/// Bisect a mesh at the bounding-box midpoint along an axis.
///
/// See the crate docs for the full semantics. The operation is a pure
/// function of its inputs: it never partially applies, and on error no
/// output mesh exists.
///
/// # Errors
///
/// Returns [`SplitError::EmptyMesh`] if the mesh has no vertices.
/// A degenerate bounding box (zero extent on the axis) is *not* an
/// error; with the default boundary policy it yields two empty halves.
///
/// # Example
///
/// ```
/// use mesh_split::{bisect, SplitParams};
/// use mesh_types::{IndexedMesh, Vertex, Axis, MeshTopology};
///
/// // A triangle straddling the midpoint: both halves lose the face.
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(-1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// let result = bisect(mesh, &SplitParams::along(Axis::X)).unwrap();
/// assert_eq!(result.low.vertex_count(), 1);
/// assert_eq!(result.high.vertex_count(), 1);
/// assert_eq!(result.low.face_count(), 0);
/// assert_eq!(result.high.face_count(), 0);
/// assert_eq!(result.dropped_vertices, 1); // the apex sits on the cut
/// ```
pub fn bisect(mesh: IndexedMesh, params: &SplitParams) -> Result<SplitResult, SplitError> {
    if mesh.vertices.is_empty() {
        return Err(SplitError::EmptyMesh);
    }

    let bounds = mesh.bounds();
    let midpoint = bounds.midpoint(params.axis);
    debug!(
        axis = %params.axis,
        midpoint,
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "bisecting mesh"
    );

    // Assign each vertex to a side.
    let sides: Vec<Side> = mesh
        .vertices
        .iter()
        .map(|v| {
            let coord = params.axis.coord(&v.position);
            if coord < midpoint {
                Side::Low
            } else if coord > midpoint {
                Side::High
            } else {
                match params.boundary {
                    BoundaryPolicy::Drop => Side::Dropped,
                    BoundaryPolicy::Low => Side::Low,
                    BoundaryPolicy::High => Side::High,
                }
            }
        })
        .collect();

    let dropped_vertices = sides.iter().filter(|s| **s == Side::Dropped).count();

    let low = extract_half(&mesh, &sides, Side::Low);
    let high = extract_half(&mesh, &sides, Side::High);

    info!(
        low_vertices = low.vertices.len(),
        low_faces = low.faces.len(),
        high_vertices = high.vertices.len(),
        high_faces = high.faces.len(),
        dropped_vertices,
        "split complete"
    );

    Ok(SplitResult {
        low,
        high,
        midpoint,
        dropped_vertices,
    })
}

/// Build one half: keep the side's vertices in their original relative
/// order, then keep exactly the faces whose three vertices all
/// survived, re-indexed against the compacted order.
fn extract_half(mesh: &IndexedMesh, sides: &[Side], side: Side) -> IndexedMesh {
    const UNMAPPED: u32 = u32::MAX;

    let mut remap = vec![UNMAPPED; mesh.vertices.len()];
    let mut half = IndexedMesh::new();

    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        if sides[idx] == side {
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: mesh indices are u32 by construction
            let new_idx = half.vertices.len() as u32;
            remap[idx] = new_idx;
            half.vertices.push(vertex.clone());
        }
    }

    for face in &mesh.faces {
        let mapped = [
            remap[face[0] as usize],
            remap[face[1] as usize],
            remap[face[2] as usize],
        ];
        if mapped.iter().all(|&i| i != UNMAPPED) {
            half.faces.push(mapped);
        }
    }

    half
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{unit_cube, Axis, IndexedMesh, MeshTopology, Vertex};

    fn mesh_from_coords(coords: &[(f64, f64, f64)], faces: &[[u32; 3]]) -> IndexedMesh {
        let vertices = coords
            .iter()
            .map(|&(x, y, z)| Vertex::from_coords(x, y, z))
            .collect();
        IndexedMesh::from_parts(vertices, faces.to_vec())
    }

    #[test]
    fn empty_mesh_is_an_error() {
        let result = bisect(IndexedMesh::new(), &SplitParams::default());
        assert_eq!(result.unwrap_err(), SplitError::EmptyMesh);
    }

    #[test]
    fn straddling_triangle_loses_its_face() {
        let mesh = mesh_from_coords(
            &[(-1.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)],
            &[[0, 1, 2]],
        );

        let result = bisect(mesh, &SplitParams::along(Axis::X)).unwrap();
        assert_relative_eq!(result.midpoint, 0.0);

        assert_eq!(result.low.vertex_count(), 1);
        assert_relative_eq!(result.low.vertices[0].position.x, -1.0);
        assert_eq!(result.low.face_count(), 0);

        // (1,0,0) and (0,1,0): the apex is exactly on the cut and dropped
        assert_eq!(result.high.vertex_count(), 1);
        assert_eq!(result.high.face_count(), 0);
        assert_eq!(result.dropped_vertices, 1);
    }

    #[test]
    fn vertex_conservation_bound() {
        let cube = unit_cube();
        let total = cube.vertex_count();
        let result = bisect(cube, &SplitParams::along(Axis::Y)).unwrap();
        assert!(result.low.vertex_count() + result.high.vertex_count() <= total);
        assert_eq!(
            result.low.vertex_count() + result.high.vertex_count() + result.dropped_vertices,
            total
        );
    }

    #[test]
    fn face_indices_valid_in_both_halves() {
        // Two separate triangles, one per side, plus one straddler.
        let mesh = mesh_from_coords(
            &[
                (0.0, 0.0, 0.0),
                (1.0, 0.0, 0.0),
                (0.5, 1.0, 0.0),
                (9.0, 0.0, 0.0),
                (10.0, 0.0, 0.0),
                (9.5, 1.0, 0.0),
            ],
            &[[0, 1, 2], [3, 4, 5], [2, 3, 4]],
        );

        let result = bisect(mesh, &SplitParams::along(Axis::X)).unwrap();
        for half in [&result.low, &result.high] {
            for face in &half.faces {
                for &i in face {
                    assert!((i as usize) < half.vertex_count());
                }
            }
        }
        assert_eq!(result.low.face_count(), 1);
        assert_eq!(result.high.face_count(), 1);
    }

    #[test]
    fn reindexing_preserves_relative_order() {
        let mesh = mesh_from_coords(
            &[
                (10.0, 0.0, 0.0), // high
                (0.0, 0.0, 0.0),  // low
                (1.0, 0.0, 0.0),  // low
                (2.0, 1.0, 0.0),  // low
            ],
            &[[1, 2, 3]],
        );

        let result = bisect(mesh, &SplitParams::along(Axis::X)).unwrap();
        assert_eq!(result.low.vertex_count(), 3);
        // Survivors keep their original relative order, so the face
        // maps to the first three compacted indices.
        assert_eq!(result.low.faces, vec![[0, 1, 2]]);
        assert_relative_eq!(result.low.vertices[2].position.x, 2.0);
    }

    #[test]
    fn all_vertices_on_one_side_of_cut() {
        // Extent spans [0, 10]; everything except one vertex is below 5.
        let mesh = mesh_from_coords(
            &[
                (0.0, 0.0, 0.0),
                (1.0, 0.0, 0.0),
                (2.0, 1.0, 0.0),
                (10.0, 0.0, 0.0),
            ],
            &[[0, 1, 2]],
        );

        let result = bisect(mesh, &SplitParams::along(Axis::X)).unwrap();
        assert_eq!(result.low.vertex_count(), 3);
        assert_eq!(result.low.face_count(), 1);
        assert_eq!(result.high.vertex_count(), 1);
        assert_eq!(result.high.face_count(), 0);
    }

    #[test]
    fn degenerate_extent_drops_everything_by_default() {
        let mesh = mesh_from_coords(
            &[(5.0, 0.0, 0.0), (5.0, 1.0, 0.0), (5.0, 0.0, 1.0)],
            &[[0, 1, 2]],
        );

        let result = bisect(mesh, &SplitParams::along(Axis::X)).unwrap();
        assert_relative_eq!(result.midpoint, 5.0);
        assert!(result.low.vertices.is_empty());
        assert!(result.high.vertices.is_empty());
        assert_eq!(result.dropped_vertices, 3);
    }

    #[test]
    fn degenerate_extent_with_low_policy_keeps_faces() {
        let mesh = mesh_from_coords(
            &[(5.0, 0.0, 0.0), (5.0, 1.0, 0.0), (5.0, 0.0, 1.0)],
            &[[0, 1, 2]],
        );

        let params = SplitParams::along(Axis::X).with_boundary(BoundaryPolicy::Low);
        let result = bisect(mesh, &params).unwrap();
        assert_eq!(result.low.vertex_count(), 3);
        assert_eq!(result.low.face_count(), 1);
        assert!(result.high.vertices.is_empty());
        assert_eq!(result.dropped_vertices, 0);
    }

    #[test]
    fn boundary_high_assigns_cut_plane_vertices_up() {
        let mesh = mesh_from_coords(
            &[(0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (1.0, 1.0, 0.0)],
            &[[0, 1, 2]],
        );

        let params = SplitParams::along(Axis::X).with_boundary(BoundaryPolicy::High);
        let result = bisect(mesh, &params).unwrap();
        // Midpoint is 1.0; the apex joins the high half.
        assert_eq!(result.low.vertex_count(), 1);
        assert_eq!(result.high.vertex_count(), 2);
        assert_eq!(result.dropped_vertices, 0);
    }

    #[test]
    fn rebisecting_a_half_is_stable() {
        // The low half occupies its own coordinate range; cutting it
        // again must not resurrect anything from the parent's high side.
        let cube = unit_cube();
        let first = bisect(cube, &SplitParams::along(Axis::Z)).unwrap();
        let parent_midpoint = first.midpoint;

        let second = bisect(first.low.clone(), &SplitParams::along(Axis::Z)).unwrap();
        assert!(second.midpoint < parent_midpoint);
        for half in [&second.low, &second.high] {
            for v in &half.vertices {
                assert!(v.position.z < parent_midpoint);
            }
        }
    }

    #[test]
    fn cube_split_keeps_side_faces_only() {
        // Unit cube cut along X at 0.5: the x=0 and x=1 quads survive
        // in their halves; every other face straddles the cut.
        let result = bisect(unit_cube(), &SplitParams::along(Axis::X)).unwrap();
        assert_eq!(result.low.vertex_count(), 4);
        assert_eq!(result.high.vertex_count(), 4);
        assert_eq!(result.low.face_count(), 2);
        assert_eq!(result.high.face_count(), 2);
    }
}
