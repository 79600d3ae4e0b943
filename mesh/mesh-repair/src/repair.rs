//! Vertex welding and cleanup passes.

use core::fmt;

use hashbrown::{HashMap, HashSet};
use mesh_types::{Aabb, IndexedMesh, Point3};
use tracing::info;

/// Hard cap on the automatic merge threshold, in mm.
///
/// Thresholds beyond this start collapsing real anatomy on brain-scale
/// meshes regardless of how large the bounding box is.
pub const MAX_MERGE_DISTANCE_MM: f64 = 2.404_33;

/// Merge threshold derived from mesh size: one ten-thousandth of the
/// bounding-box diagonal, capped at [`MAX_MERGE_DISTANCE_MM`].
///
/// # Example
///
/// ```
/// use mesh_repair::default_merge_threshold;
/// use mesh_types::{unit_cube, MeshBounds};
///
/// let threshold = default_merge_threshold(&unit_cube().bounds());
/// assert!((threshold - 3f64.sqrt() / 10_000.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn default_merge_threshold(bounds: &Aabb) -> f64 {
    (bounds.diagonal() / 10_000.0).clamp(0.0, MAX_MERGE_DISTANCE_MM)
}

/// Remove vertices with bit-identical coordinates, remapping faces to
/// the first occurrence. Returns the number of vertices removed.
///
/// Exact comparison only; use [`merge_close_vertices`] for
/// nearly-coincident vertices.
pub fn remove_duplicate_vertices(mesh: &mut IndexedMesh) -> usize {
    let mut first_at: HashMap<[u64; 3], u32> = HashMap::with_capacity(mesh.vertices.len());
    let mut remap: Vec<u32> = Vec::with_capacity(mesh.vertices.len());

    for vertex in &mesh.vertices {
        let key = position_bits(&vertex.position);
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: vertex indices fit u32 by construction
        let idx = remap.len() as u32;
        let canonical = *first_at.entry(key).or_insert(idx);
        remap.push(canonical);
    }

    apply_remap_and_compact(mesh, &remap)
}

/// Merge vertices closer than `epsilon`, remapping faces and dropping
/// faces the merge degenerates. Returns the number of vertices merged
/// away.
///
/// Uses a spatial hash with cells of `2 * epsilon` so every merge
/// candidate lies within the 3x3x3 cell neighborhood.
///
/// # Example
///
/// ```
/// use mesh_repair::merge_close_vertices;
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.000_05, 0.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([0, 3, 2]);
///
/// let merged = merge_close_vertices(&mut mesh, 0.001);
/// assert_eq!(merged, 1);
/// assert_eq!(mesh.vertex_count(), 3);
/// ```
pub fn merge_close_vertices(mesh: &mut IndexedMesh, epsilon: f64) -> usize {
    if mesh.vertices.is_empty() || epsilon <= 0.0 {
        return 0;
    }

    let cell_size = epsilon * 2.0;
    let mut grid: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: vertex indices fit u32 by construction
        let idx = idx as u32;
        grid.entry(cell_of(&vertex.position, cell_size))
            .or_default()
            .push(idx);
    }

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: vertex indices fit u32 by construction
    let mut remap: Vec<u32> = (0..mesh.vertices.len() as u32).collect();

    for (idx, vertex) in mesh.vertices.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: vertex indices fit u32 by construction
        let idx = idx as u32;
        if remap[idx as usize] != idx {
            continue;
        }

        let cell = cell_of(&vertex.position, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = grid.get(&(cell.0 + dx, cell.1 + dy, cell.2 + dz))
                    else {
                        continue;
                    };
                    for &other in candidates {
                        if other <= idx || remap[other as usize] != other {
                            continue;
                        }
                        let distance =
                            (vertex.position - mesh.vertices[other as usize].position).norm();
                        if distance < epsilon {
                            remap[other as usize] = idx;
                        }
                    }
                }
            }
        }
    }

    // Chase chains so every entry points at its final representative.
    for i in 0..remap.len() {
        let mut target = remap[i];
        while remap[target as usize] != target {
            target = remap[target as usize];
        }
        remap[i] = target;
    }

    apply_remap_and_compact(mesh, &remap)
}

/// Remove vertices no face references, compacting the vertex array.
/// Returns the number of vertices removed.
pub fn remove_unreferenced_vertices(mesh: &mut IndexedMesh) -> usize {
    let mut referenced: HashSet<u32> = HashSet::with_capacity(mesh.faces.len() * 3);
    for face in &mesh.faces {
        referenced.extend(face);
    }
    if referenced.len() == mesh.vertices.len() {
        return 0;
    }

    let original_count = mesh.vertices.len();
    let mut remap: Vec<u32> = vec![0; original_count];
    let mut kept = Vec::with_capacity(referenced.len());

    for (old_idx, vertex) in mesh.vertices.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: vertex indices fit u32 by construction
        let old_idx = old_idx as u32;
        if referenced.contains(&old_idx) {
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: vertex indices fit u32 by construction
            let new_idx = kept.len() as u32;
            remap[old_idx as usize] = new_idx;
            kept.push(vertex.clone());
        }
    }

    for face in &mut mesh.faces {
        for slot in face {
            *slot = remap[*slot as usize];
        }
    }
    mesh.vertices = kept;

    original_count - mesh.vertices.len()
}

/// What [`cleanup`] did to a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    /// Vertices merged into a nearby representative.
    pub vertices_merged: usize,
    /// Faces dropped because merging collapsed them.
    pub faces_dropped: usize,
    /// Vertices removed because no face referenced them.
    pub vertices_unreferenced: usize,
}

impl CleanupSummary {
    /// Whether the cleanup changed the mesh at all.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.vertices_merged == 0 && self.faces_dropped == 0 && self.vertices_unreferenced == 0
    }
}

impl fmt::Display for CleanupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "merged {} vertices, dropped {} faces, removed {} unreferenced vertices",
            self.vertices_merged, self.faces_dropped, self.vertices_unreferenced
        )
    }
}

/// Standard cleanup pipeline: merge close vertices, then drop
/// unreferenced ones.
///
/// This is the connectivity-recovery pass run on triangle soup before
/// smoothing, with `epsilon` typically from
/// [`default_merge_threshold`].
pub fn cleanup(mesh: &mut IndexedMesh, epsilon: f64) -> CleanupSummary {
    let faces_before = mesh.faces.len();
    let vertices_merged = merge_close_vertices(mesh, epsilon);
    let faces_dropped = faces_before - mesh.faces.len();
    let vertices_unreferenced = remove_unreferenced_vertices(mesh);

    let summary = CleanupSummary {
        vertices_merged,
        faces_dropped,
        vertices_unreferenced,
    };
    if !summary.is_noop() {
        info!(%summary, "cleaned up mesh");
    }
    summary
}

/// Coordinate bit patterns, for exact-duplicate hashing.
fn position_bits(position: &Point3<f64>) -> [u64; 3] {
    [
        position.x.to_bits(),
        position.y.to_bits(),
        position.z.to_bits(),
    ]
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: cell coordinates saturate far beyond any mm-scale mesh
fn cell_of(position: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    (
        (position.x / cell_size).floor() as i64,
        (position.y / cell_size).floor() as i64,
        (position.z / cell_size).floor() as i64,
    )
}

/// Rewrite faces through `remap`, drop faces that collapse, and
/// compact away vertices that lost all references to the remap.
/// Returns the number of vertices removed.
fn apply_remap_and_compact(mesh: &mut IndexedMesh, remap: &[u32]) -> usize {
    let merged = remap
        .iter()
        .enumerate()
        .filter(|&(i, &target)| {
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: vertex indices fit u32 by construction
            let i = i as u32;
            target != i
        })
        .count();
    if merged == 0 {
        return 0;
    }

    for face in &mut mesh.faces {
        for slot in face {
            *slot = remap[*slot as usize];
        }
    }
    mesh.faces
        .retain(|&[a, b, c]| a != b && b != c && a != c);

    // Merged-away vertices are now unreferenced; drop them so the
    // count returned matches the vertices actually gone.
    let mut kept_flags = vec![false; mesh.vertices.len()];
    for (i, &target) in remap.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: vertex indices fit u32 by construction
        let i = i as u32;
        if target == i {
            kept_flags[i as usize] = true;
        }
    }

    let mut compact: Vec<u32> = vec![0; mesh.vertices.len()];
    let mut next = 0u32;
    for (i, &keep) in kept_flags.iter().enumerate() {
        if keep {
            compact[i] = next;
            next += 1;
        }
    }

    for face in &mut mesh.faces {
        for slot in face {
            *slot = compact[*slot as usize];
        }
    }

    let mut index = 0;
    mesh.vertices.retain(|_| {
        let keep = kept_flags[index];
        index += 1;
        keep
    });

    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{unit_cube, MeshBounds, MeshTopology, Vertex};

    /// Two triangles sharing an edge, but with the shared vertices
    /// duplicated as STL loading produces.
    fn soup_quad() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        let corners = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        for [x, y, z] in corners {
            mesh.vertices.push(Vertex::from_coords(x, y, z));
        }
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([3, 4, 5]);
        mesh
    }

    #[test]
    fn exact_duplicates_are_welded() {
        let mut mesh = soup_quad();
        let removed = remove_duplicate_vertices(&mut mesh);
        assert_eq!(removed, 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        // Both faces now reference the shared diagonal.
        assert_eq!(mesh.faces[1], [0, 2, 3]);
    }

    #[test]
    fn close_vertices_merge_within_epsilon() {
        let mut mesh = soup_quad();
        // Perturb one duplicate slightly.
        mesh.vertices[3].position.x = 1e-5;
        let merged = merge_close_vertices(&mut mesh, 1e-3);
        assert_eq!(merged, 2);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn distant_vertices_are_untouched() {
        let mut mesh = soup_quad();
        mesh.vertices[3].position.x = 0.5;
        let merged = merge_close_vertices(&mut mesh, 1e-3);
        assert_eq!(merged, 1); // only the (1,1,0) pair remains coincident
        assert_eq!(mesh.vertex_count(), 5);
    }

    #[test]
    fn merging_drops_collapsed_faces() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1e-6, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(5.0, 0.0, 0.0));
        mesh.faces.push([0, 1, 2]);

        let summary = cleanup(&mut mesh, 1e-3);
        assert_eq!(summary.vertices_merged, 1);
        assert_eq!(summary.faces_dropped, 1);
        // The far vertex lost its only face.
        assert_eq!(summary.vertices_unreferenced, 2);
        assert!(mesh.is_empty());
    }

    #[test]
    fn unreferenced_vertices_are_compacted() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(9.0, 9.0, 9.0)); // orphan
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([1, 2, 3]);

        let removed = remove_unreferenced_vertices(&mut mesh);
        assert_eq!(removed, 1);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
        assert_relative_eq!(mesh.vertices[0].position.x, 0.0);
    }

    #[test]
    fn threshold_scales_with_diagonal_and_caps() {
        let small = Aabb::from_points(
            [
                mesh_types::Point3::new(0.0, 0.0, 0.0),
                mesh_types::Point3::new(1.0, 0.0, 0.0),
            ]
            .iter(),
        );
        assert_relative_eq!(default_merge_threshold(&small), 1e-4, epsilon = 1e-15);

        let huge = Aabb::from_points(
            [
                mesh_types::Point3::new(0.0, 0.0, 0.0),
                mesh_types::Point3::new(1e9, 0.0, 0.0),
            ]
            .iter(),
        );
        assert_relative_eq!(
            default_merge_threshold(&huge),
            MAX_MERGE_DISTANCE_MM,
            epsilon = 1e-12
        );
    }

    #[test]
    fn cleanup_on_clean_mesh_is_noop() {
        let mut cube = unit_cube();
        let threshold = default_merge_threshold(&cube.bounds());
        let summary = cleanup(&mut cube, threshold);
        assert!(summary.is_noop());
        assert_eq!(cube.vertex_count(), 8);
    }

    #[test]
    fn cleanup_recovers_cube_connectivity_from_soup() {
        // Save/load through STL produces 36 soup vertices for a cube.
        let cube = unit_cube();
        let mut soup = IndexedMesh::new();
        for tri in cube.triangles() {
            #[allow(clippy::cast_possible_truncation)]
            let base = soup.vertices.len() as u32;
            soup.vertices.push(Vertex::new(tri.v0));
            soup.vertices.push(Vertex::new(tri.v1));
            soup.vertices.push(Vertex::new(tri.v2));
            soup.faces.push([base, base + 1, base + 2]);
        }

        let summary = cleanup(&mut soup, 1e-6);
        assert_eq!(summary.vertices_merged, 28);
        assert_eq!(soup.vertex_count(), 8);
        assert_eq!(soup.face_count(), 12);
        assert_relative_eq!(soup.signed_volume(), 1.0, epsilon = 1e-9);
    }
}
