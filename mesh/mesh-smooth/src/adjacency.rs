//! Vertex adjacency derived from face connectivity.

use hashbrown::{HashMap, HashSet};
use mesh_types::IndexedMesh;

/// One-ring neighbors for every vertex, indexed by vertex.
///
/// Entries for unreferenced vertices are empty.
pub(crate) fn build_neighbors(mesh: &IndexedMesh) -> Vec<Vec<u32>> {
    let mut sets: Vec<HashSet<u32>> = vec![HashSet::new(); mesh.vertices.len()];

    for face in &mesh.faces {
        for i in 0..3 {
            let v = face[i] as usize;
            if v < sets.len() {
                sets[v].insert(face[(i + 1) % 3]);
                sets[v].insert(face[(i + 2) % 3]);
            }
        }
    }

    sets.into_iter()
        .map(|set| set.into_iter().collect())
        .collect()
}

/// Vertices incident to a boundary edge (an edge used by exactly one
/// face).
pub(crate) fn find_boundary_vertices(mesh: &IndexedMesh) -> HashSet<u32> {
    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();

    for face in &mesh.faces {
        for i in 0..3 {
            let a = face[i];
            let b = face[(i + 1) % 3];
            let edge = if a < b { (a, b) } else { (b, a) };
            *edge_counts.entry(edge).or_insert(0) += 1;
        }
    }

    let mut boundary = HashSet::new();
    for ((a, b), count) in edge_counts {
        if count == 1 {
            boundary.insert(a);
            boundary.insert(b);
        }
    }
    boundary
}
