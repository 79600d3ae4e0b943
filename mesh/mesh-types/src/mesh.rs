//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshTopology, Triangle, Vertex};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// This is the primary mesh type for NeuroForge. It stores vertices and
/// faces separately, with faces referencing vertices by index.
///
/// # Invariant
///
/// Every face index is in range for the vertex sequence. Readers
/// enforce this on load; operations preserve it. The mesh need not be
/// manifold or closed (split halves in particular have open cut
/// boundaries).
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from flat coordinate and index arrays.
    ///
    /// `positions` is `[x0, y0, z0, x1, y1, z1, ...]` and `indices` is
    /// `[a0, b0, c0, a1, b1, c1, ...]`. Returns an empty mesh if either
    /// slice length is not divisible by 3.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, MeshTopology};
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let indices = [0, 1, 2];
    ///
    /// let mesh = IndexedMesh::from_raw(&positions, &indices);
    /// assert_eq!(mesh.vertex_count(), 3);
    /// assert_eq!(mesh.face_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();

        let faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        Self { vertices, faces }
    }

    /// Translate the mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Scale the mesh uniformly around the origin.
    ///
    /// Normals are unaffected by uniform scaling and are kept.
    pub fn scale(&mut self, factor: f64) {
        for vertex in &mut self.vertices {
            vertex.position.coords *= factor;
        }
    }

    /// Merge another mesh into this one.
    ///
    /// The other mesh's vertices and faces are appended, with face
    /// indices offset past the existing vertices. No welding happens
    /// here; use `mesh-repair` to collapse coincident vertices after
    /// merging.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32, vertex counts beyond u32 are unsupported
    pub fn merge(&mut self, other: &Self) {
        let vertex_offset = self.vertices.len() as u32;

        self.vertices.extend(other.vertices.iter().cloned());

        for face in &other.faces {
            self.faces.push([
                face[0] + vertex_offset,
                face[1] + vertex_offset,
                face[2] + vertex_offset,
            ]);
        }
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Sums signed tetrahedra volumes formed by each face and the
    /// origin. Positive for a closed mesh with outward normals;
    /// meaningless for open meshes.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;

        for &[i0, i1, i2] in &self.faces {
            let v0 = &self.vertices[i0 as usize].position;
            let v1 = &self.vertices[i1 as usize].position;
            let v2 = &self.vertices[i2 as usize].position;

            let cross = v1.coords.cross(&v2.coords);
            volume += v0.coords.dot(&cross);
        }

        volume / 6.0
    }

    /// Compute the absolute volume of the mesh.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Clear all vertex normals.
    ///
    /// Called by operations that invalidate stored normals.
    pub fn clear_normals(&mut self) {
        for vertex in &mut self.vertices {
            vertex.normal = None;
        }
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        self.faces.get(face_index).map(|&[i0, i1, i2]| Triangle {
            v0: self.vertices[i0 as usize].position,
            v1: self.vertices[i1 as usize].position,
            v2: self.vertices[i2 as usize].position,
        })
    }

    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    fn faces(&self) -> impl Iterator<Item = [u32; 3]> {
        self.faces.iter().copied()
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> {
        self.faces.iter().map(|&[i0, i1, i2]| Triangle {
            v0: self.vertices[i0 as usize].position,
            v1: self.vertices[i1 as usize].position,
            v2: self.vertices[i2 as usize].position,
        })
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        if self.vertices.is_empty() {
            return Aabb::empty();
        }

        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

/// Helper function to create a unit cube mesh.
///
/// Creates a cube from (0,0,0) to (1,1,1) with outward-facing normals.
/// Used widely in tests across the workspace.
///
/// # Example
///
/// ```
/// use mesh_types::{unit_cube, MeshTopology};
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    let mut mesh = IndexedMesh::with_capacity(8, 12);

    for z in [0.0, 1.0] {
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, z));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, z));
        mesh.vertices.push(Vertex::from_coords(1.0, 1.0, z));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, z));
    }

    // Two CCW triangles per face, viewed from outside
    let quads: [[u32; 4]; 6] = [
        [0, 3, 2, 1], // bottom (z=0), normal -Z
        [4, 5, 6, 7], // top (z=1), normal +Z
        [0, 1, 5, 4], // front (y=0), normal -Y
        [3, 7, 6, 2], // back (y=1), normal +Y
        [0, 4, 7, 3], // left (x=0), normal -X
        [1, 2, 6, 5], // right (x=1), normal +X
    ];
    for [a, b, c, d] in quads {
        mesh.faces.push([a, b, c]);
        mesh.faces.push([a, c, d]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mesh_is_empty() {
        let mesh = IndexedMesh::new();
        assert!(mesh.is_empty());

        let mut mesh2 = IndexedMesh::new();
        mesh2.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        assert!(mesh2.is_empty()); // no faces

        mesh2.faces.push([0, 0, 0]);
        assert!(!mesh2.is_empty());
    }

    #[test]
    fn mesh_from_raw_misaligned() {
        let mesh = IndexedMesh::from_raw(&[0.0, 1.0], &[0, 1, 2]);
        assert!(mesh.vertices.is_empty());
    }

    #[test]
    fn mesh_bounds() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(10.0, 5.0, 3.0));
        mesh.vertices.push(Vertex::from_coords(-2.0, 8.0, 1.0));

        let bounds = mesh.bounds();
        assert_relative_eq!(bounds.min.x, -2.0);
        assert_relative_eq!(bounds.max.x, 10.0);
        assert_relative_eq!(bounds.max.y, 8.0);
    }

    #[test]
    fn empty_mesh_bounds() {
        let mesh = IndexedMesh::new();
        assert!(mesh.bounds().is_empty());
    }

    #[test]
    fn unit_cube_volume() {
        let cube = unit_cube();
        assert_relative_eq!(cube.signed_volume(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn mesh_merge_offsets_faces() {
        let mut a = unit_cube();
        let mut b = unit_cube();
        b.translate(Vector3::new(5.0, 0.0, 0.0));

        a.merge(&b);
        assert_eq!(a.vertex_count(), 16);
        assert_eq!(a.face_count(), 24);
        // Faces from the second cube reference the second vertex block
        assert!(a.faces[12].iter().all(|&i| i >= 8));
    }

    #[test]
    fn mesh_translate() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));

        mesh.translate(Vector3::new(1.0, 2.0, 3.0));

        let pos = mesh.vertices[0].position;
        assert_relative_eq!(pos.x, 1.0);
        assert_relative_eq!(pos.z, 3.0);
    }

    #[test]
    fn mesh_scale_changes_volume() {
        let mut cube = unit_cube();
        cube.scale(2.0);
        assert_relative_eq!(cube.volume(), 8.0, epsilon = 1e-10);
    }

    #[test]
    fn mesh_clear_normals() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices
            .push(Vertex::with_normal(nalgebra::Point3::origin(), Vector3::z()));
        mesh.clear_normals();
        assert!(mesh.vertices[0].normal.is_none());
    }
}
