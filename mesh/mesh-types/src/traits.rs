//! Traits for mesh types.

use crate::{Aabb, Triangle, Vertex};
use nalgebra::Point3;

/// Trait for types that provide mesh topology information.
///
/// This defines the minimal read interface mesh operations work
/// against, decoupling them from the concrete storage layout.
pub trait MeshTopology {
    /// Get the number of vertices.
    fn vertex_count(&self) -> usize;

    /// Get the number of faces (triangles).
    fn face_count(&self) -> usize;

    /// Check if the mesh is empty.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Get a vertex by index.
    ///
    /// Returns `None` if the index is out of bounds.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Get a face by index as a vertex-index triple.
    ///
    /// Returns `None` if the index is out of bounds.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Get a triangle by face index with resolved vertex positions.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Iterate over all vertices.
    fn vertices(&self) -> impl Iterator<Item = &Vertex>;

    /// Iterate over all faces as vertex index triples.
    fn faces(&self) -> impl Iterator<Item = [u32; 3]>;

    /// Iterate over all triangles with resolved vertex positions.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Trait for types that can compute a bounding box.
pub trait MeshBounds {
    /// Compute the axis-aligned bounding box.
    ///
    /// Returns an empty AABB if the mesh has no vertices.
    fn bounds(&self) -> Aabb;

    /// Get the center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
