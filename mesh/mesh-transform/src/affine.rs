//! Homogeneous affine transforms.

use mesh_types::{IndexedMesh, Matrix4};
use tracing::debug;

/// Apply a 4x4 homogeneous affine to every vertex position.
///
/// Stored vertex normals are cleared rather than transformed: the
/// affines used here (surface-RAS placement) are not guaranteed to be
/// rigid, and downstream STL output recomputes normals from winding
/// anyway.
///
/// # Example
///
/// ```
/// use mesh_transform::apply_affine;
/// use mesh_types::{unit_cube, Matrix4, MeshBounds};
///
/// let mut cube = unit_cube();
/// let shift = Matrix4::new_translation(&[10.0, 0.0, 0.0].into());
/// apply_affine(&mut cube, &shift);
/// assert!((cube.bounds().min.x - 10.0).abs() < 1e-12);
/// ```
pub fn apply_affine(mesh: &mut IndexedMesh, affine: &Matrix4<f64>) {
    for vertex in &mut mesh.vertices {
        vertex.position = affine.transform_point(&vertex.position);
    }
    mesh.clear_normals();

    debug!(vertices = mesh.vertices.len(), "applied affine transform");
}
