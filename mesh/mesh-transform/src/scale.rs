//! Scaling a mesh to a target physical size.

use mesh_types::{Axis, IndexedMesh, MeshBounds};
use tracing::info;

use crate::error::TransformError;

/// Uniformly scale a mesh so its extent along `axis` equals
/// `target_mm`.
///
/// The scale factor is `target_mm / current_extent` and is applied to
/// all three coordinates, so proportions are preserved. Scaling is
/// about the origin, matching how the print pipeline sizes
/// RAS-centered anatomy. Returns the factor that was applied.
///
/// # Errors
///
/// Fails on an empty mesh, a non-positive target, or a mesh that is
/// flat along the reference axis.
///
/// # Example
///
/// ```
/// use mesh_transform::scale_to_length;
/// use mesh_types::{unit_cube, Axis, MeshBounds};
///
/// let mut cube = unit_cube();
/// let factor = scale_to_length(&mut cube, Axis::Y, 120.0).unwrap();
/// assert!((factor - 120.0).abs() < 1e-12);
/// assert!((cube.bounds().extent(Axis::Y) - 120.0).abs() < 1e-9);
/// ```
pub fn scale_to_length(
    mesh: &mut IndexedMesh,
    axis: Axis,
    target_mm: f64,
) -> Result<f64, TransformError> {
    if mesh.vertices.is_empty() {
        return Err(TransformError::EmptyMesh);
    }
    if target_mm <= 0.0 {
        return Err(TransformError::NonPositiveTarget { target: target_mm });
    }

    let extent = mesh.bounds().extent(axis);
    if extent <= 0.0 {
        return Err(TransformError::ZeroExtent { axis });
    }

    let factor = target_mm / extent;
    mesh.scale(factor);

    info!(%axis, target_mm, factor, "scaled mesh to target length");
    Ok(factor)
}
