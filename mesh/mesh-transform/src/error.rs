//! Error types for mesh transforms.

use mesh_types::Axis;
use thiserror::Error;

/// Errors that can occur during mesh transformation.
#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    /// The mesh has no vertices to transform.
    #[error("cannot transform an empty mesh (no vertices)")]
    EmptyMesh,

    /// The mesh is flat along the reference axis, so no finite scale
    /// factor reaches the target length.
    #[error("mesh has zero extent along the {axis} axis")]
    ZeroExtent {
        /// The degenerate reference axis.
        axis: Axis,
    },

    /// The requested target length was zero or negative.
    #[error("target length must be positive, got {target}")]
    NonPositiveTarget {
        /// The rejected target length in mm.
        target: f64,
    },
}
