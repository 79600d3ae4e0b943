//! Error types for mesh splitting.

use thiserror::Error;

/// Errors that can occur during mesh bisection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// The input mesh has no vertices, so no bounding box or midpoint
    /// can be computed.
    #[error("cannot bisect an empty mesh (no vertices)")]
    EmptyMesh,
}
