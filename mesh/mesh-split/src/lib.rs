//! Axis-aligned midpoint bisection of triangle meshes.
//!
//! Splits a mesh into two halves at the spatial midpoint of its
//! bounding box along a chosen axis. The canonical use is separating a
//! whole-brain surface into left and right hemisphere prints along X.
//!
//! # Semantics
//!
//! - The cut coordinate is `min + (max - min) / 2` on the chosen axis.
//! - Vertices strictly below the cut go to the low half, strictly
//!   above to the high half. Vertices exactly on the cut plane follow
//!   an explicit [`BoundaryPolicy`].
//! - A face survives in a half only if **all three** of its vertices
//!   survive there; faces straddling the cut are discarded. Surviving
//!   faces are re-indexed against the compacted vertex order of their
//!   half, preserving relative vertex order.
//!
//! The halves are independently valid meshes but are *not* closed:
//! the cut leaves an open boundary.
//!
//! # Example
//!
//! ```
//! use mesh_split::{bisect, SplitParams};
//! use mesh_types::{unit_cube, Axis, MeshTopology};
//!
//! let result = bisect(unit_cube(), &SplitParams::along(Axis::X)).unwrap();
//! assert_eq!(result.low.vertex_count(), 4);
//! assert_eq!(result.high.vertex_count(), 4);
//! // Only the x = 0 and x = 1 side quads survive the cut
//! assert_eq!(result.low.face_count() + result.high.face_count(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bisect;
mod error;
mod params;

pub use bisect::{bisect, SplitResult};
pub use error::SplitError;
pub use params::{BoundaryPolicy, SplitParams};
