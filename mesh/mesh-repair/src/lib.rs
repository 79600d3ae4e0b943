//! Vertex welding and cleanup for triangle meshes.
//!
//! STL files carry no connectivity, so a loaded mesh has three
//! private vertices per triangle. This crate recovers shared vertices
//! (exactly or within a distance threshold), drops faces that
//! collapse in the process, and compacts away vertices nothing
//! references. Run [`cleanup`] before any operation that walks
//! neighborhoods, smoothing above all.
//!
//! # Example
//!
//! ```
//! use mesh_repair::{cleanup, default_merge_threshold};
//! use mesh_types::{unit_cube, MeshBounds};
//!
//! let mut mesh = unit_cube();
//! let threshold = default_merge_threshold(&mesh.bounds());
//! let summary = cleanup(&mut mesh, threshold);
//! assert!(summary.is_noop());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod repair;

pub use repair::{
    cleanup, default_merge_threshold, merge_close_vertices, remove_duplicate_vertices,
    remove_unreferenced_vertices, CleanupSummary, MAX_MERGE_DISTANCE_MM,
};
