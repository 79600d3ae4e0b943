//! Laplacian smoothing for triangle meshes.
//!
//! Cortical surface reconstructions carry voxel-scale staircase
//! artifacts that print badly. This crate provides two smoothing
//! passes to remove them: plain Laplacian smoothing and a
//! scale-dependent variant that weights neighbors by inverse edge
//! length.
//!
//! Smoothing assumes real connectivity. Meshes loaded from STL are
//! triangle soup; weld them first (see `mesh-repair`) or every
//! triangle will shrink independently.
//!
//! # Example
//!
//! ```
//! use mesh_smooth::{smooth_scale_dependent, SmoothParams};
//! use mesh_types::unit_cube;
//!
//! let result = smooth_scale_dependent(&unit_cube(), &SmoothParams::default());
//! assert_eq!(result.iterations, 100);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod adjacency;
pub mod laplacian;

pub use laplacian::{smooth_laplacian, smooth_scale_dependent, SmoothParams, SmoothResult};
