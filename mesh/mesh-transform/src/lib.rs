//! Geometric transforms for triangle meshes.
//!
//! Two operations the surface-to-print pipeline needs:
//!
//! - [`apply_affine`]: move a mesh with a 4x4 homogeneous matrix,
//!   used to place FreeSurfer surfaces via their volume's geometry
//! - [`scale_to_length`]: uniformly size a mesh so one bounding-box
//!   dimension hits a physical target in mm, used to fit prints to a
//!   build plate
//!
//! # Example
//!
//! ```
//! use mesh_transform::scale_to_length;
//! use mesh_types::{unit_cube, Axis, MeshBounds};
//!
//! let mut mesh = unit_cube();
//! scale_to_length(&mut mesh, Axis::Y, 150.0).unwrap();
//! assert!((mesh.bounds().extent(Axis::Y) - 150.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod affine;
pub mod error;
pub mod scale;

pub use affine::apply_affine;
pub use error::TransformError;
pub use scale::scale_to_length;
