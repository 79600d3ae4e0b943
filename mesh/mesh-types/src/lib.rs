//! Core mesh types for NeuroForge.
//!
//! This crate provides the foundational types for the surface-to-STL
//! pipeline:
//!
//! - [`Vertex`] - A point in 3D space with an optional normal
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`Axis`] - Coordinate axis selector for split and scale operations
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//! Downstream crates assume millimeters, matching both FreeSurfer
//! surface coordinates (RAS, mm) and STL output for printing.
//!
//! # Coordinate System
//!
//! Right-handed. FreeSurfer inputs arrive in RAS orientation
//! (X: left→right, Y: posterior→anterior, Z: inferior→superior).
//! Face winding is counter-clockwise when viewed from outside, so
//! normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Vertex, IndexedMesh, Point3, MeshTopology};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod axis;
mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use axis::{Axis, AxisParseError};
pub use bounds::Aabb;
pub use mesh::{unit_cube, IndexedMesh};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};
