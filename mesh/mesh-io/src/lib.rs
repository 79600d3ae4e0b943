//! Mesh and neuroimaging file I/O.
//!
//! This crate reads and writes the file formats the surface-to-print
//! pipeline touches:
//!
//! - **STL** (binary and ASCII): the printable output format, and a
//!   general mesh interchange input
//! - **FreeSurfer triangle surfaces** (`lh.pial`, `rh.white`, ...):
//!   cortical surface reconstructions
//! - **MGH/MGZ volume headers**: geometry transforms of the T1 volume
//!   a surface was reconstructed from (voxel data is not decoded)
//!
//! [`load_mesh`] dispatches on file extension so callers accepting
//! "any mesh" need not care which reader applies.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{load_mesh, save_stl, StlFormat};
//!
//! let mesh = load_mesh("subject/surf/lh.pial").unwrap();
//! save_stl(&mesh, "lh.stl", StlFormat::Binary).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod error;
pub mod freesurfer;
pub mod mgh;
pub mod stl;

pub use error::{IoError, IoResult};
pub use freesurfer::read_surface;
pub use mgh::{read_mgh_header, MghHeader};
pub use stl::{load_stl, save_stl, StlFormat};

use std::path::Path;

use mesh_types::IndexedMesh;

/// FreeSurfer surface extensions `recon-all` produces.
const SURFACE_EXTENSIONS: [&str; 5] = ["pial", "white", "orig", "inflated", "sphere"];

/// Load a mesh from a file, choosing the reader by extension.
///
/// `.stl` files go through the STL loader; FreeSurfer surface
/// extensions (`.pial`, `.white`, `.orig`, `.inflated`, `.sphere`) go
/// through the surface reader. Anything else is an error.
///
/// # Errors
///
/// Returns [`IoError::UnknownFormat`] for unrecognized extensions, or
/// whatever error the chosen reader produces.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("stl") => load_stl(path),
        Some(ext) if SURFACE_EXTENSIONS.contains(&ext) => read_surface(path),
        _ => Err(IoError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}
