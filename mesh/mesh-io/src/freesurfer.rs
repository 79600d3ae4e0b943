//! FreeSurfer triangle surface reader.
//!
//! Reads the binary surface files FreeSurfer's `recon-all` produces
//! (`lh.pial`, `rh.white`, and friends). The format is big-endian:
//!
//! ```text
//! u8[3]     magic (0xFF 0xFF 0xFE for triangle surfaces)
//! str       creator line ending in '\n', then one optional extra '\n'
//! i32       vertex count
//! i32       face count
//! f32[3] x vertex count    vertex coordinates (surface RAS, mm)
//! i32[3] x face count      triangle vertex indices
//! ```
//!
//! Quad surfaces (magics 0xFF 0xFF 0xFF and 0xFF 0xFF 0xFD) are
//! rejected; `recon-all` has not emitted them for years.
//!
//! Coordinates are in FreeSurfer's *surface RAS* frame, centered on
//! the volume midpoint rather than the scanner isocenter. Apply the
//! companion volume's `vox2ras_tkr`-derived transform (see
//! [`crate::mgh`]) to position the surface in scanner space.

use std::path::Path;

use mesh_types::{IndexedMesh, Vertex};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Magic bytes identifying a triangle surface file.
const TRIANGLE_MAGIC: [u8; 3] = [0xFF, 0xFF, 0xFE];

/// Read a FreeSurfer triangle surface file into a mesh.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a triangle
/// surface, is truncated, or contains out-of-range face indices.
///
/// # Example
///
/// ```no_run
/// use mesh_io::read_surface;
/// use mesh_types::MeshTopology;
///
/// let mesh = read_surface("subject/surf/lh.pial").unwrap();
/// println!("{} vertices", mesh.vertex_count());
/// ```
pub fn read_surface<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;

    parse_surface(&bytes)
}

/// Cursor over a big-endian byte buffer.
struct BeCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BeCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize, context: &'static str) -> IoResult<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(IoError::UnexpectedEof {
                needed: self.pos + n - self.bytes.len(),
                context,
            }),
        }
    }

    fn read_i32(&mut self, context: &'static str) -> IoResult<i32> {
        let bytes = self.take(4, context)?;
        let arr: [u8; 4] = bytes
            .try_into()
            .map_err(|_| IoError::invalid_content("internal cursor error"))?;
        Ok(i32::from_be_bytes(arr))
    }

    fn read_f32(&mut self, context: &'static str) -> IoResult<f32> {
        let bytes = self.take(4, context)?;
        let arr: [u8; 4] = bytes
            .try_into()
            .map_err(|_| IoError::invalid_content("internal cursor error"))?;
        Ok(f32::from_be_bytes(arr))
    }
}

fn parse_surface(bytes: &[u8]) -> IoResult<IndexedMesh> {
    let mut cursor = BeCursor::new(bytes);

    let magic = cursor.take(3, "surface magic")?;
    if magic != TRIANGLE_MAGIC {
        let mut found = [0u8; 3];
        found.copy_from_slice(magic);
        return Err(IoError::UnsupportedSurface { magic: found });
    }

    skip_creator_line(&mut cursor)?;

    let vertex_count = cursor.read_i32("vertex count")?;
    let face_count = cursor.read_i32("face count")?;
    if vertex_count < 0 || face_count < 0 {
        return Err(IoError::invalid_content(format!(
            "negative element count: {vertex_count} vertices, {face_count} faces"
        )));
    }
    #[allow(clippy::cast_sign_loss)]
    let (vertex_count, face_count) = (vertex_count as usize, face_count as usize);

    let mut mesh = IndexedMesh::with_capacity(vertex_count, face_count);

    for _ in 0..vertex_count {
        let x = cursor.read_f32("vertex coordinates")?;
        let y = cursor.read_f32("vertex coordinates")?;
        let z = cursor.read_f32("vertex coordinates")?;
        mesh.vertices
            .push(Vertex::from_coords(f64::from(x), f64::from(y), f64::from(z)));
    }

    for _ in 0..face_count {
        let mut face = [0u32; 3];
        for slot in &mut face {
            let index = cursor.read_i32("face indices")?;
            let index = u32::try_from(index).map_err(|_| IoError::invalid_content(
                format!("negative face index {index}"),
            ))?;
            if index as usize >= vertex_count {
                return Err(IoError::FaceIndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
            *slot = index;
        }
        mesh.faces.push(face);
    }

    debug!(
        vertices = vertex_count,
        faces = face_count,
        "read FreeSurfer surface"
    );
    Ok(mesh)
}

/// The creator string ends with '\n'; most files pad with a second
/// '\n' immediately after, which must also be consumed.
fn skip_creator_line(cursor: &mut BeCursor<'_>) -> IoResult<()> {
    loop {
        let byte = cursor.take(1, "creator string")?[0];
        if byte == b'\n' {
            break;
        }
    }
    if cursor.bytes.get(cursor.pos) == Some(&b'\n') {
        cursor.pos += 1;
    }
    Ok(())
}
