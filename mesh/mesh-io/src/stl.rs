//! STL (stereolithography) file format support.
//!
//! Binary STL is the terminal output format of every pipeline here;
//! ASCII is accepted on input for convenience. The loader detects the
//! variant automatically: ASCII files start with `solid` and contain
//! no NUL bytes in their first 80 bytes, anything else is treated as
//! binary.
//!
//! # Binary layout
//!
//! ```text
//! u8[80]    header (ignored)
//! u32       triangle count (little-endian)
//! per triangle:
//!     f32[3]  normal
//!     f32[3]  vertex 0
//!     f32[3]  vertex 1
//!     f32[3]  vertex 2
//!     u16     attribute byte count (0)
//! ```
//!
//! STL stores no connectivity: each triangle carries its own three
//! vertices, so loaded meshes are triangle soup. Use `mesh-repair` to
//! weld shared vertices when connectivity matters (e.g. before
//! smoothing).

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use mesh_types::{IndexedMesh, MeshTopology, Vertex};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL.
const RECORD_SIZE: usize = 50;

/// Output variant for [`save_stl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    /// Compact binary STL (the default; preferred for printing).
    #[default]
    Binary,
    /// Human-readable ASCII STL.
    Ascii,
}

/// Load a mesh from an STL file, detecting ASCII vs binary.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid STL.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_stl;
///
/// let mesh = load_stl("model.stl").unwrap();
/// println!("loaded {} faces", mesh.faces.len());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<IndexedMesh> {
    let path = path.as_ref();
    let file = open_file(path)?;
    let mut reader = BufReader::new(file);

    let mut prefix = [0u8; HEADER_SIZE + 4];
    let got = read_up_to(&mut reader, &mut prefix)?;
    if got < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    if looks_ascii(&prefix[..got.min(HEADER_SIZE)]) {
        // Re-open so line-based parsing starts from byte 0.
        let reader = BufReader::new(open_file(path)?);
        parse_ascii(reader)
    } else {
        parse_binary(&prefix[..got], reader)
    }
}

fn open_file(path: &Path) -> IoResult<File> {
    File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })
}

/// Read as many bytes as available, up to the buffer size.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> IoResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// ASCII starts with "solid"; binary headers that happen to start with
/// "solid" almost always contain NUL padding, so NULs force binary.
fn looks_ascii(prefix: &[u8]) -> bool {
    let text = String::from_utf8_lossy(prefix);
    text.trim_start().starts_with("solid") && !prefix.contains(&0)
}

fn parse_binary<R: Read>(prefix: &[u8], mut reader: R) -> IoResult<IndexedMesh> {
    if prefix.len() < HEADER_SIZE + 4 {
        return Err(IoError::UnexpectedEof {
            needed: HEADER_SIZE + 4 - prefix.len(),
            context: "binary STL header",
        });
    }

    let count_bytes: [u8; 4] = prefix[HEADER_SIZE..HEADER_SIZE + 4]
        .try_into()
        .map_err(|_| IoError::invalid_content("malformed STL face count"))?;
    let face_count = u32::from_le_bytes(count_bytes) as usize;

    let mut mesh = IndexedMesh::with_capacity(face_count * 3, face_count);
    let mut record = [0u8; RECORD_SIZE];

    for _ in 0..face_count {
        reader
            .read_exact(&mut record)
            .map_err(|_| IoError::UnexpectedEof {
                needed: RECORD_SIZE,
                context: "binary STL triangle record",
            })?;

        // Skip the stored normal (bytes 0..12); it is recomputed from
        // winding on save and frequently wrong in the wild.
        push_soup_triangle(
            &mut mesh,
            vertex_from_le(&record[12..24]),
            vertex_from_le(&record[24..36]),
            vertex_from_le(&record[36..48]),
        );
    }

    debug!(faces = mesh.faces.len(), "loaded binary STL");
    Ok(mesh)
}

fn vertex_from_le(buf: &[u8]) -> Vertex {
    let coord = |off: usize| {
        let bytes: [u8; 4] = buf[off..off + 4].try_into().unwrap_or([0; 4]);
        f64::from(f32::from_le_bytes(bytes))
    };
    Vertex::from_coords(coord(0), coord(4), coord(8))
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: mesh indices are u32, meshes beyond u32 vertices are unsupported
fn push_soup_triangle(mesh: &mut IndexedMesh, v0: Vertex, v1: Vertex, v2: Vertex) {
    let base = mesh.vertices.len() as u32;
    mesh.vertices.push(v0);
    mesh.vertices.push(v1);
    mesh.vertices.push(v2);
    mesh.faces.push([base, base + 1, base + 2]);
}

fn parse_ascii<R: BufRead>(reader: R) -> IoResult<IndexedMesh> {
    let mut mesh = IndexedMesh::new();
    let mut pending: Vec<Vertex> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "vertex" => {
                let mut coord = || -> IoResult<f64> {
                    tokens
                        .next()
                        .ok_or_else(|| IoError::invalid_content("vertex line with fewer than 3 coordinates"))?
                        .parse::<f64>()
                        .map_err(IoError::from)
                };
                let (x, y, z) = (coord()?, coord()?, coord()?);
                pending.push(Vertex::from_coords(x, y, z));
            }
            "endfacet" => {
                if pending.len() == 3 {
                    let [v2, v1, v0] = [
                        pending.pop(),
                        pending.pop(),
                        pending.pop(),
                    ];
                    if let (Some(v0), Some(v1), Some(v2)) = (v0, v1, v2) {
                        push_soup_triangle(&mut mesh, v0, v1, v2);
                    }
                }
                pending.clear();
            }
            "endsolid" => break,
            // facet / outer / endloop / solid carry no geometry we need
            _ => {}
        }
    }

    debug!(faces = mesh.faces.len(), "loaded ASCII STL");
    Ok(mesh)
}

/// Save a mesh to an STL file.
///
/// Face normals are recomputed from winding; degenerate faces get a
/// zero normal, which printers tolerate.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use mesh_io::{load_stl, save_stl, StlFormat};
///
/// let mesh = load_stl("input.stl").unwrap();
/// save_stl(&mesh, "output.stl", StlFormat::Binary).unwrap();
/// ```
pub fn save_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, format: StlFormat) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    match format {
        StlFormat::Binary => write_binary(mesh, &mut writer)?,
        StlFormat::Ascii => write_ascii(mesh, &mut writer)?,
    }
    writer.flush()?;

    debug!(faces = mesh.faces.len(), ?format, "saved STL");
    Ok(())
}

fn write_binary<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    let mut header = [0u8; HEADER_SIZE];
    let text = b"neuroforge binary STL";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: face counts beyond u32 are unrepresentable in STL
    let face_count = mesh.faces.len() as u32;
    writer.write_all(&face_count.to_le_bytes())?;

    let mut record = [0u8; RECORD_SIZE];
    for tri in mesh.triangles() {
        let normal = tri.normal().unwrap_or_else(nalgebra::Vector3::zeros);

        let mut off = 0;
        let mut put = |v: f64| {
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: STL stores f32 by definition
            let bytes = (v as f32).to_le_bytes();
            record[off..off + 4].copy_from_slice(&bytes);
            off += 4;
        };
        for v in [normal.x, normal.y, normal.z] {
            put(v);
        }
        for p in [tri.v0, tri.v1, tri.v2] {
            for v in [p.x, p.y, p.z] {
                put(v);
            }
        }
        record[48..50].copy_from_slice(&0u16.to_le_bytes());
        writer.write_all(&record)?;
    }

    Ok(())
}

fn write_ascii<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "solid neuroforge")?;

    for tri in mesh.triangles() {
        let n = tri.normal().unwrap_or_else(nalgebra::Vector3::zeros);
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for p in [tri.v0, tri.v1, tri.v2] {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid neuroforge")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    fn triangle_mesh() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh
    }

    #[test]
    fn roundtrip_binary() {
        let original = unit_cube();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.stl");

        save_stl(&original, &path, StlFormat::Binary).unwrap();
        let loaded = load_stl(&path).unwrap();

        // Triangle soup: 3 vertices per face
        assert_eq!(loaded.face_count(), original.face_count());
        assert_eq!(loaded.vertex_count(), original.face_count() * 3);
        assert!((loaded.signed_volume() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn roundtrip_ascii() {
        let original = triangle_mesh();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri_ascii.stl");

        save_stl(&original, &path, StlFormat::Ascii).unwrap();
        let loaded = load_stl(&path).unwrap();

        assert_eq!(loaded.face_count(), 1);
        let v1 = &loaded.vertices[1].position;
        assert!((v1.x - 1.0).abs() < 1e-5);
        assert!(v1.y.abs() < 1e-5);
    }

    #[test]
    fn load_nonexistent_file() {
        let result = load_stl("no_such_file_872.stl");
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn truncated_binary_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.stl");

        // Header claims 5 faces but provides none.
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes.extend_from_slice(&5u32.to_le_bytes());
        std::fs::write(&path, &bytes).unwrap();

        let result = load_stl(&path);
        assert!(matches!(result, Err(IoError::UnexpectedEof { .. })));
    }

    #[test]
    fn ascii_parsing_from_text() {
        let ascii = b"solid test\n\
              facet normal 0 0 1\n\
                outer loop\n\
                  vertex 0 0 0\n\
                  vertex 1 0 0\n\
                  vertex 0 1 0\n\
                endloop\n\
              endfacet\n\
            endsolid test\n";

        let mesh = parse_ascii(BufReader::new(&ascii[..])).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
        assert!((mesh.vertices[2].position.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn binary_detection_despite_solid_header() {
        // A binary file whose header starts with "solid" must still
        // parse as binary (NUL padding gives it away).
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sneaky.stl");

        let mesh = triangle_mesh();
        save_stl(&mesh, &path, StlFormat::Binary).unwrap();
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[..5].copy_from_slice(b"solid");
        std::fs::write(&path, &bytes).unwrap();

        let loaded = load_stl(&path).unwrap();
        assert_eq!(loaded.face_count(), 1);
    }
}
