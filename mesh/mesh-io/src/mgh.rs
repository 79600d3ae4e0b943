//! MGH/MGZ volume header reader.
//!
//! Reads just enough of a FreeSurfer MGH volume (or its gzipped MGZ
//! form) to recover the geometry transforms needed to place surface
//! meshes: voxel dimensions, voxel spacing, direction cosines, and the
//! RAS center. Voxel data itself is never decoded.
//!
//! All header fields are big-endian:
//!
//! ```text
//! i32       version (must be 1)
//! i32       width, height, depth
//! i32       nframes
//! i32       type
//! i32       dof
//! i16       goodRASFlag
//! f32[3]    voxel spacing (mm)          \
//! f32[9]    direction cosines (columns)  | valid when goodRASFlag == 1
//! f32[3]    RAS center                  /
//! ```

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use nalgebra::{Matrix3, Matrix4, Vector3};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Bytes of MGH header needed for geometry.
const GEOMETRY_HEADER_SIZE: usize = 90;

/// Gzip magic bytes, identifying an MGZ file.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Geometry fields of an MGH/MGZ volume header.
#[derive(Debug, Clone, PartialEq)]
pub struct MghHeader {
    /// Volume dimensions (width, height, depth) in voxels.
    pub dims: [u32; 3],
    /// Voxel spacing in mm along each voxel axis.
    pub spacing: Vector3<f64>,
    /// Direction cosines: columns are the RAS directions of the three
    /// voxel axes.
    pub dir_cosines: Matrix3<f64>,
    /// RAS coordinates of the volume center.
    pub center: Vector3<f64>,
    /// Whether the RAS fields above were marked valid in the file.
    pub good_ras: bool,
}

impl MghHeader {
    /// Voxel-to-scanner-RAS affine.
    ///
    /// Returns `None` when the file did not carry valid RAS geometry
    /// (`goodRASFlag != 1`).
    #[must_use]
    pub fn vox2ras(&self) -> Option<Matrix4<f64>> {
        if !self.good_ras {
            return None;
        }

        let scaled = self.dir_cosines * Matrix3::from_diagonal(&self.spacing);
        let half_dims = Vector3::new(
            f64::from(self.dims[0]) / 2.0,
            f64::from(self.dims[1]) / 2.0,
            f64::from(self.dims[2]) / 2.0,
        );
        let translation = self.center - scaled * half_dims;

        let mut affine = Matrix4::identity();
        affine.fixed_view_mut::<3, 3>(0, 0).copy_from(&scaled);
        affine.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Some(affine)
    }

    /// Voxel-to-surface-RAS ("tkregister") affine.
    ///
    /// This is the frame FreeSurfer surface files store coordinates
    /// in: axial LIA orientation with the origin at the volume center,
    /// independent of the scanner geometry.
    #[must_use]
    pub fn vox2ras_tkr(&self) -> Matrix4<f64> {
        let (dx, dy, dz) = (self.spacing.x, self.spacing.y, self.spacing.z);
        let (w, h, d) = (
            f64::from(self.dims[0]),
            f64::from(self.dims[1]),
            f64::from(self.dims[2]),
        );

        Matrix4::new(
            -dx, 0.0, 0.0, dx * w / 2.0,
            0.0, 0.0, dz, -dz * d / 2.0,
            0.0, -dy, 0.0, dy * h / 2.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Affine mapping surface RAS to scanner RAS.
    ///
    /// Composes [`Self::vox2ras`] with the inverse of
    /// [`Self::vox2ras_tkr`]. Returns `None` when scanner geometry is
    /// unavailable or the tkregister matrix is singular (zero
    /// spacing).
    #[must_use]
    pub fn scanner_from_surface(&self) -> Option<Matrix4<f64>> {
        let vox2ras = self.vox2ras()?;
        let tkr_inv = self.vox2ras_tkr().try_inverse()?;
        Some(vox2ras * tkr_inv)
    }
}

/// Read the geometry header of an MGH or MGZ volume.
///
/// Gzipped volumes are detected by magic bytes, not extension, so a
/// `.mgz` file that is actually uncompressed still parses.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is truncated, or has
/// an unsupported version.
///
/// # Example
///
/// ```no_run
/// use mesh_io::read_mgh_header;
///
/// let header = read_mgh_header("subject/mri/T1.mgz").unwrap();
/// let tkr = header.vox2ras_tkr();
/// assert!((tkr[(0, 0)] + header.spacing.x).abs() < 1e-12);
/// ```
pub fn read_mgh_header<P: AsRef<Path>>(path: P) -> IoResult<MghHeader> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;

    let mut magic = [0u8; 2];
    file.read_exact(&mut magic)
        .map_err(|_| IoError::UnexpectedEof {
            needed: 2,
            context: "MGH file magic",
        })?;

    let mut header_bytes = [0u8; GEOMETRY_HEADER_SIZE];
    if magic == GZIP_MAGIC {
        let mut decoder = GzDecoder::new(magic.as_slice().chain(file));
        read_header_bytes(&mut decoder, &mut header_bytes)?;
    } else {
        header_bytes[..2].copy_from_slice(&magic);
        read_header_bytes(&mut file, &mut header_bytes[2..])?;
    }

    let header = parse_header(&header_bytes)?;
    debug!(
        dims = ?header.dims,
        good_ras = header.good_ras,
        "read MGH header"
    );
    Ok(header)
}

fn read_header_bytes<R: Read>(reader: &mut R, buf: &mut [u8]) -> IoResult<()> {
    reader.read_exact(buf).map_err(|_| IoError::UnexpectedEof {
        needed: buf.len(),
        context: "MGH geometry header",
    })
}

fn parse_header(bytes: &[u8; GEOMETRY_HEADER_SIZE]) -> IoResult<MghHeader> {
    let i32_at = |off: usize| {
        let arr: [u8; 4] = bytes[off..off + 4]
            .try_into()
            .unwrap_or([0; 4]);
        i32::from_be_bytes(arr)
    };
    let f32_at = |off: usize| {
        let arr: [u8; 4] = bytes[off..off + 4]
            .try_into()
            .unwrap_or([0; 4]);
        f64::from(f32::from_be_bytes(arr))
    };

    let version = i32_at(0);
    if version != 1 {
        return Err(IoError::invalid_content(format!(
            "unsupported MGH version {version} (expected 1)"
        )));
    }

    let mut dims = [0u32; 3];
    for (i, dim) in dims.iter_mut().enumerate() {
        let raw = i32_at(4 + 4 * i);
        *dim = u32::try_from(raw).map_err(|_| {
            IoError::invalid_content(format!("negative volume dimension {raw}"))
        })?;
    }

    // nframes, type, dof occupy bytes 16..28 and are not needed.
    let good_ras_arr: [u8; 2] = bytes[28..30].try_into().unwrap_or([0; 2]);
    let good_ras = i16::from_be_bytes(good_ras_arr) == 1;

    let spacing = Vector3::new(f32_at(30), f32_at(34), f32_at(38));

    // Direction cosines are stored column by column.
    let mut dir_cosines = Matrix3::identity();
    for col in 0..3 {
        for row in 0..3 {
            dir_cosines[(row, col)] = f32_at(42 + 4 * (col * 3 + row));
        }
    }

    let center = Vector3::new(f32_at(78), f32_at(82), f32_at(86));

    Ok(MghHeader {
        dims,
        spacing,
        dir_cosines,
        center,
        good_ras,
    })
}
