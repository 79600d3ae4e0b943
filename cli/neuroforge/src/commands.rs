//! Command implementations.
//!
//! Each function is one pipeline stage: load, one or two library
//! calls, save. No state is shared between invocations; chaining
//! happens through files, so stages can be mixed with other tools.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use mesh_io::{load_mesh, read_mgh_header, read_surface, save_stl, StlFormat};
use mesh_repair::{
    cleanup, default_merge_threshold, remove_duplicate_vertices, remove_unreferenced_vertices,
};
use mesh_smooth::{smooth_laplacian, smooth_scale_dependent, SmoothParams};
use mesh_split::{bisect, BoundaryPolicy, SplitParams};
use mesh_transform::{apply_affine, scale_to_length};
use mesh_types::{Axis, MeshBounds, MeshTopology};

/// Convert a FreeSurfer surface to binary STL.
///
/// With a companion volume, vertex coordinates are moved out of the
/// surface's own frame using the volume geometry: by default the
/// tkregister voxel-to-RAS affine, or with `scanner` the full
/// surface-RAS to scanner-RAS transform.
pub fn convert(surface: &Path, volume: Option<&Path>, scanner: bool, output: &Path) -> Result<()> {
    let mut mesh = read_surface(surface)
        .with_context(|| format!("reading surface {}", surface.display()))?;
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "loaded surface"
    );

    if let Some(volume) = volume {
        let header = read_mgh_header(volume)
            .with_context(|| format!("reading volume header {}", volume.display()))?;
        let affine = if scanner {
            match header.scanner_from_surface() {
                Some(affine) => affine,
                None => bail!(
                    "volume {} carries no valid scanner geometry (goodRASFlag unset)",
                    volume.display()
                ),
            }
        } else {
            header.vox2ras_tkr()
        };
        apply_affine(&mut mesh, &affine);
    }

    save_stl(&mesh, output, StlFormat::Binary)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

/// Smooth a mesh and write the result as binary STL.
///
/// Connectivity is recovered first by welding vertices within an
/// automatic, size-derived threshold; STL input is triangle soup and
/// would otherwise not smooth at all.
pub fn smooth(
    input: &Path,
    output: &Path,
    iterations: u32,
    delta: f64,
    uniform: bool,
) -> Result<()> {
    let mut mesh = load_mesh(input)
        .with_context(|| format!("reading mesh {}", input.display()))?;

    let threshold = default_merge_threshold(&mesh.bounds());
    let summary = cleanup(&mut mesh, threshold);
    if !summary.is_noop() {
        info!(%summary, threshold, "recovered connectivity");
    }

    let params = SmoothParams::default()
        .with_iterations(iterations)
        .with_step(delta);
    let result = if uniform {
        smooth_laplacian(&mesh, &params)
    } else {
        smooth_scale_dependent(&mesh, &params)
    };

    save_stl(&result.mesh, output, StlFormat::Binary)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

/// Uniformly scale a mesh so one bounding-box dimension reaches a
/// physical target, and write binary STL.
pub fn scale(input: &Path, output: &Path, axis: Axis, target_mm: f64) -> Result<()> {
    let mut mesh = load_mesh(input)
        .with_context(|| format!("reading mesh {}", input.display()))?;

    let factor = scale_to_length(&mut mesh, axis, target_mm)?;
    info!(factor, "applied scale");

    save_stl(&mesh, output, StlFormat::Binary)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

/// Bisect a mesh at its bounding-box midpoint and write both halves
/// as binary STL.
pub fn split(
    input: &Path,
    out_low: &Path,
    out_high: &Path,
    axis: Axis,
    boundary: BoundaryPolicy,
) -> Result<()> {
    let mesh = load_mesh(input)
        .with_context(|| format!("reading mesh {}", input.display()))?;

    let params = SplitParams::along(axis).with_boundary(boundary);
    let result = bisect(mesh, &params)?;

    if result.dropped_vertices > 0 {
        warn!(
            dropped = result.dropped_vertices,
            midpoint = result.midpoint,
            "vertices on the cut plane were dropped"
        );
    }
    for (half, name) in [(&result.low, "low"), (&result.high, "high")] {
        if half.is_empty() {
            warn!(half = name, "half is empty");
        }
    }

    save_stl(&result.low, out_low, StlFormat::Binary)
        .with_context(|| format!("writing {}", out_low.display()))?;
    save_stl(&result.high, out_high, StlFormat::Binary)
        .with_context(|| format!("writing {}", out_high.display()))?;
    Ok(())
}

/// Merge two meshes into one binary STL, deduplicating shared
/// vertices.
pub fn merge(first: &Path, second: &Path, output: &Path) -> Result<()> {
    let mut mesh = load_mesh(first)
        .with_context(|| format!("reading mesh {}", first.display()))?;
    let other = load_mesh(second)
        .with_context(|| format!("reading mesh {}", second.display()))?;

    mesh.merge(&other);
    let duplicates = remove_duplicate_vertices(&mut mesh);
    let unreferenced = remove_unreferenced_vertices(&mut mesh);
    info!(
        duplicates,
        unreferenced,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "merged meshes"
    );

    save_stl(&mesh, output, StlFormat::Binary)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}
