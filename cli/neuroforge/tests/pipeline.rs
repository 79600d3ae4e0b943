//! End-to-end command tests driving the library entry points the
//! binary dispatches to, chained through temporary files.

use std::io::Write;
use std::path::{Path, PathBuf};

use mesh_io::{load_stl, save_stl, StlFormat};
use mesh_types::{unit_cube, Axis, MeshBounds, MeshTopology};
use neuroforge::commands;

fn cube_stl(dir: &Path) -> PathBuf {
    let path = dir.join("cube.stl");
    save_stl(&unit_cube(), &path, StlFormat::Binary).unwrap();
    path
}

/// Minimal FreeSurfer triangle surface: one triangle.
fn write_surface(path: &Path) {
    let mut bytes: Vec<u8> = vec![0xFF, 0xFF, 0xFE];
    bytes.extend_from_slice(b"created by test\n\n");
    bytes.extend_from_slice(&3i32.to_be_bytes());
    bytes.extend_from_slice(&1i32.to_be_bytes());
    for coords in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in coords {
            bytes.extend_from_slice(&c.to_be_bytes());
        }
    }
    for i in [0i32, 1, 2] {
        bytes.extend_from_slice(&i.to_be_bytes());
    }
    std::fs::write(path, bytes).unwrap();
}

/// Conformed-style MGZ: 256^3, 1 mm, LIA cosines, RAS center at the
/// origin, gzipped.
fn write_volume(path: &Path) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1i32.to_be_bytes());
    for _ in 0..3 {
        bytes.extend_from_slice(&256i32.to_be_bytes());
    }
    bytes.extend_from_slice(&1i32.to_be_bytes());
    bytes.extend_from_slice(&3i32.to_be_bytes());
    bytes.extend_from_slice(&0i32.to_be_bytes());
    bytes.extend_from_slice(&1i16.to_be_bytes());
    for _ in 0..3 {
        bytes.extend_from_slice(&1.0f32.to_be_bytes());
    }
    let cols: [[f32; 3]; 3] = [[-1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
    for col in cols {
        for v in col {
            bytes.extend_from_slice(&v.to_be_bytes());
        }
    }
    for _ in 0..3 {
        bytes.extend_from_slice(&0.0f32.to_be_bytes());
    }

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&bytes).unwrap();
    std::fs::write(path, encoder.finish().unwrap()).unwrap();
}

#[test]
fn scale_resizes_to_target_length() {
    let dir = tempfile::tempdir().unwrap();
    let input = cube_stl(dir.path());
    let output = dir.path().join("scaled.stl");

    commands::scale(&input, &output, Axis::Y, 50.0).unwrap();

    let mesh = load_stl(&output).unwrap();
    let bounds = mesh.bounds();
    assert!((bounds.extent(Axis::Y) - 50.0).abs() < 1e-3);
    // Uniform: the other axes scale by the same factor.
    assert!((bounds.extent(Axis::X) - 50.0).abs() < 1e-3);
}

#[test]
fn split_cube_yields_left_and_right_side_faces() {
    let dir = tempfile::tempdir().unwrap();
    let input = cube_stl(dir.path());
    let out_low = dir.path().join("low.stl");
    let out_high = dir.path().join("high.stl");

    commands::split(
        &input,
        &out_low,
        &out_high,
        Axis::X,
        mesh_split::BoundaryPolicy::Drop,
    )
    .unwrap();

    // Only the x = 0 and x = 1 quads survive; every other face
    // straddles the cut.
    let low = load_stl(&out_low).unwrap();
    let high = load_stl(&out_high).unwrap();
    assert_eq!(low.face_count(), 2);
    assert_eq!(high.face_count(), 2);
    assert!(low.bounds().max.x < 0.5);
    assert!(high.bounds().min.x > 0.5);
}

#[test]
fn merge_concatenates_faces() {
    let dir = tempfile::tempdir().unwrap();
    let first = cube_stl(dir.path());

    let mut shifted = unit_cube();
    shifted.translate([5.0, 0.0, 0.0].into());
    let second = dir.path().join("shifted.stl");
    save_stl(&shifted, &second, StlFormat::Binary).unwrap();

    let output = dir.path().join("merged.stl");
    commands::merge(&first, &second, &output).unwrap();

    let merged = load_stl(&output).unwrap();
    assert_eq!(merged.face_count(), 24);
    let bounds = merged.bounds();
    assert!(bounds.min.x.abs() < 1e-5);
    assert!((bounds.max.x - 6.0).abs() < 1e-5);
}

#[test]
fn convert_without_volume_keeps_surface_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let surface = dir.path().join("lh.pial");
    write_surface(&surface);
    let output = dir.path().join("lh.stl");

    commands::convert(&surface, None, false, &output).unwrap();

    let mesh = load_stl(&output).unwrap();
    assert_eq!(mesh.face_count(), 1);
    let bounds = mesh.bounds();
    assert!(bounds.min.x.abs() < 1e-5);
    assert!((bounds.max.y - 1.0).abs() < 1e-5);
}

#[test]
fn convert_with_volume_repositions_vertices() {
    let dir = tempfile::tempdir().unwrap();
    let surface = dir.path().join("lh.pial");
    write_surface(&surface);
    let volume = dir.path().join("T1.mgz");
    write_volume(&volume);
    let output = dir.path().join("lh.stl");

    commands::convert(&surface, Some(&volume), false, &output).unwrap();

    // tkregister affine of the conformed volume maps (0,0,0) to
    // (128,-128,128).
    let mesh = load_stl(&output).unwrap();
    let bounds = mesh.bounds();
    assert!((bounds.max.x - 128.0).abs() < 1e-3);
    assert!((bounds.min.y + 128.0).abs() < 1e-3);
    assert!((bounds.min.z - 127.0).abs() < 1e-3);
}

#[test]
fn convert_to_scanner_frame_matches_tkr_for_centered_volume() {
    // With LIA cosines and a zero RAS center the two frames coincide,
    // so --scanner must produce the same geometry.
    let dir = tempfile::tempdir().unwrap();
    let surface = dir.path().join("lh.pial");
    write_surface(&surface);
    let volume = dir.path().join("T1.mgz");
    write_volume(&volume);

    let out_tkr = dir.path().join("tkr.stl");
    let out_scanner = dir.path().join("scanner.stl");
    commands::convert(&surface, Some(&volume), false, &out_tkr).unwrap();
    commands::convert(&surface, Some(&volume), true, &out_scanner).unwrap();

    let tkr = load_stl(&out_tkr).unwrap();
    let scanner = load_stl(&out_scanner).unwrap();
    for (a, b) in tkr.vertices.iter().zip(&scanner.vertices) {
        assert!((a.position - b.position).norm() < 1e-3);
    }
}

#[test]
fn smooth_shrinks_a_welded_cube() {
    let dir = tempfile::tempdir().unwrap();
    let input = cube_stl(dir.path());
    let output = dir.path().join("smoothed.stl");

    commands::smooth(&input, &output, 10, 0.5, false).unwrap();

    let mesh = load_stl(&output).unwrap();
    assert_eq!(mesh.face_count(), 12);
    assert!(mesh.bounds().max_extent() < 1.0);
}

#[test]
fn smooth_keeps_face_count_with_uniform_weights() {
    let dir = tempfile::tempdir().unwrap();
    let input = cube_stl(dir.path());
    let output = dir.path().join("smoothed.stl");

    commands::smooth(&input, &output, 3, 0.1, true).unwrap();

    let mesh = load_stl(&output).unwrap();
    assert_eq!(mesh.face_count(), 12);
}
