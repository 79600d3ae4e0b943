//! NeuroForge: FreeSurfer surfaces to 3D-printable STL.
//!
//! # Commands
//!
//! - `neuroforge convert` - FreeSurfer surface to STL, optionally
//!   positioned via the T1 volume geometry
//! - `neuroforge smooth` - weld and Laplacian-smooth a mesh
//! - `neuroforge scale` - size a mesh to a physical target length
//! - `neuroforge split` - bisect a mesh at its bounding-box midpoint
//! - `neuroforge merge` - combine two meshes into one
//!
//! Verbosity is controlled through `RUST_LOG` (e.g.
//! `RUST_LOG=debug neuroforge split brain.stl lh.stl rh.stl`).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mesh_split::BoundaryPolicy;
use mesh_types::Axis;
use neuroforge::commands;

/// Convert FreeSurfer cortical surfaces into 3D-printable STL.
#[derive(Parser)]
#[command(name = "neuroforge")]
#[command(about = "FreeSurfer surfaces to 3D-printable STL", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a FreeSurfer surface (e.g. lh.pial) to binary STL
    Convert {
        /// Surface file to convert
        surface: PathBuf,

        /// Output STL path
        output: PathBuf,

        /// T1 volume (.mgz/.mgh) whose geometry positions the surface
        #[arg(long)]
        volume: Option<PathBuf>,

        /// Map into scanner RAS instead of the tkregister frame
        /// (requires --volume with valid RAS geometry)
        #[arg(long, requires = "volume")]
        scanner: bool,
    },

    /// Weld and Laplacian-smooth a mesh
    Smooth {
        /// Input mesh (STL or FreeSurfer surface)
        input: PathBuf,

        /// Output STL path
        output: PathBuf,

        /// Smoothing iterations
        #[arg(long, default_value_t = 100)]
        iterations: u32,

        /// Step size per iteration
        #[arg(long, default_value_t = 0.1)]
        delta: f64,

        /// Uniform neighbor weights instead of scale-dependent ones
        #[arg(long)]
        uniform: bool,
    },

    /// Uniformly scale a mesh to a target length along one axis
    Scale {
        /// Input mesh (STL or FreeSurfer surface)
        input: PathBuf,

        /// Output STL path
        output: PathBuf,

        /// Target extent in mm
        target_mm: f64,

        /// Bounding-box axis the target applies to
        #[arg(long, value_enum, default_value = "y")]
        axis: AxisArg,
    },

    /// Bisect a mesh at its bounding-box midpoint
    Split {
        /// Input mesh (STL or FreeSurfer surface)
        input: PathBuf,

        /// Output STL for the low half
        out_low: PathBuf,

        /// Output STL for the high half
        out_high: PathBuf,

        /// Axis to cut across
        #[arg(long, value_enum, default_value = "x")]
        axis: AxisArg,

        /// What to do with vertices exactly on the cut plane
        #[arg(long, value_enum, default_value = "drop")]
        boundary: BoundaryArg,
    },

    /// Merge two meshes into one STL
    Merge {
        /// First input mesh
        first: PathBuf,

        /// Second input mesh
        second: PathBuf,

        /// Output STL path
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::X => Self::X,
            AxisArg::Y => Self::Y,
            AxisArg::Z => Self::Z,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BoundaryArg {
    /// Drop boundary vertices (strict comparisons)
    Drop,
    /// Assign boundary vertices to the low half
    Low,
    /// Assign boundary vertices to the high half
    High,
}

impl From<BoundaryArg> for BoundaryPolicy {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Drop => Self::Drop,
            BoundaryArg::Low => Self::Low,
            BoundaryArg::High => Self::High,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            surface,
            output,
            volume,
            scanner,
        } => commands::convert(&surface, volume.as_deref(), scanner, &output),
        Commands::Smooth {
            input,
            output,
            iterations,
            delta,
            uniform,
        } => commands::smooth(&input, &output, iterations, delta, uniform),
        Commands::Scale {
            input,
            output,
            target_mm,
            axis,
        } => commands::scale(&input, &output, axis.into(), target_mm),
        Commands::Split {
            input,
            out_low,
            out_high,
            axis,
            boundary,
        } => commands::split(&input, &out_low, &out_high, axis.into(), boundary.into()),
        Commands::Merge {
            first,
            second,
            output,
        } => commands::merge(&first, &second, &output),
    }
}
