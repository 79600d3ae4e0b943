//! Coordinate axis selection.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the three coordinate axes.
///
/// Used to select which bounding-box dimension a split or scale
/// operation works along. In RAS-oriented meshes, `X` separates the
/// hemispheres, which is why it is the default split axis.
///
/// # Example
///
/// ```
/// use mesh_types::{Axis, Point3};
///
/// let p = Point3::new(1.0, 2.0, 3.0);
/// assert_eq!(Axis::Y.coord(&p), 2.0);
/// assert_eq!("z".parse::<Axis>(), Ok(Axis::Z));
/// assert!("w".parse::<Axis>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// The X axis (left/right in RAS).
    X,
    /// The Y axis (posterior/anterior in RAS).
    Y,
    /// The Z axis (inferior/superior in RAS).
    Z,
}

impl Axis {
    /// All three axes in order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Get the component index (0, 1, or 2).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Get the coordinate of a point along this axis.
    #[inline]
    #[must_use]
    pub fn coord(self, point: &Point3<f64>) -> f64 {
        point[self.index()]
    }

    /// Get the component of a vector along this axis.
    #[inline]
    #[must_use]
    pub fn component(self, vector: &Vector3<f64>) -> f64 {
        vector[self.index()]
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

/// Error returned when parsing an unrecognized axis selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized axis selector {input:?} (expected x, y, or z)")]
pub struct AxisParseError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Axis {
    type Err = AxisParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            _ => Err(AxisParseError {
                input: s.to_owned(),
            }),
        }
    }
}
