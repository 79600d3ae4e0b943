//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

use crate::Axis;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB).
///
/// Defined by minimum and maximum corner points. The invariant
/// `min <= max` holds per axis for any box built from points; a
/// degenerate box (`min == max` on some axis) is legal and arises from
/// planar or single-point meshes.
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Axis, Point3};
///
/// let aabb = Aabb::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(10.0, 4.0, 2.0),
/// );
///
/// assert_eq!(aabb.extent(Axis::Y), 4.0);
/// assert_eq!(aabb.midpoint(Axis::X), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from minimum and maximum corners.
    ///
    /// The corners are swapped per axis if min > max.
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create an empty (invalid) AABB.
    ///
    /// An empty AABB has min > max, which is useful as a starting point
    /// for expanding to include points.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create an AABB from an iterator of points.
    ///
    /// Returns an empty AABB if the iterator is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let points = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(10.0, 5.0, 3.0),
    ///     Point3::new(-2.0, 8.0, 1.0),
    /// ];
    ///
    /// let aabb = Aabb::from_points(points.iter());
    /// assert_eq!(aabb.min, Point3::new(-2.0, 0.0, 0.0));
    /// assert_eq!(aabb.max, Point3::new(10.0, 8.0, 3.0));
    /// ```
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Check if the AABB is empty (contains no points).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the size (dimensions) of the AABB.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Get the extent along one axis.
    ///
    /// Zero for a box that is degenerate on that axis.
    #[inline]
    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        axis.component(&self.size())
    }

    /// Get the midpoint coordinate along one axis.
    ///
    /// Computed as `min + (max - min) / 2`, which is the cut coordinate
    /// used by the mesh bisector.
    #[inline]
    #[must_use]
    pub fn midpoint(&self, axis: Axis) -> f64 {
        axis.coord(&self.min) + self.extent(axis) / 2.0
    }

    /// Get the center of the AABB.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Get the diagonal length of the AABB.
    ///
    /// Zero for empty AABBs.
    #[inline]
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.size().norm()
    }

    /// Get the length of the longest edge.
    #[inline]
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }

    /// Expand the AABB to include a point.
    ///
    /// Modifies the AABB in place.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
