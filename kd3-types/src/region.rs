use crate::point::{DIMENSIONS, Point};
use serde::{Deserialize, Serialize};

/// An axis-aligned box in 3D space.
///
/// A real region keeps `min[i] <= max[i]` on every axis. The unbounded region
/// spans `-inf..=+inf` on all three axes and is where nearest-neighbor descent
/// starts before it is narrowed by each splitting plane.
///
/// # Examples
///
/// ```
/// use kd3_types::point::Point;
/// use kd3_types::region::BoundingRegion;
///
/// let region = BoundingRegion::unbounded();
/// let (left, right) = region.split_at(0, 2.0);
/// assert_eq!(left.max().x(), 2.0);
/// assert_eq!(right.min().x(), 2.0);
/// assert!(left.contains(&Point::new(-1e300, 0.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRegion {
    min: Point,
    max: Point,
}

impl BoundingRegion {
    /// Create a region from its two corners.
    ///
    /// The corners are taken as given; callers are expected to pass
    /// `min[i] <= max[i]`. Use [`BoundingRegion::from_corners`] to normalize
    /// arbitrary corners.
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Create a region spanning any two opposite corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let mut min = [0.0; DIMENSIONS];
        let mut max = [0.0; DIMENSIONS];
        for axis in 0..DIMENSIONS {
            min[axis] = a[axis].min(b[axis]);
            max[axis] = a[axis].max(b[axis]);
        }
        Self::new(min.into(), max.into())
    }

    /// The region covering all of 3D space.
    pub const fn unbounded() -> Self {
        Self::new(
            Point::splat(f64::NEG_INFINITY),
            Point::splat(f64::INFINITY),
        )
    }

    /// Lower corner.
    pub fn min(&self) -> &Point {
        &self.min
    }

    /// Upper corner.
    pub fn max(&self) -> &Point {
        &self.max
    }

    /// Whether every axis spans the whole real line.
    pub fn is_unbounded(&self) -> bool {
        (0..DIMENSIONS).all(|axis| {
            self.min[axis] == f64::NEG_INFINITY && self.max[axis] == f64::INFINITY
        })
    }

    /// Check if a point lies inside the region, boundaries included.
    pub fn contains(&self, point: &Point) -> bool {
        (0..DIMENSIONS).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }

    /// Cut the region with the plane `coord[axis] == value`.
    ///
    /// The left half has its max on `axis` clamped to `value`, the right half
    /// has its min on `axis` clamped to `value`. Both halves keep the plane.
    #[inline]
    pub fn split_at(&self, axis: usize, value: f64) -> (Self, Self) {
        let left = Self::new(self.min, self.max.with_coord(axis, value));
        let right = Self::new(self.min.with_coord(axis, value), self.max);
        (left, right)
    }

    /// The point inside the region closest to `target`.
    ///
    /// Each coordinate of `target` is clamped into `[min, max]` on its axis, so
    /// a target already inside the region maps to itself.
    #[inline]
    pub fn closest_point(&self, target: &Point) -> Point {
        let mut closest = [0.0; DIMENSIONS];
        for (axis, slot) in closest.iter_mut().enumerate() {
            let v = target[axis];
            *slot = if v < self.min[axis] {
                self.min[axis]
            } else if v > self.max[axis] {
                self.max[axis]
            } else {
                v
            };
        }
        closest.into()
    }

    /// Squared distance from `target` to the nearest point of the region.
    #[inline]
    pub fn distance_squared_to(&self, target: &Point) -> f64 {
        self.closest_point(target).distance_squared(target)
    }
}

impl Default for BoundingRegion {
    fn default() -> Self {
        Self::unbounded()
    }
}
