use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Number of coordinates in every [`Point`].
pub const DIMENSIONS: usize = 3;

/// A point in 3D space.
///
/// Points are plain values: they are copied rather than shared, and equality is
/// exact field-wise `f64` equality with no tolerance. Coordinates are reachable
/// by axis index (`p[0]`, `p[1]`, `p[2]`) as well as by name.
///
/// # Examples
///
/// ```
/// use kd3_types::point::Point;
///
/// let p = Point::new(1.0, 2.0, 3.0);
/// assert_eq!(p[1], 2.0);
/// assert_eq!(p.z(), 3.0);
/// assert_ne!(p, Point::new(1.0, 2.0, 3.0 + f64::EPSILON * 4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    coords: [f64; DIMENSIONS],
}

impl Point {
    /// Create a new point from x, y, and z coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { coords: [x, y, z] }
    }

    /// The origin `(0, 0, 0)`.
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// A point with every coordinate set to `value`.
    pub const fn splat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Build a point from a coordinate slice.
    ///
    /// Returns `None` unless the slice holds exactly three values.
    ///
    /// # Examples
    ///
    /// ```
    /// use kd3_types::point::Point;
    ///
    /// assert_eq!(Point::from_slice(&[1.0, 2.0, 3.0]), Some(Point::new(1.0, 2.0, 3.0)));
    /// assert_eq!(Point::from_slice(&[1.0, 2.0]), None);
    /// ```
    pub fn from_slice(coords: &[f64]) -> Option<Self> {
        let coords: [f64; DIMENSIONS] = coords.try_into().ok()?;
        Some(Self { coords })
    }

    /// Get the x coordinate.
    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    /// Get the y coordinate.
    pub fn y(&self) -> f64 {
        self.coords[1]
    }

    /// Get the z coordinate.
    pub fn z(&self) -> f64 {
        self.coords[2]
    }

    /// Coordinate on the given axis.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= 3`.
    #[inline]
    pub fn coord(&self, axis: usize) -> f64 {
        self.coords[axis]
    }

    /// Copy of this point with one coordinate replaced.
    #[inline]
    pub fn with_coord(mut self, axis: usize, value: f64) -> Self {
        self.coords[axis] = value;
        self
    }

    /// Borrow the coordinates as an array.
    pub fn as_array(&self) -> &[f64; DIMENSIONS] {
        &self.coords
    }

    /// Consume the point, returning its coordinates.
    pub fn into_array(self) -> [f64; DIMENSIONS] {
        self.coords
    }

    /// Whether any coordinate is NaN.
    pub fn has_nan(&self) -> bool {
        self.coords.iter().any(|c| c.is_nan())
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Nearest-neighbor search compares squared distances so that no square
    /// root is taken on the hot path.
    ///
    /// # Examples
    ///
    /// ```
    /// use kd3_types::point::Point;
    ///
    /// let a = Point::new(0.0, 0.0, 0.0);
    /// let b = Point::new(3.0, 4.0, 12.0);
    /// assert_eq!(a.distance_squared(&b), 169.0);
    /// ```
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> f64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::origin()
    }
}

impl Index<usize> for Point {
    type Output = f64;

    #[inline]
    fn index(&self, axis: usize) -> &f64 {
        &self.coords[axis]
    }
}

impl From<[f64; DIMENSIONS]> for Point {
    fn from(coords: [f64; DIMENSIONS]) -> Self {
        Self { coords }
    }
}

impl From<(f64, f64, f64)> for Point {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point> for [f64; DIMENSIONS] {
    fn from(point: Point) -> Self {
        point.coords
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
    }
}
