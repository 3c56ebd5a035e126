//! Validation for coordinate input.

use crate::error::{IndexError, Result};
use kd3_types::{DIMENSIONS, Point};

/// Converts a coordinate slice into a [`Point`].
///
/// Any slice that does not hold exactly three values is rejected.
///
/// # Examples
///
/// ```
/// use kd3::validation::point_from_coords;
///
/// assert!(point_from_coords(&[0.0, 1.0, 2.0]).is_ok());
/// assert!(point_from_coords(&[0.0, 1.0]).is_err());
/// ```
pub fn point_from_coords(coords: &[f64]) -> Result<Point> {
    Point::from_slice(coords).ok_or(IndexError::DimensionMismatch {
        expected: DIMENSIONS,
        found: coords.len(),
    })
}

/// Validates a point used as a stored key.
///
/// Infinite coordinates are allowed, NaN is not: a NaN coordinate compares
/// false against every split value and its node could never be found again.
pub fn validate_key(point: &Point) -> Result<()> {
    for axis in 0..DIMENSIONS {
        if point[axis].is_nan() {
            return Err(IndexError::InvalidCoordinate(format!(
                "Key coordinate on axis {} is NaN: {}",
                axis, point
            )));
        }
    }
    Ok(())
}

/// Validates a pair of range bounds.
///
/// Only dimensions are checked; inverted bounds simply match nothing.
pub fn range_bounds(low: &[f64], high: &[f64]) -> Result<(Point, Point)> {
    Ok((point_from_coords(low)?, point_from_coords(high)?))
}
