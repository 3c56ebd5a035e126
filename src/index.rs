//! Coordinate-slice interface for collaborators.
//!
//! Consumers such as a palette matcher only need four operations and usually
//! hold coordinates as plain slices. [`PointIndex`] takes `&[f64]`, checks the
//! length, and hands back owned values.

use crate::error::Result;
use crate::tree::KdTree;
use crate::validation::{point_from_coords, range_bounds};

/// A point index driven by raw coordinate slices.
///
/// Every method fails with [`crate::IndexError::DimensionMismatch`] when a
/// slice does not hold exactly three coordinates.
///
/// # Examples
///
/// ```rust
/// use kd3::{IndexError, KdTree, PointIndex};
///
/// let mut index: KdTree<&str> = KdTree::new();
/// PointIndex::insert(&mut index, &[255.0, 0.0, 0.0], "red")?;
/// PointIndex::insert(&mut index, &[0.0, 0.0, 255.0], "blue")?;
///
/// assert_eq!(PointIndex::nearest(&index, &[200.0, 10.0, 30.0])?, "red");
/// assert!(matches!(
///     PointIndex::nearest(&index, &[200.0, 10.0]),
///     Err(IndexError::DimensionMismatch { expected: 3, found: 2 })
/// ));
/// # Ok::<(), IndexError>(())
/// ```
pub trait PointIndex<V> {
    fn insert(&mut self, coords: &[f64], value: V) -> Result<()>;

    fn search(&self, coords: &[f64]) -> Result<Option<V>>;

    fn delete(&mut self, coords: &[f64]) -> Result<()>;

    fn range(&self, low: &[f64], high: &[f64]) -> Result<Vec<V>>;

    fn nearest(&self, coords: &[f64]) -> Result<V>;
}

impl<V: Clone> PointIndex<V> for KdTree<V> {
    fn insert(&mut self, coords: &[f64], value: V) -> Result<()> {
        KdTree::insert(self, point_from_coords(coords)?, value)
    }

    fn search(&self, coords: &[f64]) -> Result<Option<V>> {
        let key = point_from_coords(coords)?;
        Ok(KdTree::search(self, &key).cloned())
    }

    fn delete(&mut self, coords: &[f64]) -> Result<()> {
        let key = point_from_coords(coords)?;
        KdTree::delete(self, &key).map(|_| ())
    }

    fn range(&self, low: &[f64], high: &[f64]) -> Result<Vec<V>> {
        let (low, high) = range_bounds(low, high)?;
        Ok(KdTree::range(self, &low, &high).into_iter().cloned().collect())
    }

    fn nearest(&self, coords: &[f64]) -> Result<V> {
        let target = point_from_coords(coords)?;
        KdTree::nearest(self, &target).cloned()
    }
}
