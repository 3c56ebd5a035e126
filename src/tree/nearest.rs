//! Branch-and-bound nearest-neighbor search.

use super::{KdTree, Link, Node, axis_at};
use crate::error::{IndexError, Result};
use kd3_types::{BoundingRegion, Point};

/// The closest live entry to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, V> {
    pub key: Point,
    pub value: &'a V,
    pub distance_squared: f64,
}

impl<V> Neighbor<'_, V> {
    /// Euclidean distance from the query point.
    pub fn distance(&self) -> f64 {
        self.distance_squared.sqrt()
    }
}

/// Best candidate found so far during descent.
struct Best<'a, V> {
    node: Option<&'a Node<V>>,
    distance_squared: f64,
}

impl<V> Best<'_, V> {
    /// Whether something at `distance_squared` could still beat the candidate.
    #[inline]
    fn improves(&self, distance_squared: f64) -> bool {
        self.node.is_none() || distance_squared < self.distance_squared
    }
}

impl<V> KdTree<V> {
    /// Value of the live entry closest to `target`.
    ///
    /// Fails with [`IndexError::EmptyTree`] when no live entry exists. When
    /// several entries are equally close, the first one reached by the descent
    /// wins.
    pub fn nearest(&self, target: &Point) -> Result<&V> {
        self.nearest_entry(target).map(|neighbor| neighbor.value)
    }

    /// The live entry closest to `target`, with its key and squared distance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kd3::{KdTree, Point};
    ///
    /// let mut tree = KdTree::new();
    /// tree.insert(Point::new(0.0, 0.0, 0.0), 'a')?;
    /// tree.insert(Point::new(3.0, 4.0, 0.0), 'b')?;
    ///
    /// let hit = tree.nearest_entry(&Point::new(3.0, 4.0, 1.0))?;
    /// assert_eq!(hit.key, Point::new(3.0, 4.0, 0.0));
    /// assert_eq!(hit.value, &'b');
    /// assert_eq!(hit.distance_squared, 1.0);
    /// # Ok::<(), kd3::IndexError>(())
    /// ```
    pub fn nearest_entry(&self, target: &Point) -> Result<Neighbor<'_, V>> {
        if target.has_nan() {
            return Err(IndexError::InvalidCoordinate(format!(
                "Nearest-neighbor target contains NaN: {}",
                target
            )));
        }

        let mut best = Best {
            node: None,
            distance_squared: f64::INFINITY,
        };
        Self::nearest_in(&self.root, target, 0, &BoundingRegion::unbounded(), &mut best);

        let node = best.node.ok_or(IndexError::EmptyTree)?;
        let value = node.slot.value().ok_or(IndexError::EmptyTree)?;
        Ok(Neighbor {
            key: node.key,
            value,
            distance_squared: best.distance_squared,
        })
    }

    /// Remove and return the live entry closest to `target`.
    ///
    /// This is the match-once loop step: find the nearest entry, then delete
    /// it so it cannot be matched again.
    pub fn take_nearest(&mut self, target: &Point) -> Result<(Point, V)> {
        let key = self.nearest_entry(target)?.key;
        let value = self.delete(&key)?;
        Ok((key, value))
    }

    fn nearest_in<'a>(
        link: &'a Link<V>,
        target: &Point,
        depth: usize,
        region: &BoundingRegion,
        best: &mut Best<'a, V>,
    ) {
        let Some(node) = link else { return };

        let axis = axis_at(depth);
        let split = node.key[axis];
        let (left_region, right_region) = region.split_at(axis, split);

        let (nearer, nearer_region, further, further_region) = if target[axis] < split {
            (&node.left, left_region, &node.right, right_region)
        } else {
            (&node.right, right_region, &node.left, left_region)
        };

        Self::nearest_in(nearer, target, depth + 1, &nearer_region, best);

        // Dead nodes still route, they just never become candidates.
        if node.is_live() {
            let distance_squared = node.key.distance_squared(target);
            if best.improves(distance_squared) {
                best.node = Some(&**node);
                best.distance_squared = distance_squared;
            }
        }

        if further.is_some() && best.improves(further_region.distance_squared_to(target)) {
            Self::nearest_in(further, target, depth + 1, &further_region, best);
        }
    }
}
