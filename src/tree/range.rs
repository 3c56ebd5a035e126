//! Axis-aligned range search.

use super::{KdTree, Link, axis_at};
use kd3_types::{BoundingRegion, DIMENSIONS, Point};

impl<V> KdTree<V> {
    /// Values of every live entry whose key lies in `[low, high]` on all axes.
    ///
    /// Bounds are inclusive. Results come back in pre-order traversal order,
    /// which callers should not rely on. Passing the unbounded region returns
    /// every live value, which is how a tree is drained for a rebuild.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kd3::{KdTree, Point};
    ///
    /// let mut tree = KdTree::new();
    /// tree.insert(Point::new(0.0, 0.0, 0.0), "A")?;
    /// tree.insert(Point::new(1.0, 1.0, 1.0), "B")?;
    /// tree.insert(Point::new(2.0, 2.0, 2.0), "C")?;
    /// tree.delete(&Point::new(0.0, 0.0, 0.0))?;
    ///
    /// let hits = tree.range(&Point::new(0.0, 0.0, 0.0), &Point::new(1.0, 1.0, 1.0));
    /// assert_eq!(hits, vec![&"B"]);
    /// # Ok::<(), kd3::IndexError>(())
    /// ```
    pub fn range(&self, low: &Point, high: &Point) -> Vec<&V> {
        let mut out = Vec::new();
        Self::range_in(&self.root, low, high, 0, &mut |_, value| out.push(value));
        out
    }

    /// Like [`KdTree::range`], but yields keys alongside values.
    pub fn range_entries(&self, low: &Point, high: &Point) -> Vec<(Point, &V)> {
        let mut out = Vec::new();
        Self::range_in(&self.root, low, high, 0, &mut |key, value| {
            out.push((key, value))
        });
        out
    }

    /// Values of every live entry inside `region`.
    pub fn range_region(&self, region: &BoundingRegion) -> Vec<&V> {
        self.range(region.min(), region.max())
    }

    /// Every live entry, in pre-order.
    pub fn entries(&self) -> Vec<(Point, &V)> {
        let all = BoundingRegion::unbounded();
        self.range_entries(all.min(), all.max())
    }

    fn range_in<'a, F>(link: &'a Link<V>, low: &Point, high: &Point, depth: usize, visit: &mut F)
    where
        F: FnMut(Point, &'a V),
    {
        let Some(node) = link else { return };

        if let Some(value) = node.slot.value()
            && (0..DIMENSIONS).all(|j| low[j] <= node.key[j] && node.key[j] <= high[j])
        {
            visit(node.key, value);
        }

        let axis = axis_at(depth);
        if low[axis] <= node.key[axis] {
            Self::range_in(&node.left, low, high, depth + 1, visit);
        }
        if high[axis] > node.key[axis] {
            Self::range_in(&node.right, low, high, depth + 1, visit);
        }
    }
}
