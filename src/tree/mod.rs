//! Three-dimensional k-d tree with lazy deletion.
//!
//! Each level of the tree splits on one axis, cycling `x, y, z, x, ...` with
//! depth. A key whose coordinate on the splitting axis is strictly greater than
//! the node's routes right; equal or less routes left.
//!
//! Deletion only marks a node dead. A dead node that has no children is pruned
//! on the way back up the delete path; a dead node with any child stays in
//! place as a routing stub. The tree never rebalances, so callers doing heavy
//! delete/insert churn should periodically [`KdTree::rebuild`].

mod nearest;
mod range;

pub use nearest::Neighbor;

use crate::error::{IndexError, Result};
use crate::validation::validate_key;
use kd3_types::{DIMENSIONS, Point};

pub(crate) type Link<V> = Option<Box<Node<V>>>;

/// Splitting axis at a given depth.
#[inline]
pub(crate) fn axis_at(depth: usize) -> usize {
    depth % DIMENSIONS
}

/// Liveness of a node's entry.
#[derive(Debug, Clone)]
pub(crate) enum Slot<V> {
    Live(V),
    Dead,
}

impl<V> Slot<V> {
    pub(crate) fn value(&self) -> Option<&V> {
        match self {
            Slot::Live(value) => Some(value),
            Slot::Dead => None,
        }
    }

    fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Live(value) => Some(value),
            Slot::Dead => None,
        }
    }

    /// Marks the slot dead, returning the value it held.
    fn kill(&mut self) -> Option<V> {
        match std::mem::replace(self, Slot::Dead) {
            Slot::Live(value) => Some(value),
            Slot::Dead => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    pub(crate) key: Point,
    pub(crate) slot: Slot<V>,
    pub(crate) left: Link<V>,
    pub(crate) right: Link<V>,
}

impl<V> Node<V> {
    pub(crate) fn new(key: Point, value: V) -> Self {
        Self {
            key,
            slot: Slot::Live(value),
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        matches!(self.slot, Slot::Live(_))
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Child slot that `key` routes into when compared on `axis`.
    #[inline]
    fn child_for_mut(&mut self, key: &Point, axis: usize) -> &mut Link<V> {
        if key[axis] > self.key[axis] {
            &mut self.right
        } else {
            &mut self.left
        }
    }

    #[inline]
    fn child_for(&self, key: &Point, axis: usize) -> &Link<V> {
        if key[axis] > self.key[axis] {
            &self.right
        } else {
            &self.left
        }
    }
}

/// A 3D k-d tree mapping exact [`Point`] keys to values.
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
///
/// let target = Point::new(0.1, 0.1, 0.1);
/// assert_eq!(tree.nearest(&target)?, &"A");
///
/// tree.delete(&Point::new(0.0, 0.0, 0.0))?;
/// assert_eq!(tree.nearest(&target)?, &"B");
/// # Ok::<(), kd3::IndexError>(())
/// ```
#[derive(Debug, Clone)]
pub struct KdTree<V> {
    pub(crate) root: Link<V>,
    pub(crate) len: usize,
}

impl<V> Default for KdTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for KdTree<V> {
    fn drop(&mut self) {
        free(self.root.take());
    }
}

/// Drops a subtree without recursing, so degenerate chains cannot overflow
/// the stack.
fn free<V>(link: Link<V>) {
    let mut stack: Vec<Box<Node<V>>> = link.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

impl<V> KdTree<V> {
    /// Create an empty tree.
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no live entries.
    ///
    /// A tree can be empty while still holding dead routing nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        free(self.root.take());
        self.len = 0;
    }

    /// Insert a key/value pair.
    ///
    /// If the key matches a dead node exactly, that node is revived with the
    /// new value in place. Inserting a key that is already live fails with
    /// [`IndexError::DuplicateKey`] and leaves the tree untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kd3::{IndexError, KdTree, Point};
    ///
    /// let mut tree = KdTree::new();
    /// let p = Point::new(1.0, 2.0, 3.0);
    /// tree.insert(p, 1)?;
    /// assert_eq!(tree.insert(p, 2), Err(IndexError::DuplicateKey(p)));
    ///
    /// tree.delete(&p)?;
    /// tree.insert(p, 2)?;
    /// assert_eq!(tree.search(&p), Some(&2));
    /// # Ok::<(), IndexError>(())
    /// ```
    pub fn insert(&mut self, key: Point, value: V) -> Result<()> {
        validate_key(&key)?;

        let mut link = &mut self.root;
        let mut depth = 0;
        while let Some(node) = link {
            if node.key == key {
                if node.is_live() {
                    return Err(IndexError::DuplicateKey(key));
                }
                log::trace!("Reviving dead node at {} (depth {})", key, depth);
                node.slot = Slot::Live(value);
                self.len += 1;
                return Ok(());
            }
            link = node.child_for_mut(&key, axis_at(depth));
            depth += 1;
        }

        *link = Some(Box::new(Node::new(key, value)));
        self.len += 1;
        Ok(())
    }

    /// Look up the value stored under an exact key.
    ///
    /// Dead nodes are invisible: a deleted key returns `None` even though its
    /// node may still be in the tree.
    pub fn search(&self, key: &Point) -> Option<&V> {
        self.find(key).and_then(|node| node.slot.value())
    }

    /// Mutable access to the value stored under an exact key.
    pub fn search_mut(&mut self, key: &Point) -> Option<&mut V> {
        let mut link = &mut self.root;
        let mut depth = 0;
        while let Some(node) = link {
            if node.key == *key {
                return node.slot.value_mut();
            }
            let axis = axis_at(depth);
            link = if key[axis] > node.key[axis] {
                &mut node.right
            } else {
                &mut node.left
            };
            depth += 1;
        }
        None
    }

    /// Whether a live entry exists under `key`.
    pub fn contains_key(&self, key: &Point) -> bool {
        self.search(key).is_some()
    }

    /// Delete the live entry under `key`, returning its value.
    ///
    /// The node is marked dead, then every dead childless node on the path is
    /// pruned as the recursion unwinds. A dead node that still has a child is
    /// kept as a routing stub. Deleting a key with no live node fails with
    /// [`IndexError::KeyNotFound`].
    pub fn delete(&mut self, key: &Point) -> Result<V> {
        let mut removed = None;
        self.root = Self::delete_node(self.root.take(), key, 0, &mut removed);

        match removed {
            Some(value) => {
                self.len -= 1;
                Ok(value)
            }
            None => Err(IndexError::KeyNotFound(*key)),
        }
    }

    /// Returns the subtree that should replace `link` after deleting `key`.
    fn delete_node(link: Link<V>, key: &Point, depth: usize, removed: &mut Option<V>) -> Link<V> {
        let mut node = link?;

        if node.key == *key {
            // Keys are unique along a path, so a dead match ends the search.
            *removed = node.slot.kill();
        } else if key[axis_at(depth)] > node.key[axis_at(depth)] {
            node.right = Self::delete_node(node.right.take(), key, depth + 1, removed);
        } else {
            node.left = Self::delete_node(node.left.take(), key, depth + 1, removed);
        }

        if !node.is_live() && node.is_leaf() {
            log::trace!("Pruning dead leaf at {} (depth {})", node.key, depth);
            return None;
        }
        Some(node)
    }

    fn find(&self, key: &Point) -> Option<&Node<V>> {
        let mut link = &self.root;
        let mut depth = 0;
        while let Some(node) = link {
            if node.key == *key {
                return Some(node);
            }
            link = node.child_for(key, axis_at(depth));
            depth += 1;
        }
        None
    }
}
