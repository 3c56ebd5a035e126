//! Rebuilding and structural statistics.
//!
//! Lazy deletion leaves dead routing stubs behind and nothing ever rebalances,
//! so a tree under delete/insert churn gets deeper over time. A rebuild drains
//! the live entries, drops the old nodes, and bulk-loads a fresh tree split at
//! the median on each level.

use crate::config::TreeConfig;
use crate::error::{IndexError, Result};
use crate::tree::{KdTree, Link, Node, Slot, axis_at};
use crate::validation::validate_key;
use kd3_types::{DIMENSIONS, Point};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Shape of a tree at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Live entries.
    pub live: usize,
    /// Dead nodes kept only for routing.
    pub dead: usize,
    /// All nodes, live and dead.
    pub nodes: usize,
    /// Number of nodes on the longest root-to-leaf path.
    pub depth: usize,
}

impl TreeStats {
    /// Fraction of nodes that are dead.
    pub fn dead_ratio(&self) -> f64 {
        if self.nodes == 0 {
            0.0
        } else {
            self.dead as f64 / self.nodes as f64
        }
    }

    /// Depth a median-split tree with the same node count would have.
    pub fn balanced_depth(&self) -> usize {
        (usize::BITS - self.nodes.leading_zeros()) as usize
    }
}

impl<V> KdTree<V> {
    /// Build a tree by inserting entries one at a time, in order.
    ///
    /// Fails on the first duplicate key.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Point, V)>,
    {
        let mut tree = Self::new();
        for (key, value) in entries {
            tree.insert(key, value)?;
        }
        Ok(tree)
    }

    /// Build a median-split tree from a batch of entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kd3::{KdTree, Point};
    ///
    /// let entries: Vec<_> = (0..7)
    ///     .map(|i| (Point::new(i as f64, (6 - i) as f64, (i * 2) as f64), i))
    ///     .collect();
    /// let tree = KdTree::bulk_load(entries)?;
    /// assert_eq!(tree.stats().depth, 3);
    ///
    /// // Keys that share a coordinate must all route left of an equal split,
    /// // so collinear input cannot reach the balanced depth.
    /// let line: Vec<_> = (0..7).map(|i| (Point::new(i as f64, 0.0, 0.0), i)).collect();
    /// assert_eq!(KdTree::bulk_load(line)?.stats().depth, 4);
    /// # Ok::<(), kd3::IndexError>(())
    /// ```
    pub fn bulk_load(mut entries: Vec<(Point, V)>) -> Result<Self> {
        for (key, _) in &entries {
            validate_key(key)?;
        }

        entries.sort_by(|(a, _), (b, _)| lexicographic(a, b));
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(IndexError::DuplicateKey(pair[1].0));
        }

        Ok(Self::build_unique(entries))
    }

    /// Consume the tree, returning every live entry in pre-order.
    pub fn into_entries(mut self) -> Vec<(Point, V)> {
        let mut out = Vec::with_capacity(self.len);
        drain(self.root.take(), &mut out);
        out
    }

    /// Replace the tree with a balanced one holding the same live entries.
    ///
    /// Dead routing nodes are discarded along with the old structure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kd3::{KdTree, Point};
    ///
    /// let mut tree = KdTree::new();
    /// for i in 0..32 {
    ///     tree.insert(Point::new(i as f64, i as f64, i as f64), i)?;
    /// }
    /// for i in 0..16 {
    ///     tree.delete(&Point::new(i as f64, i as f64, i as f64))?;
    /// }
    ///
    /// let tree = tree.rebuild();
    /// let stats = tree.stats();
    /// assert_eq!(stats.live, 16);
    /// assert_eq!(stats.dead, 0);
    /// assert_eq!(stats.depth, 5);
    /// # Ok::<(), kd3::IndexError>(())
    /// ```
    pub fn rebuild(self) -> Self {
        let before = log::log_enabled!(log::Level::Debug).then(|| self.stats());
        let rebuilt = Self::build_unique(self.into_entries());

        if let Some(before) = before {
            log::debug!(
                "Rebuilt tree: {} live entries, {} dead nodes dropped, depth {} -> {}",
                rebuilt.len,
                before.dead,
                before.depth,
                rebuilt.depth()
            );
        }
        rebuilt
    }

    /// Rebuild only when `config` says the tree has degraded enough.
    pub fn rebuild_if_needed(self, config: &TreeConfig) -> Self {
        if self.needs_rebuild(config) {
            self.rebuild()
        } else {
            self
        }
    }

    /// Whether the tree has degraded past the thresholds in `config`.
    pub fn needs_rebuild(&self, config: &TreeConfig) -> bool {
        let stats = self.stats();
        if stats.nodes < config.min_nodes_for_rebuild {
            return false;
        }

        let too_dead = stats.dead_ratio() > config.max_dead_ratio;
        let too_deep = stats.depth as f64 > config.max_depth_factor * stats.balanced_depth() as f64;
        if too_dead || too_deep {
            log::debug!(
                "Rebuild recommended: dead ratio {:.3}, depth {} (balanced {})",
                stats.dead_ratio(),
                stats.depth,
                stats.balanced_depth()
            );
        }
        too_dead || too_deep
    }

    /// Count live and dead nodes and measure depth.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        collect_stats(&self.root, &mut stats);
        stats
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.stats().depth
    }

    /// Build from entries whose keys are known to be unique.
    fn build_unique(entries: Vec<(Point, V)>) -> Self {
        let len = entries.len();
        Self {
            root: build_level(entries, 0),
            len,
        }
    }
}

fn lexicographic(a: &Point, b: &Point) -> Ordering {
    (0..DIMENSIONS)
        .map(|axis| a[axis].partial_cmp(&b[axis]).unwrap_or(Ordering::Equal))
        .find(|order| order.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn build_level<V>(mut entries: Vec<(Point, V)>, depth: usize) -> Link<V> {
    if entries.is_empty() {
        return None;
    }

    let axis = axis_at(depth);
    entries.sort_by(|(a, _), (b, _)| a[axis].partial_cmp(&b[axis]).unwrap_or(Ordering::Equal));

    let mid = split_index(&entries, axis);
    let right = entries.split_off(mid + 1);
    let (key, value) = entries.pop()?;
    let left = entries;

    Some(Box::new(Node {
        key,
        slot: Slot::Live(value),
        left: build_level(left, depth + 1),
        right: build_level(right, depth + 1),
    }))
}

/// Index of the split entry in `entries`, sorted on `axis`.
///
/// Everything after the split must be strictly greater on `axis`, so the split
/// sits at either end of the run of keys equal to the median. The end of the
/// run keeps that run on the left; the entry just before the run pushes it
/// right. Whichever leaves the larger side smaller wins.
fn split_index<V>(entries: &[(Point, V)], axis: usize) -> usize {
    let len = entries.len();
    let median = len / 2;
    let value = entries[median].0[axis];

    let mut last = median;
    while last + 1 < len && entries[last + 1].0[axis] == value {
        last += 1;
    }
    let mut first = median;
    while first > 0 && entries[first - 1].0[axis] == value {
        first -= 1;
    }

    if first == 0 {
        return last;
    }
    let before = first - 1;
    let larger_side = |split: usize| split.max(len - split - 1);
    if larger_side(before) < larger_side(last) {
        before
    } else {
        last
    }
}

/// Moves every live entry into `out` in pre-order.
///
/// Chains left by sorted inserts can be far deeper than the call stack, so
/// the walk keeps its own stack of detached nodes.
fn drain<V>(link: Link<V>, out: &mut Vec<(Point, V)>) {
    let mut stack: Vec<Box<Node<V>>> = link.into_iter().collect();
    while let Some(node) = stack.pop() {
        let Node {
            key,
            slot,
            left,
            right,
        } = *node;

        if let Slot::Live(value) = slot {
            out.push((key, value));
        }
        stack.extend(right);
        stack.extend(left);
    }
}

fn collect_stats<V>(link: &Link<V>, stats: &mut TreeStats) {
    let mut stack: Vec<(&Node<V>, usize)> = link.iter().map(|node| (&**node, 1)).collect();
    while let Some((node, depth)) = stack.pop() {
        stats.nodes += 1;
        if node.is_live() {
            stats.live += 1;
        } else {
            stats.dead += 1;
        }
        stats.depth = stats.depth.max(depth);

        for child in [&node.left, &node.right].into_iter().flatten() {
            stack.push((&**child, depth + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point {
        Point::new(x, y, z)
    }

    fn line(n: u32) -> KdTree<u32> {
        let mut tree = KdTree::new();
        for i in 0..n {
            let f = i as f64;
            tree.insert(p(f, f, f), i).unwrap();
        }
        tree
    }

    #[test]
    fn test_stats_on_degenerate_tree() {
        let mut tree = line(10);
        let stats = tree.stats();
        assert_eq!(stats.nodes, 10);
        assert_eq!(stats.depth, 10);
        assert_eq!(stats.dead, 0);

        tree.delete(&p(0.0, 0.0, 0.0)).unwrap();
        let stats = tree.stats();
        assert_eq!(stats.live, 9);
        assert_eq!(stats.dead, 1);
        assert_eq!(stats.nodes, 10);
        assert!((stats.dead_ratio() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rebuild_drops_dead_and_balances() {
        let mut tree = line(63);
        for i in (0..63).step_by(2) {
            let f = i as f64;
            tree.delete(&p(f, f, f)).unwrap();
        }
        let live_before = tree.len();

        let tree = tree.rebuild();
        let stats = tree.stats();
        assert_eq!(stats.live, live_before);
        assert_eq!(stats.nodes, live_before);
        assert_eq!(stats.dead, 0);
        assert_eq!(stats.depth, stats.balanced_depth());

        for i in (1..63).step_by(2) {
            let f = i as f64;
            assert_eq!(tree.search(&p(f, f, f)), Some(&i));
        }
    }

    #[test]
    fn test_bulk_load_with_shared_axis_values() {
        let entries: Vec<_> = (0..20)
            .map(|i| (p((i % 3) as f64, (i / 3) as f64, 0.0), i))
            .collect();
        let tree = KdTree::bulk_load(entries.clone()).unwrap();

        assert_eq!(tree.len(), 20);
        for (key, value) in &entries {
            assert_eq!(tree.search(key), Some(value));
        }

        // Three keys at x = 0 and seven at x = 1. Splitting after the run of
        // ones would leave nine keys on the left; splitting just before it
        // leaves two and seven.
        let skewed: Vec<_> = (0..10)
            .map(|i| {
                let x = if i < 3 { 0.0 } else { 1.0 };
                (p(x, i as f64, i as f64), i)
            })
            .collect();
        let tree = KdTree::bulk_load(skewed.clone()).unwrap();
        let stats = tree.stats();
        assert_eq!(stats.depth, 4);
        assert_eq!(stats.depth, stats.balanced_depth());
        for (key, value) in &skewed {
            assert_eq!(tree.search(key), Some(value));
        }
        let left_of_split = tree.range(&p(0.0, 0.0, 0.0), &p(0.0, 9.0, 9.0));
        assert_eq!(left_of_split.len(), 3);
    }

    #[test]
    fn test_bulk_load_collinear_keys() {
        let entries: Vec<_> = (0..64).map(|i| (p(i as f64, 0.0, 0.0), i)).collect();
        let tree = KdTree::bulk_load(entries.clone()).unwrap();

        // Only every third level can halve, the other two peel off one key.
        assert_eq!(tree.stats().depth, 12);
        for (key, value) in &entries {
            assert_eq!(tree.search(key), Some(value));
        }
    }

    /// A sorted chain built directly, without paying for quadratic inserts.
    fn deep_chain(n: u32) -> KdTree<u32> {
        let mut link: Link<u32> = None;
        for i in (0..n).rev() {
            let f = i as f64;
            link = Some(Box::new(Node {
                key: p(f, f, f),
                slot: if i % 2 == 0 { Slot::Live(i) } else { Slot::Dead },
                left: None,
                right: link,
            }));
        }
        KdTree {
            root: link,
            len: n.div_ceil(2) as usize,
        }
    }

    #[test]
    fn test_deep_chain_rebuild_and_clear() {
        let n = 60_000;
        let tree = deep_chain(n);

        let stats = tree.stats();
        assert_eq!(stats.nodes, n as usize);
        assert_eq!(stats.depth, n as usize);
        assert_eq!(stats.live, 30_000);
        assert!(tree.needs_rebuild(&TreeConfig::default()));

        let mut tree = tree.rebuild();
        let stats = tree.stats();
        assert_eq!(stats.live, 30_000);
        assert_eq!(stats.dead, 0);
        assert_eq!(stats.depth, stats.balanced_depth());
        assert_eq!(tree.search(&p(59_998.0, 59_998.0, 59_998.0)), Some(&59_998));

        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.stats(), TreeStats::default());

        // Dropping and draining a chain must not recurse either.
        drop(deep_chain(n));
        let drained = deep_chain(n).into_entries();
        assert_eq!(drained.len(), 30_000);
        assert_eq!(drained[0], (p(0.0, 0.0, 0.0), 0));
        assert_eq!(drained[29_999], (p(59_998.0, 59_998.0, 59_998.0), 59_998));
    }

    #[test]
    fn test_bulk_load_rejects_duplicates() {
        let entries = vec![
            (p(1.0, 1.0, 1.0), 0),
            (p(2.0, 2.0, 2.0), 1),
            (p(1.0, 1.0, 1.0), 2),
        ];
        assert_eq!(
            KdTree::bulk_load(entries).unwrap_err(),
            IndexError::DuplicateKey(p(1.0, 1.0, 1.0))
        );
    }

    #[test]
    fn test_from_entries_matches_sequential_inserts() {
        let tree = KdTree::from_entries(vec![(p(0.0, 0.0, 0.0), 'a'), (p(1.0, 0.0, 0.0), 'b')]).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.search(&p(1.0, 0.0, 0.0)), Some(&'b'));
        assert!(KdTree::from_entries(vec![(p(0.0, 0.0, 0.0), 1), (p(0.0, 0.0, 0.0), 2)]).is_err());
    }

    #[test]
    fn test_into_entries_skips_dead() {
        let mut tree = line(5);
        tree.delete(&p(2.0, 2.0, 2.0)).unwrap();
        let values: Vec<u32> = tree.into_entries().into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_needs_rebuild_thresholds() {
        let config = TreeConfig::default().with_min_nodes_for_rebuild(8);

        assert!(!line(4).needs_rebuild(&config));
        // A 32-node chain is far deeper than 4x its balanced depth of 6.
        assert!(line(32).needs_rebuild(&config));

        let balanced = line(32).rebuild();
        assert!(!balanced.needs_rebuild(&config));

        let mut churned = balanced;
        for i in 0..20 {
            let f = i as f64;
            churned.delete(&p(f, f, f)).unwrap();
        }
        let stats = churned.stats();
        assert!(stats.dead_ratio() > 0.0);
        assert_eq!(
            churned.needs_rebuild(&config),
            stats.dead_ratio() > config.max_dead_ratio
        );

        let rebuilt = churned.rebuild_if_needed(&config.clone().with_max_dead_ratio(0.01));
        assert_eq!(rebuilt.stats().dead, 0);
        assert_eq!(rebuilt.len(), 12);
    }

    #[test]
    fn test_rebuild_empty_tree() {
        let tree: KdTree<()> = KdTree::new().rebuild();
        assert!(tree.is_empty());
        assert_eq!(tree.stats(), TreeStats::default());
    }
}
