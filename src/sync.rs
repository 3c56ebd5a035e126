//! Shared wrapper for using one tree from several threads.
//!
//! [`KdTree`] has no internal synchronization. `SyncKdTree` serializes access
//! from the outside with a single `Arc<RwLock<KdTree<V>>>` per logical tree.
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! kd3 = { version = "0.1", features = ["sync"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use kd3::{Point, SyncKdTree};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tree = SyncKdTree::new();
//! let writer = tree.clone();
//!
//! let handle = thread::spawn(move || {
//!     writer.insert(Point::new(1.0, 1.0, 1.0), "far").unwrap();
//! });
//! tree.insert(Point::new(0.0, 0.0, 0.0), "near")?;
//! handle.join().unwrap();
//!
//! assert_eq!(tree.nearest(&Point::new(0.1, 0.0, 0.0))?, "near");
//! # Ok(())
//! # }
//! ```

use crate::config::TreeConfig;
use crate::error::Result;
use crate::rebuild::TreeStats;
use crate::tree::KdTree;
use kd3_types::Point;
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe handle to a [`KdTree`].
///
/// - Cloning shares the same tree
/// - Queries take the read lock and may run concurrently
/// - `insert`, `delete`, and rebuilds take the write lock
///
/// Values are returned by clone since no borrow can outlive the lock guard.
#[derive(Debug)]
pub struct SyncKdTree<V> {
    inner: Arc<RwLock<KdTree<V>>>,
}

impl<V> Clone for SyncKdTree<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for SyncKdTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<KdTree<V>> for SyncKdTree<V> {
    fn from(tree: KdTree<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }
}

impl<V> SyncKdTree<V> {
    /// Creates an empty shared tree.
    pub fn new() -> Self {
        KdTree::new().into()
    }

    pub fn insert(&self, key: Point, value: V) -> Result<()> {
        self.inner.write().insert(key, value)
    }

    pub fn delete(&self, key: &Point) -> Result<V> {
        self.inner.write().delete(key)
    }

    /// Finds the nearest live entry and deletes it under one write lock.
    pub fn take_nearest(&self, target: &Point) -> Result<(Point, V)> {
        self.inner.write().take_nearest(target)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn stats(&self) -> TreeStats {
        self.inner.read().stats()
    }

    /// Rebuilds the shared tree in place under the write lock.
    pub fn rebuild(&self) {
        let mut guard = self.inner.write();
        let tree = std::mem::take(&mut *guard);
        *guard = tree.rebuild();
    }

    /// Rebuilds under the write lock when `config` says so. Returns whether a
    /// rebuild happened.
    pub fn rebuild_if_needed(&self, config: &TreeConfig) -> bool {
        let mut guard = self.inner.write();
        if !guard.needs_rebuild(config) {
            return false;
        }
        let tree = std::mem::take(&mut *guard);
        *guard = tree.rebuild();
        true
    }

    /// Runs `f` with shared access to the tree.
    pub fn read<R>(&self, f: impl FnOnce(&KdTree<V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access, so several operations apply as one.
    ///
    /// A nearest-then-delete pair done through separate calls can race with
    /// another writer; doing both inside one `write` cannot.
    pub fn write<R>(&self, f: impl FnOnce(&mut KdTree<V>) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Unwraps the tree if this is the last handle.
    pub fn try_into_inner(self) -> std::result::Result<KdTree<V>, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<V: Clone> SyncKdTree<V> {
    pub fn search(&self, key: &Point) -> Option<V> {
        self.inner.read().search(key).cloned()
    }

    pub fn range(&self, low: &Point, high: &Point) -> Vec<V> {
        self.inner.read().range(low, high).into_iter().cloned().collect()
    }

    pub fn nearest(&self, target: &Point) -> Result<V> {
        self.inner.read().nearest(target).cloned()
    }
}
