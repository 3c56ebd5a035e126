//! Three-dimensional k-d tree with lazy deletion, range search, and
//! nearest-neighbor search.
//!
//! ## Features
//! - **Exact keys**: points are compared field-wise with no tolerance
//! - **Lazy deletion**: deleted nodes are marked dead; childless dead nodes are
//!   pruned on the way back up, the rest stay as routing stubs
//! - **Nearest neighbor**: branch-and-bound descent with bounding-region pruning
//! - **Rebuilds**: drain the live entries and bulk-load a balanced tree when
//!   churn has degraded it
//! - **Shared access**: an external lock wrapper behind the `sync` feature
//!
//! ## Rebuild Behavior
//! The tree never rebalances on its own:
//! - Deletes leave dead routing nodes behind when they have children
//! - Re-inserting a deleted key revives its old node in place
//! - [`KdTree::needs_rebuild`] reports when [`TreeConfig`] thresholds are
//!   exceeded; calling [`KdTree::rebuild`] is up to the caller
//!
//! ```rust
//! use kd3::{KdTree, Point, TreeConfig};
//!
//! let mut tree = KdTree::new();
//! tree.insert(Point::new(0.0, 0.0, 0.0), "A")?;
//! tree.insert(Point::new(1.0, 1.0, 1.0), "B")?;
//! tree.insert(Point::new(2.0, 2.0, 2.0), "C")?;
//!
//! // Match once, then remove so the entry cannot be matched again.
//! let (key, value) = tree.take_nearest(&Point::new(0.1, 0.1, 0.1))?;
//! assert_eq!((key, value), (Point::new(0.0, 0.0, 0.0), "A"));
//!
//! let hits = tree.range(&Point::new(0.0, 0.0, 0.0), &Point::new(1.0, 1.0, 1.0));
//! assert_eq!(hits, vec![&"B"]);
//!
//! let tree = tree.rebuild_if_needed(&TreeConfig::default());
//! assert_eq!(tree.len(), 2);
//! # Ok::<(), kd3::IndexError>(())
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod rebuild;
pub mod validation;

mod tree;

#[cfg(feature = "sync")]
pub mod sync;

pub use config::TreeConfig;
pub use error::{IndexError, Result};
pub use index::PointIndex;
pub use rebuild::TreeStats;
pub use tree::{KdTree, Neighbor};

#[cfg(feature = "sync")]
pub use sync::SyncKdTree;

pub use kd3_types::{BoundingRegion, DIMENSIONS, Point};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{IndexError, KdTree, Point, PointIndex, Result};

    #[cfg(feature = "sync")]
    pub use crate::SyncKdTree;

    pub use crate::{BoundingRegion, TreeConfig, TreeStats};
}
