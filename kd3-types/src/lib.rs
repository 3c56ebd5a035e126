//! # kd3-types
//!
//! Value types shared by the `kd3` spatial index.
//!
//! - **Point**: an exact, `Copy` 3-vector of `f64` with indexable coordinates
//! - **BoundingRegion**: an axis-aligned box used to prune nearest-neighbor descent
//!
//! Both types are serializable with Serde.
//!
//! ## Examples
//!
//! ```rust
//! use kd3_types::point::Point;
//! use kd3_types::region::BoundingRegion;
//!
//! let target = Point::new(5.0, -3.0, 0.5);
//! let region = BoundingRegion::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0));
//! assert_eq!(region.closest_point(&target), Point::new(1.0, 0.0, 0.5));
//! ```

pub mod point;
pub mod region;

pub use point::{DIMENSIONS, Point};
pub use region::BoundingRegion;
