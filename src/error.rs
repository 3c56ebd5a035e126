//! Error types for kd3.

use kd3_types::Point;
use thiserror::Error;

/// Errors returned by tree operations.
///
/// Every operation either commits fully or leaves the tree as it was, so an
/// error never implies partial mutation. Retrying is left to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("Dimension mismatch: expected {expected} coordinates, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Duplicate key: {0} is already present")]
    DuplicateKey(Point),
    #[error("Key not found: {0}")]
    KeyNotFound(Point),
    #[error("Tree has no live entries")]
    EmptyTree,
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
