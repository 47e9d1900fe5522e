//! Pool error types.

use thiserror::Error;

/// Errors that can occur when building an object pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Pool capacity must be at least one item.
    #[error("invalid pool capacity: {capacity} (must be greater than zero)")]
    InvalidCapacity {
        /// Requested capacity.
        capacity: usize,
    },
}
