//! Object pool configuration.

use crate::error::PoolError;

/// Items retained per logical CPU when no capacity is given.
const ITEMS_PER_CPU: usize = 8;

/// Configuration for an [`ObjectPool`](crate::ObjectPool).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of idle items the pool retains.
    ///
    /// Items returned while the pool is full are dropped.
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: num_cpus::get().max(1) * ITEMS_PER_CPU,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pool capacity.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.capacity == 0 {
            return Err(PoolError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scales_with_cpus() {
        let config = PoolConfig::default();
        assert!(config.capacity >= ITEMS_PER_CPU);
        assert_eq!(config.capacity % ITEMS_PER_CPU, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = PoolConfig::new().capacity(0);
        assert_eq!(
            config.validate(),
            Err(PoolError::InvalidCapacity { capacity: 0 })
        );
    }
}
