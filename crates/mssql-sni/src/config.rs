//! Packet pool configuration.

use crate::error::SniError;

/// Packets kept per handle when no size is given.
///
/// A handle rarely has more than a couple of packets in flight (one being
/// written, one being read), so a small pool covers the steady state.
pub const DEFAULT_POOL_SIZE: usize = 4;

/// Configuration for the packet pool embedded in a network handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketPoolConfig {
    /// Maximum number of idle packets kept for reuse.
    pub capacity: usize,
}

impl Default for PacketPoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_SIZE,
        }
    }
}

impl PacketPoolConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of idle packets.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SniError> {
        if self.capacity == 0 {
            return Err(SniError::InvalidPoolSize(self.capacity));
        }
        Ok(())
    }
}
