//! Per-handle packet pool.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_queue::ArrayQueue;

use crate::config::PacketPoolConfig;
use crate::error::SniError;
use crate::handle::HandleId;
use crate::packet::Packet;

/// Bounded pool of idle packets belonging to one network handle.
///
/// Idle packets sit in a lock-free bounded queue, so concurrent rents and
/// returns need no external locking and every dequeue yields a distinct
/// packet. Packets are created on demand when the queue is empty and dropped
/// when it is full.
///
/// A pool is created by its [`PhysicalHandle`](crate::PhysicalHandle) and
/// only accepts packets stamped with that handle's id.
#[derive(Debug)]
pub struct PacketPool {
    owner: HandleId,
    queue: ArrayQueue<Packet>,
    metrics: PacketPoolMetricsInner,
}

#[derive(Debug, Default)]
struct PacketPoolMetricsInner {
    rented: AtomicU64,
    reused: AtomicU64,
    allocated: AtomicU64,
    returned: AtomicU64,
    dropped: AtomicU64,
    rejected: AtomicU64,
}

impl PacketPool {
    pub(crate) fn new(owner: HandleId, config: PacketPoolConfig) -> Result<Self, SniError> {
        config.validate()?;
        Ok(Self::from_parts(owner, config))
    }

    /// Build a pool from a configuration already known to be valid.
    pub(crate) fn from_parts(owner: HandleId, config: PacketPoolConfig) -> Self {
        let capacity = config.capacity.max(1);
        tracing::debug!(handle = %owner, capacity, "packet pool created");
        Self {
            owner,
            queue: ArrayQueue::new(capacity),
            metrics: PacketPoolMetricsInner::default(),
        }
    }

    /// Take an idle packet, or create one owned by this pool's handle, and
    /// size it for `header_size` header bytes and `data_size` data bytes.
    pub(crate) fn rent(&self, header_size: usize, data_size: usize) -> Packet {
        let mut packet = match self.queue.pop() {
            Some(packet) => {
                self.metrics.reused.fetch_add(1, Ordering::Relaxed);
                packet
            }
            None => {
                self.metrics.allocated.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(handle = %self.owner, "allocating new packet");
                Packet::new(self.owner)
            }
        };
        self.metrics.rented.fetch_add(1, Ordering::Relaxed);

        packet.allocate(header_size, data_size);
        packet
    }

    /// Release a packet and queue it for reuse.
    ///
    /// Packets created by another handle are rejected and dropped. A packet
    /// that finds the queue full is dropped as well, which is not an error.
    pub(crate) fn give_back(&self, mut packet: Packet) -> Result<(), SniError> {
        if packet.owner() != self.owner {
            self.metrics.rejected.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                handle = %self.owner,
                packet_owner = %packet.owner(),
                "packet returned to wrong handle"
            );
            return Err(SniError::ForeignPacket {
                packet_owner: packet.owner(),
                handle: self.owner,
            });
        }

        packet.release();
        match self.queue.push(packet) {
            Ok(()) => {
                self.metrics.returned.fetch_add(1, Ordering::Relaxed);
            }
            Err(_packet) => {
                self.metrics.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(handle = %self.owner, "packet pool full, dropping packet");
            }
        }
        Ok(())
    }

    /// Handle this pool belongs to.
    #[must_use]
    pub fn owner(&self) -> HandleId {
        self.owner
    }

    /// Number of idle packets. Advisory under concurrent use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no idle packets are queued. Advisory under concurrent use.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Maximum number of idle packets.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Get pool metrics.
    #[must_use]
    pub fn metrics(&self) -> PacketPoolMetrics {
        let inner = &self.metrics;
        PacketPoolMetrics {
            rented: inner.rented.load(Ordering::Relaxed),
            reused: inner.reused.load(Ordering::Relaxed),
            allocated: inner.allocated.load(Ordering::Relaxed),
            returned: inner.returned.load(Ordering::Relaxed),
            dropped: inner.dropped.load(Ordering::Relaxed),
            rejected: inner.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Metrics collected from a packet pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketPoolMetrics {
    /// Packets handed out.
    pub rented: u64,
    /// Rented packets taken from the idle queue.
    pub reused: u64,
    /// Packets newly created.
    pub allocated: u64,
    /// Packets accepted back into the idle queue.
    pub returned: u64,
    /// Returned packets dropped because the queue was full.
    pub dropped: u64,
    /// Packets refused because another handle owns them.
    pub rejected: u64,
}

impl PacketPoolMetrics {
    /// Fraction of rents served from the idle queue (0.0 to 1.0).
    #[must_use]
    pub fn reuse_rate(&self) -> f64 {
        if self.rented == 0 {
            return 0.0;
        }
        self.reused as f64 / self.rented as f64
    }
}
