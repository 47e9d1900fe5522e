//! Network handles and packet ownership.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::PacketPoolConfig;
use crate::error::SniError;
use crate::packet::Packet;
use crate::pool::PacketPool;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a network handle.
///
/// Ids are assigned once at handle creation and never reused, so comparing
/// a packet's owner id with a handle's id is an identity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    pub(crate) fn next() -> Self {
        Self(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Packet management surface of a network handle.
///
/// The transport layer rents a packet sized for the frame it is about to
/// write or read, fills or drains it, and returns it to the same handle.
pub trait SniHandle {
    /// Identity of this handle.
    fn id(&self) -> HandleId;

    /// Rent a packet with `header_size` header bytes and room for
    /// `data_size` data bytes.
    fn rent_packet(&self, header_size: usize, data_size: usize) -> Packet;

    /// Return a packet rented from this handle.
    ///
    /// Fails with [`SniError::ForeignPacket`] if another handle created it.
    fn return_packet(&self, packet: Packet) -> Result<(), SniError>;
}

/// A handle for one physical connection to the server.
///
/// Owns a small [`PacketPool`] so steady-state traffic reuses the same
/// few packet buffers. The handle is `Sync`; packets may be rented and
/// returned from several threads at once.
///
/// # Example
///
/// ```rust
/// use mssql_sni::{PhysicalHandle, SniHandle};
///
/// let handle = PhysicalHandle::new();
///
/// let mut packet = handle.rent_packet(8, 4088);
/// packet.append(b"\x01\x02\x03");
/// // Write packet.frame() to the transport...
/// handle.return_packet(packet)?;
///
/// assert_eq!(handle.packet_pool().len(), 1);
/// # Ok::<(), mssql_sni::SniError>(())
/// ```
#[derive(Debug)]
pub struct PhysicalHandle {
    id: HandleId,
    pool: PacketPool,
}

impl PhysicalHandle {
    /// Create a handle with the default packet pool size.
    #[must_use]
    pub fn new() -> Self {
        let id = HandleId::next();
        Self {
            id,
            pool: PacketPool::from_parts(id, PacketPoolConfig::default()),
        }
    }

    /// Create a handle with a custom packet pool configuration.
    pub fn with_config(config: PacketPoolConfig) -> Result<Self, SniError> {
        let id = HandleId::next();
        let pool = PacketPool::new(id, config)?;
        Ok(Self { id, pool })
    }

    /// Rent a packet that is returned to this handle when the guard drops.
    pub fn rent_scoped(&self, header_size: usize, data_size: usize) -> PacketGuard<'_> {
        PacketGuard {
            packet: Some(self.rent_packet(header_size, data_size)),
            handle: self,
        }
    }

    /// The handle's packet pool.
    #[must_use]
    pub fn packet_pool(&self) -> &PacketPool {
        &self.pool
    }
}

impl Default for PhysicalHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SniHandle for PhysicalHandle {
    fn id(&self) -> HandleId {
        self.id
    }

    fn rent_packet(&self, header_size: usize, data_size: usize) -> Packet {
        self.pool.rent(header_size, data_size)
    }

    fn return_packet(&self, packet: Packet) -> Result<(), SniError> {
        self.pool.give_back(packet)
    }
}

/// A packet rented through [`PhysicalHandle::rent_scoped`].
///
/// The guard borrows the handle that issued it, so the packet can only go
/// back to that handle. Use [`into_packet`](Self::into_packet) to take
/// manual control.
pub struct PacketGuard<'a> {
    packet: Option<Packet>,
    handle: &'a PhysicalHandle,
}

impl PacketGuard<'_> {
    /// Take the packet out of the guard; it will no longer be returned
    /// automatically.
    #[must_use]
    pub fn into_packet(mut self) -> Packet {
        match self.packet.take() {
            Some(packet) => packet,
            None => unreachable!("packet guard already emptied"),
        }
    }
}

impl Deref for PacketGuard<'_> {
    type Target = Packet;

    fn deref(&self) -> &Packet {
        match &self.packet {
            Some(packet) => packet,
            None => unreachable!("packet guard already emptied"),
        }
    }
}

impl DerefMut for PacketGuard<'_> {
    fn deref_mut(&mut self) -> &mut Packet {
        match &mut self.packet {
            Some(packet) => packet,
            None => unreachable!("packet guard already emptied"),
        }
    }
}

impl fmt::Debug for PacketGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketGuard")
            .field("handle", &self.handle.id)
            .field("packet", &self.packet)
            .finish()
    }
}

impl Drop for PacketGuard<'_> {
    fn drop(&mut self) {
        if let Some(packet) = self.packet.take() {
            if let Err(error) = self.handle.return_packet(packet) {
                tracing::error!(%error, "failed to return scoped packet");
            }
        }
    }
}
