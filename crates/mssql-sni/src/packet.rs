//! Reusable network packet buffers.

use bytes::BytesMut;

use crate::handle::HandleId;

/// One unit of network payload exchanged with the server.
///
/// A packet is a single buffer split into a header region of fixed length
/// followed by a data region that fills up to a fixed capacity. Both sizes
/// are chosen when the packet is rented from its handle.
///
/// Packets are created only by a handle's packet pool and remember that
/// handle for their whole life; [`owner`](Self::owner) never changes. Handing
/// a packet back to any other handle is rejected.
#[derive(Debug)]
pub struct Packet {
    owner: HandleId,
    buffer: BytesMut,
    header_length: usize,
    data_capacity: usize,
    read_offset: usize,
    allocated: bool,
}

impl Packet {
    pub(crate) fn new(owner: HandleId) -> Self {
        Self {
            owner,
            buffer: BytesMut::new(),
            header_length: 0,
            data_capacity: 0,
            read_offset: 0,
            allocated: false,
        }
    }

    /// Size the packet for a frame. The header region is zeroed and the data
    /// region starts empty. The backing allocation is kept when large enough.
    pub(crate) fn allocate(&mut self, header_size: usize, data_size: usize) {
        self.buffer.clear();
        self.buffer.reserve(header_size + data_size);
        self.buffer.resize(header_size, 0);
        self.header_length = header_size;
        self.data_capacity = data_size;
        self.read_offset = 0;
        self.allocated = true;
    }

    /// Drop the frame contents but keep the allocation for the next rent.
    pub(crate) fn release(&mut self) {
        self.buffer.clear();
        self.header_length = 0;
        self.data_capacity = 0;
        self.read_offset = 0;
        self.allocated = false;
    }

    /// Handle that created this packet.
    #[must_use]
    pub fn owner(&self) -> HandleId {
        self.owner
    }

    /// Whether the packet is sized for a frame (rented and not yet returned).
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    /// Length of the header region.
    #[must_use]
    pub fn header_len(&self) -> usize {
        self.header_length
    }

    /// Header region.
    #[must_use]
    pub fn header(&self) -> &[u8] {
        &self.buffer[..self.header_length]
    }

    /// Mutable header region, for writing the frame header once the data
    /// length is known.
    pub fn header_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[..self.header_length]
    }

    /// Maximum number of data bytes the packet can hold.
    #[must_use]
    pub fn data_capacity(&self) -> usize {
        self.data_capacity
    }

    /// Number of data bytes written so far.
    #[must_use]
    pub fn data_len(&self) -> usize {
        self.buffer.len() - self.header_length
    }

    /// Whether the data region is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_len() == 0
    }

    /// Whether the data region is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.data_len() >= self.data_capacity
    }

    /// Data region written so far.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.buffer[self.header_length..]
    }

    /// Data bytes not yet consumed by [`take_data`](Self::take_data).
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data_len() - self.read_offset
    }

    /// Header and data as one contiguous frame, ready for the transport.
    #[must_use]
    pub fn frame(&self) -> &[u8] {
        &self.buffer
    }

    /// Append bytes to the data region, stopping at the data capacity.
    ///
    /// Returns the number of bytes copied.
    pub fn append(&mut self, src: &[u8]) -> usize {
        let count = src.len().min(self.data_capacity - self.data_len());
        self.buffer.extend_from_slice(&src[..count]);
        count
    }

    /// Copy unread data bytes into `dst`, advancing the read position.
    ///
    /// Returns the number of bytes copied.
    pub fn take_data(&mut self, dst: &mut [u8]) -> usize {
        let start = self.header_length + self.read_offset;
        let count = dst.len().min(self.remaining());
        dst[..count].copy_from_slice(&self.buffer[start..start + count]);
        self.read_offset += count;
        count
    }
}
