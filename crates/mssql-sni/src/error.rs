//! Network interface error types.

use thiserror::Error;

use crate::handle::HandleId;

/// Errors that can occur while managing packets of a network handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SniError {
    /// A packet was returned to a handle other than the one that created it.
    ///
    /// The packet is dropped instead of being pooled.
    #[error("packet owned by handle {packet_owner} returned to handle {handle}")]
    ForeignPacket {
        /// Handle that created the packet.
        packet_owner: HandleId,
        /// Handle the packet was returned to.
        handle: HandleId,
    },

    /// Packet pool size must be at least one packet.
    #[error("invalid packet pool size: {0} (must be greater than zero)")]
    InvalidPoolSize(usize),
}
