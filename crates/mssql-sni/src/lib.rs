//! # mssql-sni
//!
//! Network handle layer for SQL Server connections.
//!
//! Every physical connection is represented by a [`PhysicalHandle`] that
//! owns a small pool of [`Packet`] buffers. The transport layer rents a
//! packet sized for the frame it needs (header plus payload), reads or
//! writes protocol bytes through it, and hands it back to the same handle.
//!
//! ## Features
//!
//! - Lock-free bounded packet queue per handle (default four packets)
//! - Packet buffers keep their allocation across rents
//! - Every packet is stamped with its creating handle; returning it to any
//!   other handle fails with [`SniError::ForeignPacket`]
//! - Scoped rents ([`PhysicalHandle::rent_scoped`]) that return on drop
//!
//! The socket/stream transport and TDS framing are out of scope here.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handle;
pub mod packet;
pub mod pool;

pub use config::{DEFAULT_POOL_SIZE, PacketPoolConfig};
pub use error::SniError;
pub use handle::{HandleId, PacketGuard, PhysicalHandle, SniHandle};
pub use packet::Packet;
pub use pool::{PacketPool, PacketPoolMetrics};
