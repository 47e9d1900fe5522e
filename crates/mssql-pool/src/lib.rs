//! # mssql-driver-pool
//!
//! Bounded object pool for hot paths of the SQL Server driver.
//!
//! Parsing result sets and building requests churns through short-lived
//! helper objects. [`ObjectPool`] keeps a bounded stack of idle ones so the
//! steady state allocates nothing, while never growing past its capacity.
//!
//! ## Features
//!
//! - Batch rent/return with one lock acquisition per batch
//! - Factory runs outside the lock when the pool runs dry
//! - Lock-free empty/full pre-checks skip the lock on hot pools
//! - Single-owner semantics: rented objects leave no reference behind
//! - RAII [`PooledObject`] guard for single-object use
//! - Hit/miss metrics for tuning capacity
//!
//! ## Example
//!
//! ```rust
//! use mssql_driver_pool::{ObjectPool, PoolConfig};
//!
//! let pool = ObjectPool::with_config(Vec::<u8>::new, PoolConfig::new().capacity(8))?;
//!
//! let mut slots = [None, None, None];
//! pool.rent(&mut slots);
//! // Use objects...
//! pool.return_slots(&mut slots, true);
//!
//! let metrics = pool.metrics();
//! println!("Pool hit rate: {:.2}", metrics.hit_rate());
//! # Ok::<(), mssql_driver_pool::PoolError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod pool;

// Configuration
pub use config::PoolConfig;

// Error types
pub use error::PoolError;

// Pool types
pub use pool::{ObjectPool, PoolBuilder, PoolMetrics, PoolStatus, PooledObject};
