//! Bounded object pool implementation.
//!
//! The pool only amortizes the allocation of the objects themselves. It does
//! not reset, configure, or health-check them; callers hand back objects in
//! whatever state they consider reusable.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::config::PoolConfig;
use crate::error::PoolError;

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A bounded, thread-safe pool of reusable objects.
///
/// Idle objects sit in a fixed-capacity stack guarded by a single mutex.
/// Rent and return work in batches: each batch takes the lock once, no matter
/// how many objects it moves. Objects the pool cannot supply are built by the
/// factory outside the lock, so construction never serializes threads.
///
/// An object handed out by [`rent`](Self::rent) has exactly one owner, the
/// caller, until it is handed back. There is no fairness guarantee about
/// which idle objects a rent receives.
///
/// # Example
///
/// ```rust
/// use mssql_driver_pool::ObjectPool;
///
/// let pool = ObjectPool::with_capacity(|| Vec::<u8>::with_capacity(4096), 16)?;
///
/// let mut buffers = pool.rent_vec(2);
/// buffers[0].extend_from_slice(b"select 1");
/// buffers.iter_mut().for_each(Vec::clear);
/// pool.return_vec(buffers);
///
/// assert_eq!(pool.len(), 2);
/// # Ok::<(), mssql_driver_pool::PoolError>(())
/// ```
pub struct ObjectPool<T> {
    factory: Factory<T>,
    capacity: usize,
    /// Idle objects. Never longer than `capacity`.
    items: Mutex<Vec<T>>,
    /// Mirror of `items.len()` for lock-free emptiness/fullness pre-checks.
    /// Only written while `items` is locked.
    count: AtomicUsize,
    metrics: PoolMetricsInner,
}

/// Internal metrics tracking.
#[derive(Debug, Default)]
struct PoolMetricsInner {
    /// Objects handed out.
    rented: AtomicU64,
    /// Objects handed out from the idle stack.
    pool_hits: AtomicU64,
    /// Objects built by the factory.
    created: AtomicU64,
    /// Objects accepted back into the idle stack.
    returned: AtomicU64,
    /// Objects dropped because the pool was full.
    discarded: AtomicU64,
}

impl<T> ObjectPool<T> {
    /// Create a pool with the default capacity (eight objects per CPU).
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::build(Box::new(factory), PoolConfig::default())
    }

    /// Create a pool retaining at most `capacity` idle objects.
    pub fn with_capacity<F>(factory: F, capacity: usize) -> Result<Self, PoolError>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::with_config(factory, PoolConfig::new().capacity(capacity))
    }

    /// Create a pool from a configuration.
    pub fn with_config<F>(factory: F, config: PoolConfig) -> Result<Self, PoolError>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self::build(Box::new(factory), config))
    }

    fn build(factory: Factory<T>, config: PoolConfig) -> Self {
        let capacity = config.capacity.max(1);
        tracing::info!(capacity, "object pool created");

        Self {
            factory,
            capacity,
            items: Mutex::new(Vec::with_capacity(capacity)),
            count: AtomicUsize::new(0),
            metrics: PoolMetricsInner::default(),
        }
    }

    /// Fill every slot with an object, reusing idle ones first.
    ///
    /// Whatever the slots held before is dropped.
    pub fn rent(&self, slots: &mut [Option<T>]) {
        let wanted = slots.len();
        if wanted == 0 {
            return;
        }

        let mut targets = slots.iter_mut();
        let taken = self.take_idle(wanted, |item| {
            if let Some(slot) = targets.next() {
                *slot = Some(item);
            }
        });
        for slot in targets {
            *slot = Some((self.factory)());
        }

        self.record_rent(wanted, taken);
    }

    /// Rent `count` objects into a new vector.
    #[must_use]
    pub fn rent_vec(&self, count: usize) -> Vec<T> {
        let mut items = Vec::with_capacity(count);
        let taken = self.take_idle(count, |item| items.push(item));
        items.extend((taken..count).map(|_| (self.factory)()));

        self.record_rent(count, taken);
        items
    }

    /// Rent a single object that goes back to the pool when dropped.
    pub fn get(&self) -> PooledObject<'_, T> {
        let mut item = None;
        let taken = self.take_idle(1, |idle| item = Some(idle));
        let item = item.unwrap_or_else(|| (self.factory)());

        self.record_rent(1, taken);
        PooledObject {
            item: Some(item),
            pool: self,
        }
    }

    /// Hand objects back to the pool.
    ///
    /// Objects move out of the leading slots into the pool until it is full,
    /// leaving `None` behind. The rest are dropped and their slots cleared
    /// when `clear_caller` is set, or left with the caller otherwise. Empty
    /// slots are skipped and do not use up pool room.
    ///
    /// Returns the number of objects the pool accepted.
    pub fn return_slots(&self, slots: &mut [Option<T>], clear_caller: bool) -> usize {
        if slots.is_empty() {
            return 0;
        }

        let mut consumed = 0;
        let mut accepted = 0;
        if self.count.load(Ordering::Relaxed) < self.capacity {
            let mut items = self.items.lock();
            let room = self.capacity - items.len();
            for slot in slots.iter_mut() {
                if accepted == room {
                    break;
                }
                consumed += 1;
                if let Some(item) = slot.take() {
                    items.push(item);
                    accepted += 1;
                }
            }
            self.count.store(items.len(), Ordering::Relaxed);
        }

        let mut discarded = 0;
        if clear_caller {
            for slot in &mut slots[consumed..] {
                if slot.take().is_some() {
                    discarded += 1;
                }
            }
        }

        self.record_return(accepted, discarded);
        accepted
    }

    /// Hand a batch of objects back, dropping any the pool has no room for.
    ///
    /// Returns the number of objects the pool accepted.
    pub fn return_vec(&self, mut items: Vec<T>) -> usize {
        if items.is_empty() {
            return 0;
        }

        let mut accepted = 0;
        if self.count.load(Ordering::Relaxed) < self.capacity {
            let mut idle = self.items.lock();
            accepted = (self.capacity - idle.len()).min(items.len());
            idle.extend(items.drain(..accepted));
            self.count.store(idle.len(), Ordering::Relaxed);
        }

        self.record_return(accepted, items.len());
        accepted
    }

    /// Hand a single object back. Returns `false` if the pool was full and
    /// the object was dropped.
    pub fn put(&self, item: T) -> bool {
        let mut accepted = false;
        if self.count.load(Ordering::Relaxed) < self.capacity {
            let mut idle = self.items.lock();
            if idle.len() < self.capacity {
                idle.push(item);
                self.count.store(idle.len(), Ordering::Relaxed);
                accepted = true;
            }
        }

        self.record_return(usize::from(accepted), usize::from(!accepted));
        accepted
    }

    /// Drop every idle object.
    pub fn clear(&self) {
        let mut items = self.items.lock();
        let dropped = items.len();
        items.clear();
        self.count.store(0, Ordering::Relaxed);
        tracing::debug!(dropped, "object pool cleared");
    }

    /// Number of idle objects. Advisory under concurrent use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Whether the pool holds no idle objects. Advisory under concurrent use.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of idle objects retained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the current pool status.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            available: self.len(),
            capacity: self.capacity,
        }
    }

    /// Get pool metrics.
    #[must_use]
    pub fn metrics(&self) -> PoolMetrics {
        let inner = &self.metrics;
        PoolMetrics {
            rented: inner.rented.load(Ordering::Relaxed),
            pool_hits: inner.pool_hits.load(Ordering::Relaxed),
            created: inner.created.load(Ordering::Relaxed),
            returned: inner.returned.load(Ordering::Relaxed),
            discarded: inner.discarded.load(Ordering::Relaxed),
        }
    }

    /// Move up to `wanted` idle objects into `sink` under one lock.
    ///
    /// The unlocked pre-check only skips the lock; the count is re-read under
    /// it, so a stale read costs a wasted acquisition, never a wrong answer.
    fn take_idle(&self, wanted: usize, mut sink: impl FnMut(T)) -> usize {
        if wanted == 0 || self.count.load(Ordering::Relaxed) == 0 {
            return 0;
        }

        let mut items = self.items.lock();
        let taken = items.len().min(wanted);
        let start = items.len() - taken;
        for item in items.drain(start..) {
            sink(item);
        }
        self.count.store(items.len(), Ordering::Relaxed);
        taken
    }

    fn record_rent(&self, rented: usize, taken: usize) {
        let created = rented - taken;
        self.metrics
            .rented
            .fetch_add(rented as u64, Ordering::Relaxed);
        self.metrics
            .pool_hits
            .fetch_add(taken as u64, Ordering::Relaxed);
        self.metrics
            .created
            .fetch_add(created as u64, Ordering::Relaxed);
        tracing::trace!(rented, taken, created, "rented objects");
    }

    fn record_return(&self, accepted: usize, discarded: usize) {
        self.metrics
            .returned
            .fetch_add(accepted as u64, Ordering::Relaxed);
        self.metrics
            .discarded
            .fetch_add(discarded as u64, Ordering::Relaxed);
        tracing::trace!(accepted, discarded, "returned objects");
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("capacity", &self.capacity)
            .field("available", &self.len())
            .finish_non_exhaustive()
    }
}

/// Builder for creating an object pool.
///
/// The object type is inferred from the factory passed to
/// [`build`](Self::build).
///
/// # Example
///
/// ```rust
/// use mssql_driver_pool::PoolBuilder;
///
/// let pool = PoolBuilder::new()
///     .capacity(4)
///     .build(String::new)?;
/// assert_eq!(pool.capacity(), 4);
/// # Ok::<(), mssql_driver_pool::PoolError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PoolBuilder {
    pool_config: PoolConfig,
}

impl PoolBuilder {
    /// Create a new pool builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pool configuration.
    #[must_use]
    pub fn pool_config(mut self, config: PoolConfig) -> Self {
        self.pool_config = config;
        self
    }

    /// Set the maximum number of idle objects.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.pool_config.capacity = capacity;
        self
    }

    /// Build the pool around `factory`.
    pub fn build<T, F>(self, factory: F) -> Result<ObjectPool<T>, PoolError>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        ObjectPool::with_config(factory, self.pool_config)
    }
}

/// Status information about the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Number of idle objects.
    pub available: usize,
    /// Maximum number of idle objects.
    pub capacity: usize,
}

impl PoolStatus {
    /// Percentage of capacity currently held idle.
    #[must_use]
    pub fn fill_percentage(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.available as f64 / self.capacity as f64) * 100.0
    }

    /// Check if a return would be discarded.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.available >= self.capacity
    }
}

/// Metrics collected from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolMetrics {
    /// Objects handed out since the pool was created.
    pub rented: u64,
    /// Rented objects that came from the idle stack.
    pub pool_hits: u64,
    /// Objects built by the factory.
    pub created: u64,
    /// Objects accepted back.
    pub returned: u64,
    /// Returned objects dropped because the pool was full.
    pub discarded: u64,
}

impl PoolMetrics {
    /// Fraction of rented objects served from the pool (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.rented == 0 {
            return 0.0;
        }
        self.pool_hits as f64 / self.rented as f64
    }
}

/// An object rented from an [`ObjectPool`].
///
/// When dropped, the object is handed back to the pool.
/// Use [`detach()`](PooledObject::detach) to keep it instead.
pub struct PooledObject<'a, T> {
    item: Option<T>,
    pool: &'a ObjectPool<T>,
}

impl<T> PooledObject<'_, T> {
    /// Take the object out of the pool's custody.
    ///
    /// It will not be returned when the guard is dropped.
    #[must_use]
    pub fn detach(mut self) -> T {
        match self.item.take() {
            Some(item) => item,
            None => unreachable!("pooled object already taken"),
        }
    }
}

impl<T> Deref for PooledObject<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.item {
            Some(item) => item,
            None => unreachable!("pooled object already taken"),
        }
    }
}

impl<T> DerefMut for PooledObject<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("pooled object already taken"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PooledObject<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PooledObject").field(&self.item).finish()
    }
}

impl<T> Drop for PooledObject<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.put(item);
        }
    }
}
