//! Multi-threaded object pool tests.
//!
//! Every object carries a unique id from the factory. If the pool ever handed
//! the same object to two threads at once, the in-use set would see the id
//! twice.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use mssql_driver_pool::ObjectPool;
use parking_lot::Mutex;

const THREADS: usize = 8;
const ROUNDS: usize = 500;

fn id_pool(capacity: usize) -> (ObjectPool<u64>, Arc<AtomicU64>) {
    let next_id = Arc::new(AtomicU64::new(0));
    let factory_ids = Arc::clone(&next_id);
    let pool = ObjectPool::with_capacity(
        move || factory_ids.fetch_add(1, Ordering::Relaxed),
        capacity,
    )
    .unwrap();
    (pool, next_id)
}

#[test]
fn test_no_object_is_rented_twice() {
    let (pool, _) = id_pool(16);
    let in_use = Mutex::new(HashSet::new());

    thread::scope(|scope| {
        for worker in 0..THREADS {
            let pool = &pool;
            let in_use = &in_use;
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    let batch = 1 + (worker + round) % 4;
                    let mut slots = vec![None; batch];
                    pool.rent(&mut slots);

                    {
                        let mut in_use = in_use.lock();
                        for id in slots.iter().flatten() {
                            assert!(in_use.insert(*id), "object {id} rented twice");
                        }
                    }
                    {
                        let mut in_use = in_use.lock();
                        for id in slots.iter().flatten() {
                            in_use.remove(id);
                        }
                    }

                    pool.return_slots(&mut slots, true);
                    assert!(slots.iter().all(Option::is_none));
                }
            });
        }
    });

    assert!(pool.len() <= pool.capacity());
}

#[test]
fn test_pool_never_exceeds_capacity() {
    let (pool, _) = id_pool(4);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..ROUNDS {
                    let items = pool.rent_vec(3);
                    pool.return_vec(items);
                    assert!(pool.len() <= pool.capacity());
                }
            });
        }
    });

    let metrics = pool.metrics();
    assert_eq!(metrics.rented, (THREADS * ROUNDS * 3) as u64);
    assert_eq!(metrics.rented, metrics.pool_hits + metrics.created);
    assert_eq!(metrics.returned + metrics.discarded, metrics.rented);
    assert!(pool.len() <= 4);
}

#[test]
fn test_factory_runs_only_on_misses() {
    let (pool, next_id) = id_pool(32);

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..ROUNDS {
                    let guard = pool.get();
                    assert!(*guard < 1_000_000);
                }
            });
        }
    });

    // Objects only come from the factory on a miss, and with every thread
    // returning its object each round most rents are served from the pool.
    let metrics = pool.metrics();
    assert_eq!(metrics.created, next_id.load(Ordering::Relaxed));
    assert_eq!(metrics.rented, (THREADS * ROUNDS) as u64);
    assert_eq!(metrics.pool_hits + metrics.created, metrics.rented);
    assert!(metrics.pool_hits > 0);
}

#[test]
fn test_clear_races_with_returns() {
    let (pool, _) = id_pool(8);

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..ROUNDS {
                pool.clear();
            }
        });
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..ROUNDS {
                    let items = pool.rent_vec(2);
                    pool.return_vec(items);
                }
            });
        }
    });

    assert!(pool.len() <= 8);
}
