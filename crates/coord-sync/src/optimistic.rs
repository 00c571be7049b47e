//! Optimistic compare-and-swap retry cells.
//!
//! The canonical alternative to a mutex for simple shared state: read a
//! snapshot, apply a pure transform, CAS the result in, and retry from a
//! fresh read if another writer won the race. Contention is resolved
//! internally by retrying and never surfaces as an error; every logical
//! `update` call installs its transform exactly once.
//!
//! Two shapes are provided:
//!
//! - [`OptimisticCell`] holds an arbitrary `T` behind an epoch-managed
//!   pointer (crossbeam-epoch), swapping whole immutable values.
//! - [`OptimisticCounter`] is the scalar specialization over a plain
//!   atomic word, and is the one exercised by loom interleaving tests.
//!
//! # Transform purity
//!
//! The transform passed to `update` may run more than once per call: it
//! re-executes after every lost race. It must be free of side effects
//! observable outside the retry loop. Nothing enforces this; it is a
//! documented precondition.

#[cfg(loom)]
use loom::sync::atomic::AtomicU64;
#[cfg(not(loom))]
use std::sync::atomic::AtomicU64;

use std::sync::atomic::Ordering;

use crossbeam_epoch::{self as epoch, Atomic, Owned};

/// Shared value updated only through read-modify-write CAS.
///
/// The stored value is immutable once installed; `update` replaces the
/// whole value and retires the old one through epoch reclamation, so
/// concurrent readers never observe a torn write.
pub struct OptimisticCell<T> {
    value: Atomic<T>,
}

impl<T> OptimisticCell<T> {
    /// Create a cell holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            value: Atomic::new(initial),
        }
    }
}

impl<T: Clone> OptimisticCell<T> {
    /// Read a snapshot of the current value.
    ///
    /// The snapshot may be stale by the time the caller looks at it;
    /// that is inherent to the optimistic pattern.
    pub fn load(&self) -> T {
        let guard = epoch::pin();
        let current = self.value.load(Ordering::Acquire, &guard);
        // Safety: the cell always holds a non-null value and the guard
        // keeps it alive past any concurrent retirement.
        unsafe { current.deref() }.clone()
    }

    /// Apply a pure transform to the current value and return the value
    /// this call installed.
    ///
    /// `transform` may execute multiple times (see module docs); the
    /// returned value corresponds to exactly one successful CAS.
    pub fn update<F>(&self, transform: F) -> T
    where
        F: Fn(&T) -> T,
    {
        let guard = epoch::pin();
        let mut current = self.value.load(Ordering::Acquire, &guard);
        // Safety: see load().
        let mut replacement = Owned::new(transform(unsafe { current.deref() }));

        loop {
            match self.value.compare_exchange(
                current,
                replacement,
                Ordering::AcqRel,
                Ordering::Acquire,
                &guard,
            ) {
                Ok(installed) => {
                    // Safety: we just unlinked `current`; no new reader
                    // can reach it, existing readers are guarded.
                    unsafe { guard.defer_destroy(current) };
                    // Safety: `installed` points at the node we created
                    // and the guard is still pinned.
                    return unsafe { installed.deref() }.clone();
                }
                Err(race) => {
                    // Another writer won; recompute from its value,
                    // reusing our allocation.
                    current = race.current;
                    replacement = race.new;
                    *replacement = transform(unsafe { current.deref() });
                    std::hint::spin_loop();
                }
            }
        }
    }
}

impl<T> Drop for OptimisticCell<T> {
    fn drop(&mut self) {
        // Safety: &mut self means no concurrent readers or writers; the
        // stored node can be reclaimed directly.
        unsafe {
            let current = self.value.load(Ordering::Relaxed, epoch::unprotected());
            drop(current.into_owned());
        }
    }
}

/// Shared `u64` updated through the same read-compute-CAS retry loop,
/// without indirection. Suitable for counters and small bitfields.
pub struct OptimisticCounter {
    value: AtomicU64,
}

impl OptimisticCounter {
    /// Create a counter holding `initial`.
    #[must_use]
    pub fn new(initial: u64) -> Self {
        Self {
            value: AtomicU64::new(initial),
        }
    }

    /// Read the current value. May be stale immediately.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }

    /// Apply a pure transform and return the value this call installed.
    /// The transform may execute more than once (see module docs).
    pub fn update<F>(&self, transform: F) -> u64
    where
        F: Fn(u64) -> u64,
    {
        let mut current = self.value.load(Ordering::Acquire);
        loop {
            let next = transform(current);
            match self.value.compare_exchange(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next,
                Err(observed) => {
                    current = observed;
                    #[cfg(loom)]
                    loom::thread::yield_now();
                    #[cfg(not(loom))]
                    std::hint::spin_loop();
                }
            }
        }
    }

    /// Add one. Never a lost update, unlike a naive load-then-store.
    pub fn increment(&self) -> u64 {
        self.update(|v| v.wrapping_add(1))
    }

    /// Subtract one.
    pub fn decrement(&self) -> u64 {
        self.update(|v| v.wrapping_sub(1))
    }
}


/// Loom tests for the counter's retry loop.
/// Run with `RUSTFLAGS="--cfg loom" cargo test -p coord-sync --release`.
#[cfg(loom)]
mod loom_tests {
    use super::*;
    use loom::sync::Arc;
    use loom::thread;

    #[test]
    fn loom_two_writers_no_lost_update() {
        loom::model(|| {
            let counter = Arc::new(OptimisticCounter::new(0));

            let other = {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    counter.increment();
                    counter.increment();
                })
            };

            counter.increment();
            other.join().unwrap();

            assert_eq!(counter.get(), 3);
        });
    }
}
