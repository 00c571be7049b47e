//! Tracked wrappers that record operation history for property checking.
//!
//! Each wrapper forwards to the real primitive and logs the observable
//! outcome, then exposes the log through the matching `coord-core`
//! properties trait so a checker can verify invariants after a run.
//!
//! The log lives under its own mutex, separate from the primitive's
//! lock, so logging never blocks the primitive. The cost is that with
//! multiple consumers the recorded consumption order can differ from
//! the true removal order; ordering checks are only meaningful for
//! single-consumer runs (the channel checker documents the same).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use coord_core::invariants::channel::{ChannelOrder, ChannelProperties};
use coord_core::invariants::counter::CounterProperties;
use coord_core::invariants::persistent::{BranchRecord, PersistentStackProperties};

use crate::cancel::CancelToken;
use crate::channel::{BoundedBlockingChannel, OrderPolicy};
use crate::error::{ChannelError, InvalidCapacityError};
use crate::optimistic::OptimisticCounter;
use crate::pstack::PersistentStack;

#[derive(Default)]
struct ChannelLog {
    produced: Vec<u64>,
    consumed: Vec<u64>,
}

/// A [`BoundedBlockingChannel`] of `u64` tags that records every
/// successful add and take.
pub struct TrackedChannel {
    channel: BoundedBlockingChannel<u64>,
    log: Mutex<ChannelLog>,
}

impl TrackedChannel {
    /// Tracked FIFO channel.
    pub fn new(capacity: usize) -> Result<Self, InvalidCapacityError> {
        Self::with_order(capacity, OrderPolicy::Fifo)
    }

    /// Tracked channel with an explicit delivery order.
    pub fn with_order(
        capacity: usize,
        order: OrderPolicy,
    ) -> Result<Self, InvalidCapacityError> {
        Ok(Self {
            channel: BoundedBlockingChannel::with_order(capacity, order)?,
            log: Mutex::new(ChannelLog::default()),
        })
    }

    /// Forwarded `add`; records the item on success.
    pub fn add(&self, item: u64, token: &CancelToken) -> Result<(), ChannelError> {
        self.channel.add(item, token)?;
        self.log.lock().unwrap().produced.push(item);
        Ok(())
    }

    /// Forwarded `take`; records the item on a hand-off.
    pub fn take(&self, token: &CancelToken) -> Result<Option<u64>, ChannelError> {
        let taken = self.channel.take(token)?;
        if let Some(item) = taken {
            self.log.lock().unwrap().consumed.push(item);
        }
        Ok(taken)
    }

    /// Forwarded `close`.
    pub fn close(&self) {
        self.channel.close();
    }

    /// The wrapped channel.
    pub fn channel(&self) -> &BoundedBlockingChannel<u64> {
        &self.channel
    }
}

impl ChannelProperties for TrackedChannel {
    fn produced_items(&self) -> Vec<u64> {
        self.log.lock().unwrap().produced.clone()
    }

    fn consumed_items(&self) -> Vec<u64> {
        self.log.lock().unwrap().consumed.clone()
    }

    fn current_contents(&self) -> Vec<u64> {
        self.channel.snapshot()
    }

    fn capacity(&self) -> usize {
        self.channel.capacity()
    }

    fn order(&self) -> ChannelOrder {
        match self.channel.order() {
            OrderPolicy::Fifo => ChannelOrder::Fifo,
            OrderPolicy::Lifo => ChannelOrder::Lifo,
        }
    }
}

/// An [`OptimisticCounter`] that counts how many increments completed,
/// for lost-update checking.
pub struct TrackedCounter {
    counter: OptimisticCounter,
    initial: u64,
    applied: AtomicU64,
}

impl TrackedCounter {
    /// Tracked counter starting at `initial`.
    #[must_use]
    pub fn new(initial: u64) -> Self {
        Self {
            counter: OptimisticCounter::new(initial),
            initial,
            applied: AtomicU64::new(0),
        }
    }

    /// Forwarded unit increment.
    pub fn increment(&self) {
        self.counter.increment();
        self.applied.fetch_add(1, Ordering::Relaxed);
    }
}

impl CounterProperties for TrackedCounter {
    fn initial_value(&self) -> u64 {
        self.initial
    }

    fn updates_applied(&self) -> u64 {
        self.applied.load(Ordering::Relaxed)
    }

    fn final_value(&self) -> u64 {
        self.counter.get()
    }
}

/// Records persistent-stack handles with the sequence each held at
/// record time, for immutability checking after further branching.
#[derive(Default)]
pub struct BranchTracker {
    branches: Vec<(String, Vec<u64>, PersistentStack<u64>)>,
}

impl BranchTracker {
    /// An empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `handle` under `label`, capturing its current sequence.
    pub fn record(&mut self, label: &str, handle: &PersistentStack<u64>) {
        let expected: Vec<u64> = handle.iter().copied().collect();
        self.branches
            .push((label.to_string(), expected, handle.clone()));
    }
}

impl PersistentStackProperties for BranchTracker {
    fn branches(&self) -> Vec<BranchRecord> {
        self.branches
            .iter()
            .map(|(label, expected, handle)| BranchRecord {
                label: label.clone(),
                expected: expected.clone(),
                observed: handle.iter().copied().collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coord_core::invariants::channel::ChannelPropertyChecker;
    use coord_core::invariants::counter::CounterPropertyChecker;
    use coord_core::invariants::persistent::PersistentStackPropertyChecker;
    use coord_core::PropertyChecker;

    #[test]
    fn tracked_channel_log_matches_traffic() {
        let tracked = TrackedChannel::new(4).unwrap();
        let token = CancelToken::new();

        tracked.add(1, &token).unwrap();
        tracked.add(2, &token).unwrap();
        assert_eq!(tracked.take(&token), Ok(Some(1)));
        tracked.close();

        assert_eq!(tracked.produced_items(), vec![1, 2]);
        assert_eq!(tracked.consumed_items(), vec![1]);
        assert_eq!(tracked.current_contents(), vec![2]);

        ChannelPropertyChecker::new(&tracked).assert_all();
    }

    #[test]
    fn tracked_counter_passes_after_serial_updates() {
        let tracked = TrackedCounter::new(5);
        for _ in 0..10 {
            tracked.increment();
        }
        CounterPropertyChecker::new(&tracked).assert_all();
        assert_eq!(tracked.final_value(), 15);
    }

    #[test]
    fn branch_tracker_sees_undisturbed_handles() {
        let base = PersistentStack::new().push(1).push(2);
        let mut tracker = BranchTracker::new();
        tracker.record("base", &base);

        // Branch off twice; the base must not move.
        let _left = base.push(10);
        let _right = base.pop().unwrap();

        PersistentStackPropertyChecker::new(&tracker).assert_all();
    }
}
