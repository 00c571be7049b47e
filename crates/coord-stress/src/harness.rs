//! Producer/consumer stress runner.
//!
//! Spawns a configurable number of producer and consumer threads
//! against a [`StressTarget`], with the workload (item tags, jitter
//! points) fully determined by the run seed. Item tags encode the
//! producer index, so every tag in a run is distinct — the format the
//! property checkers expect.

use std::sync::Arc;
use std::thread;

use crate::random::DeterministicRng;

/// The structure under stress. Implemented by test code over the real
/// primitive (usually a tracked wrapper that also records history).
pub trait StressTarget: Send + Sync {
    /// Producer-side insert. Returns `false` once the target stops
    /// accepting items; the producer thread then gives up.
    fn produce(&self, item: u64) -> bool;

    /// Consumer-side removal. `None` means drained and shut down; the
    /// consumer thread then exits.
    fn consume(&self) -> Option<u64>;

    /// Called once after all producers finish, so blocked consumers can
    /// observe end-of-sequence.
    fn shutdown(&self);
}

/// Shape of a stress run.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of producer threads.
    pub producers_count: usize,
    /// Number of consumer threads.
    pub consumers_count: usize,
    /// Items each producer submits.
    pub items_per_producer: u64,
    /// Probability of a yield between operations, to shake up
    /// interleavings.
    pub yield_probability: f64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            producers_count: 4,
            consumers_count: 4,
            items_per_producer: 1_000,
            yield_probability: 0.2,
        }
    }
}

impl StressConfig {
    /// Small run for fast test suites.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            producers_count: 2,
            consumers_count: 2,
            items_per_producer: 200,
            yield_probability: 0.1,
        }
    }

    /// Heavy run for dedicated stress testing.
    #[must_use]
    pub fn stress() -> Self {
        Self {
            producers_count: 8,
            consumers_count: 8,
            items_per_producer: 10_000,
            yield_probability: 0.3,
        }
    }

    /// One producer, one consumer. The configuration under which
    /// ordering properties are meaningful.
    #[must_use]
    pub fn single_lane(items: u64) -> Self {
        Self {
            producers_count: 1,
            consumers_count: 1,
            items_per_producer: items,
            yield_probability: 0.1,
        }
    }
}

/// What a stress run did.
#[derive(Debug)]
pub struct StressReport {
    /// Seed the workload was derived from.
    pub seed: u64,
    /// Items accepted by the target, concatenated per producer.
    pub produced: Vec<u64>,
    /// Items handed back by the target, concatenated per consumer.
    pub consumed: Vec<u64>,
    /// Items the target refused (e.g. submitted after close).
    pub rejected_count: u64,
}

/// Tag for item `sequence` from producer `producer_index`. Distinct
/// across the whole run.
#[must_use]
pub fn item_tag(producer_index: u64, sequence: u64) -> u64 {
    debug_assert!(producer_index < (1 << 32), "producer index too large");
    debug_assert!(sequence < (1 << 32), "sequence too large");
    (producer_index << 32) | sequence
}

/// Run a seeded producer/consumer workload against `target`.
///
/// Blocks until every worker thread has exited. The target's
/// `shutdown` is invoked after the last producer finishes.
pub fn run_producer_consumer<T: StressTarget + 'static>(
    target: Arc<T>,
    config: &StressConfig,
    seed: u64,
) -> StressReport {
    debug_assert!(config.producers_count > 0, "need at least one producer");
    debug_assert!(config.consumers_count > 0, "need at least one consumer");

    let mut producer_handles = Vec::with_capacity(config.producers_count);
    for producer_index in 0..config.producers_count as u64 {
        let target = Arc::clone(&target);
        let items = config.items_per_producer;
        let yield_probability = config.yield_probability;
        producer_handles.push(thread::spawn(move || {
            let mut rng = DeterministicRng::for_worker(seed, producer_index);
            let mut accepted = Vec::new();
            let mut rejected = 0u64;
            for sequence in 0..items {
                let item = item_tag(producer_index, sequence);
                if target.produce(item) {
                    accepted.push(item);
                } else {
                    rejected += 1;
                    break;
                }
                if rng.chance(yield_probability) {
                    thread::yield_now();
                }
            }
            (accepted, rejected)
        }));
    }

    let mut consumer_handles = Vec::with_capacity(config.consumers_count);
    for consumer_index in 0..config.consumers_count as u64 {
        let target = Arc::clone(&target);
        let yield_probability = config.yield_probability;
        consumer_handles.push(thread::spawn(move || {
            // Offset the stream so consumers don't mirror producers.
            let mut rng = DeterministicRng::for_worker(seed, u64::MAX - consumer_index);
            let mut taken = Vec::new();
            while let Some(item) = target.consume() {
                taken.push(item);
                if rng.chance(yield_probability) {
                    thread::yield_now();
                }
            }
            taken
        }));
    }

    let mut produced = Vec::new();
    let mut rejected_count = 0u64;
    for handle in producer_handles {
        let (accepted, rejected) = handle.join().unwrap();
        produced.extend(accepted);
        rejected_count += rejected;
    }

    target.shutdown();

    let mut consumed = Vec::new();
    for handle in consumer_handles {
        consumed.extend(handle.join().unwrap());
    }

    StressReport {
        seed,
        produced,
        consumed,
        rejected_count,
    }
}
