//! Bounded channel invariants.
//!
//! | Property | Description |
//! |----------|-------------|
//! | NoLostItems | Every produced item is in the buffer or was consumed |
//! | ExactlyOnceDelivery | No item is handed to two consumers |
//! | BoundedCapacity | Buffer never exceeds its fixed capacity |
//! | FifoOrder | Consumption order preserves production order (FIFO stores) |
//!
//! Items are `u64` tags and must be distinct within one run; stress
//! harnesses encode the producer id into the tag to guarantee this.
//! `FifoOrder` compares the recorded consumption sequence against the
//! recorded production sequence, which is meaningful for runs with a
//! single consumer; multi-consumer runs should rely on the other three
//! properties.

use std::collections::HashSet;

use crate::counterexample::{Counterexample, StateSnapshot};
use crate::property::{PropertyChecker, PropertyResult};

/// Delivery order the channel under test was configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Insertion order; `FifoOrder` is checked.
    Fifo,
    /// Stack order; `FifoOrder` is skipped.
    Lifo,
}

/// Observable history a channel implementation (or a tracked wrapper
/// around one) must expose for checking.
pub trait ChannelProperties {
    /// Every item successfully added, in production order.
    fn produced_items(&self) -> Vec<u64>;

    /// Every item handed to a consumer, in consumption order.
    fn consumed_items(&self) -> Vec<u64>;

    /// Items currently buffered, in delivery order.
    fn current_contents(&self) -> Vec<u64>;

    /// The channel's fixed capacity.
    fn capacity(&self) -> usize;

    /// The channel's configured delivery order.
    fn order(&self) -> ChannelOrder;
}

/// Checker for [`ChannelProperties`] implementations.
pub struct ChannelPropertyChecker<'a, T: ChannelProperties> {
    channel: &'a T,
    seed: Option<u64>,
}

impl<'a, T: ChannelProperties> ChannelPropertyChecker<'a, T> {
    #[must_use]
    pub fn new(channel: &'a T) -> Self {
        Self {
            channel,
            seed: None,
        }
    }

    /// Attach the stress seed so failures print a reproduction line.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn counterexample(&self, description: String, variables: Vec<(String, String)>) -> Counterexample {
        let mut ce = match self.seed {
            Some(seed) => Counterexample::with_seed(seed),
            None => Counterexample::new(),
        };
        ce.add_state(StateSnapshot {
            step: 1,
            description,
            variables,
        });
        ce
    }

    /// Every produced item must be in the buffer or consumed.
    fn check_no_lost_items(&self) -> PropertyResult {
        let produced = self.channel.produced_items();
        let consumed: HashSet<u64> = self.channel.consumed_items().into_iter().collect();
        let contents: HashSet<u64> = self.channel.current_contents().into_iter().collect();

        for item in &produced {
            if !consumed.contains(item) && !contents.contains(item) {
                let ce = self.counterexample(
                    format!("item {item} lost"),
                    vec![
                        ("produced".to_string(), format!("{produced:?}")),
                        ("consumed".to_string(), format!("{consumed:?}")),
                        ("contents".to_string(), format!("{contents:?}")),
                    ],
                );
                return PropertyResult::fail(
                    "NoLostItems",
                    format!("item {item} was produced but is neither buffered nor consumed"),
                    Some(ce),
                );
            }
        }

        PropertyResult::pass("NoLostItems")
    }

    /// No item is delivered twice, and nothing is delivered that was
    /// never produced.
    fn check_exactly_once_delivery(&self) -> PropertyResult {
        let produced: HashSet<u64> = self.channel.produced_items().into_iter().collect();
        let consumed = self.channel.consumed_items();

        let mut seen = HashSet::new();
        for item in &consumed {
            if !seen.insert(*item) {
                return PropertyResult::fail(
                    "ExactlyOnceDelivery",
                    format!("item {item} was delivered to more than one consumer"),
                    Some(self.counterexample(
                        format!("item {item} delivered twice"),
                        vec![("consumed".to_string(), format!("{consumed:?}"))],
                    )),
                );
            }
            if !produced.contains(item) {
                return PropertyResult::fail(
                    "ExactlyOnceDelivery",
                    format!("item {item} was delivered but never produced"),
                    None,
                );
            }
        }

        PropertyResult::pass("ExactlyOnceDelivery")
    }

    /// The buffer never holds more than its capacity.
    fn check_bounded_capacity(&self) -> PropertyResult {
        let contents = self.channel.current_contents();
        let capacity = self.channel.capacity();

        if contents.len() > capacity {
            return PropertyResult::fail(
                "BoundedCapacity",
                format!(
                    "buffer holds {} items but capacity is {}",
                    contents.len(),
                    capacity
                ),
                None,
            );
        }

        PropertyResult::pass("BoundedCapacity")
    }

    /// Under a FIFO store, the consumption sequence must be an
    /// order-preserving subsequence of the production sequence.
    fn check_fifo_order(&self) -> PropertyResult {
        if self.channel.order() == ChannelOrder::Lifo {
            // Stack-ordered store promises nothing beyond exactly-once.
            return PropertyResult::pass("FifoOrder");
        }

        let produced = self.channel.produced_items();
        let consumed = self.channel.consumed_items();

        let mut cursor = produced.iter();
        for item in &consumed {
            if !cursor.any(|p| p == item) {
                return PropertyResult::fail(
                    "FifoOrder",
                    format!("item {item} was consumed out of production order"),
                    Some(self.counterexample(
                        format!("item {item} out of order"),
                        vec![
                            ("produced".to_string(), format!("{produced:?}")),
                            ("consumed".to_string(), format!("{consumed:?}")),
                        ],
                    )),
                );
            }
        }

        PropertyResult::pass("FifoOrder")
    }
}

impl<T: ChannelProperties> PropertyChecker for ChannelPropertyChecker<'_, T> {
    fn check_all(&self) -> Vec<PropertyResult> {
        vec![
            self.check_no_lost_items(),
            self.check_exactly_once_delivery(),
            self.check_bounded_capacity(),
            self.check_fifo_order(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeChannel {
        produced: Vec<u64>,
        consumed: Vec<u64>,
        contents: Vec<u64>,
        capacity: usize,
        order: ChannelOrder,
    }

    impl ChannelProperties for FakeChannel {
        fn produced_items(&self) -> Vec<u64> {
            self.produced.clone()
        }
        fn consumed_items(&self) -> Vec<u64> {
            self.consumed.clone()
        }
        fn current_contents(&self) -> Vec<u64> {
            self.contents.clone()
        }
        fn capacity(&self) -> usize {
            self.capacity
        }
        fn order(&self) -> ChannelOrder {
            self.order
        }
    }

    fn clean_run() -> FakeChannel {
        FakeChannel {
            produced: vec![1, 2, 3, 4],
            consumed: vec![1, 2],
            contents: vec![3, 4],
            capacity: 2,
            order: ChannelOrder::Fifo,
        }
    }

    #[test]
    fn clean_history_passes_all_checks() {
        let channel = clean_run();
        let results = ChannelPropertyChecker::new(&channel).check_all();
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn detects_lost_item() {
        let mut channel = clean_run();
        channel.contents = vec![4]; // 3 vanished
        let results = ChannelPropertyChecker::new(&channel).with_seed(7).check_all();
        let failure = results.iter().find(|r| !r.passed).unwrap();
        assert_eq!(failure.property, "NoLostItems");
        let ce = failure.counterexample.as_ref().unwrap();
        assert_eq!(ce.seed, Some(7));
    }

    #[test]
    fn detects_double_delivery() {
        let mut channel = clean_run();
        channel.consumed = vec![1, 1];
        channel.contents = vec![2, 3, 4];
        let results = ChannelPropertyChecker::new(&channel).check_all();
        assert!(results
            .iter()
            .any(|r| !r.passed && r.property == "ExactlyOnceDelivery"));
    }

    #[test]
    fn detects_capacity_overflow() {
        let mut channel = clean_run();
        channel.contents = vec![2, 3, 4];
        channel.consumed = vec![1];
        let results = ChannelPropertyChecker::new(&channel).check_all();
        assert!(results
            .iter()
            .any(|r| !r.passed && r.property == "BoundedCapacity"));
    }

    #[test]
    fn detects_fifo_violation() {
        let mut channel = clean_run();
        channel.consumed = vec![2, 1];
        let results = ChannelPropertyChecker::new(&channel).check_all();
        assert!(results.iter().any(|r| !r.passed && r.property == "FifoOrder"));
    }

    #[test]
    fn lifo_runs_skip_order_checking() {
        let mut channel = clean_run();
        channel.order = ChannelOrder::Lifo;
        channel.consumed = vec![2, 1];
        let results = ChannelPropertyChecker::new(&channel).check_all();
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }
}
