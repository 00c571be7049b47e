//! Optimistic-update invariants.
//!
//! | Property | Description |
//! |----------|-------------|
//! | NoLostUpdates | Final value accounts for every applied increment |
//!
//! This is the property the naive read-then-write pattern violates
//! under contention and the CAS retry loop must guarantee.

use crate::property::{PropertyChecker, PropertyResult};

/// Observable history of a counter driven by unit increments.
pub trait CounterProperties {
    /// Value the counter started at.
    fn initial_value(&self) -> u64;

    /// Number of increments whose calls completed.
    fn updates_applied(&self) -> u64;

    /// The counter's value now.
    fn final_value(&self) -> u64;
}

/// Checker for [`CounterProperties`] implementations.
pub struct CounterPropertyChecker<'a, T: CounterProperties> {
    counter: &'a T,
}

impl<'a, T: CounterProperties> CounterPropertyChecker<'a, T> {
    #[must_use]
    pub fn new(counter: &'a T) -> Self {
        Self { counter }
    }

    fn check_no_lost_updates(&self) -> PropertyResult {
        let initial = self.counter.initial_value();
        let applied = self.counter.updates_applied();
        let expected = initial + applied;
        let actual = self.counter.final_value();

        if actual != expected {
            return PropertyResult::fail(
                "NoLostUpdates",
                format!(
                    "{applied} increments from {initial} should give {expected}, got {actual} \
                     ({} updates lost)",
                    expected - actual.min(expected)
                ),
                None,
            );
        }

        PropertyResult::pass("NoLostUpdates")
    }
}

impl<T: CounterProperties> PropertyChecker for CounterPropertyChecker<'_, T> {
    fn check_all(&self) -> Vec<PropertyResult> {
        vec![self.check_no_lost_updates()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeCounter {
        initial: u64,
        applied: u64,
        value: u64,
    }

    impl CounterProperties for FakeCounter {
        fn initial_value(&self) -> u64 {
            self.initial
        }
        fn updates_applied(&self) -> u64 {
            self.applied
        }
        fn final_value(&self) -> u64 {
            self.value
        }
    }

    #[test]
    fn exact_count_passes() {
        let counter = FakeCounter {
            initial: 5,
            applied: 100,
            value: 105,
        };
        let results = CounterPropertyChecker::new(&counter).check_all();
        assert!(results.iter().all(|r| r.passed));
    }

    #[test]
    fn lost_update_is_detected() {
        let counter = FakeCounter {
            initial: 0,
            applied: 100,
            value: 97,
        };
        let results = CounterPropertyChecker::new(&counter).check_all();
        let failure = results.iter().find(|r| !r.passed).unwrap();
        assert_eq!(failure.property, "NoLostUpdates");
        assert!(failure.details.as_ref().unwrap().contains("3 updates lost"));
    }
}
