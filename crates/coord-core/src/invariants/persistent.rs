//! Persistent-stack handle invariants.
//!
//! | Property | Description |
//! |----------|-------------|
//! | HandleImmutability | Every recorded handle still yields the sequence it held when recorded |
//!
//! The test records each handle's expected sequence at the moment the
//! handle is created (branched), performs further pushes and pops on
//! derived handles, then asks the checker to confirm that no earlier
//! handle was disturbed — the structural-sharing contract.

use crate::property::{PropertyChecker, PropertyResult};

/// One recorded handle: what it contained at record time versus what it
/// contains now.
#[derive(Debug, Clone)]
pub struct BranchRecord {
    /// Caller-chosen label for failure messages.
    pub label: String,
    /// Sequence (top to bottom) captured when the handle was recorded.
    pub expected: Vec<u64>,
    /// Sequence the handle yields now.
    pub observed: Vec<u64>,
}

/// Observable branch history of a persistent stack under test.
pub trait PersistentStackProperties {
    /// All recorded handles with their expected and current sequences.
    fn branches(&self) -> Vec<BranchRecord>;
}

/// Checker for [`PersistentStackProperties`] implementations.
pub struct PersistentStackPropertyChecker<'a, T: PersistentStackProperties> {
    stack: &'a T,
}

impl<'a, T: PersistentStackProperties> PersistentStackPropertyChecker<'a, T> {
    #[must_use]
    pub fn new(stack: &'a T) -> Self {
        Self { stack }
    }

    fn check_handle_immutability(&self) -> PropertyResult {
        for branch in self.stack.branches() {
            if branch.observed != branch.expected {
                return PropertyResult::fail(
                    "HandleImmutability",
                    format!(
                        "handle '{}' changed: expected {:?}, observed {:?}",
                        branch.label, branch.expected, branch.observed
                    ),
                    None,
                );
            }
        }

        PropertyResult::pass("HandleImmutability")
    }
}

impl<T: PersistentStackProperties> PropertyChecker for PersistentStackPropertyChecker<'_, T> {
    fn check_all(&self) -> Vec<PropertyResult> {
        vec![self.check_handle_immutability()]
    }
}
