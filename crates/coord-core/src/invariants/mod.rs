//! Invariant traits for the coordination primitives.
//!
//! Each module defines the properties an implementation must satisfy
//! and a checker that verifies them against recorded history:
//!
//! - `channel`: bounded channel invariants (NoLostItems,
//!   ExactlyOnceDelivery, BoundedCapacity, FifoOrder)
//! - `counter`: optimistic-update invariants (NoLostUpdates)
//! - `persistent`: persistent-stack handle invariants
//!   (HandleImmutability)

pub mod channel;
pub mod counter;
pub mod persistent;

pub use channel::{ChannelOrder, ChannelProperties, ChannelPropertyChecker};
pub use counter::{CounterProperties, CounterPropertyChecker};
pub use persistent::{BranchRecord, PersistentStackProperties, PersistentStackPropertyChecker};
