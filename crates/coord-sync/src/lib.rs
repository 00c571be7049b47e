//! # coord-sync
//!
//! Coordination primitives for shared-memory, preemptively scheduled
//! threads. Four independent building blocks, none depending on the
//! others, each consumed by arbitrary caller-supplied worker logic:
//!
//! - [`ResettableTimeoutGate`]: a signal/wait gate whose timeout window
//!   can be pushed forward while there is evidence of liveness
//! - [`BoundedBlockingChannel`]: a fixed-capacity blocking hand-off
//!   buffer with explicit FIFO/LIFO ordering and cooperative
//!   cancellation
//! - [`OptimisticCell`] / [`OptimisticCounter`]: the compare-and-swap
//!   retry pattern over arbitrary values and plain scalars
//! - [`PersistentStack`]: an immutable, structurally shared stack where
//!   every mutation yields a new handle
//!
//! Blocking operations always return within a bounded interval of their
//! timeout, their cancellation token, or closure — never an unbounded
//! silent hang. Each primitive locks only its own state, so no
//! combination of them can deadlock across instances.
//!
//! The `tracked` module provides history-recording wrappers that
//! implement the `coord-core` property traits; stress tests run them
//! under `coord-stress` workloads and check invariants afterwards.
//!
//! Loom interleaving tests for the channel and the optimistic counter
//! live under `#[cfg(loom)]`:
//! ```bash
//! RUSTFLAGS="--cfg loom" cargo test -p coord-sync --release
//! ```

pub mod cancel;
pub mod channel;
pub mod error;
pub mod gate;
pub mod optimistic;
pub mod pstack;
#[cfg(not(loom))]
pub mod tracked;

pub use cancel::CancelToken;
pub use channel::{BoundedBlockingChannel, Drain, OrderPolicy};
pub use error::{ChannelError, EmptyContainerError, InvalidCapacityError};
pub use gate::ResettableTimeoutGate;
pub use optimistic::{OptimisticCell, OptimisticCounter};
pub use pstack::PersistentStack;
#[cfg(not(loom))]
pub use tracked::{BranchTracker, TrackedChannel, TrackedCounter};
