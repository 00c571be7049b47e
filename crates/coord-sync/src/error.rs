//! Error taxonomy for the coordination primitives.
//!
//! Timeouts are not errors: a gate wait that elapses returns `false`.
//! CAS contention is never surfaced either; the retry loop resolves it
//! internally. Everything that remains is a definite, caller-visible
//! failure with a distinct type.

use thiserror::Error;

/// Failure of a blocking channel operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The caller's cancellation token fired at a checkpoint while the
    /// operation was blocked. The item was not inserted.
    #[error("operation cancelled")]
    Cancelled,

    /// The channel has been closed and will never accept another item.
    /// Terminal: retrying cannot succeed.
    #[error("channel is closed")]
    Closed,
}

/// Rejected channel construction. Capacity must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("channel capacity must be at least 1, got {0}")]
pub struct InvalidCapacityError(pub usize);

/// `pop` or `peek` on an empty container. A caller logic error, not a
/// transient condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("container is empty")]
pub struct EmptyContainerError;
