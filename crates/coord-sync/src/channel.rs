//! Bounded blocking producer/consumer channel.
//!
//! A fixed-capacity hand-off buffer: `add` blocks while the channel is
//! full, `take` blocks while it is empty and not yet closed. Both accept
//! a [`CancelToken`] and observe it as a secondary wait condition, so a
//! blocked thread always regains control within one poll interval of the
//! token firing. Closing is idempotent and terminal: producers get
//! [`ChannelError::Closed`], consumers drain whatever remains and then
//! see end-of-sequence.
//!
//! The delivery order is explicit, not implied by the type name:
//! [`OrderPolicy::Fifo`] (the default) delivers in insertion order,
//! [`OrderPolicy::Lifo`] delivers newest-first from a stack-ordered
//! store. Callers must not assume FIFO without selecting it.
//!
//! Under `--cfg loom` the lock and condvars come from `loom::sync`, so
//! interleavings of `add`/`take`/`close` can be model-checked.

#[cfg(loom)]
use loom::sync::{Condvar, Mutex};
#[cfg(not(loom))]
use std::sync::{Condvar, Mutex};

use std::collections::VecDeque;
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::error::{ChannelError, InvalidCapacityError};

/// How long a blocked operation sleeps between cancellation checkpoints.
/// A fired token is observed within at most this interval.
const CANCEL_POLL: Duration = Duration::from_millis(10);

/// Delivery order of the internal store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPolicy {
    /// First in, first out. Per-producer insertion order is preserved in
    /// the consumer's view.
    Fifo,
    /// Last in, first out (stack-ordered store). No cross-item ordering
    /// beyond exactly-once delivery.
    Lifo,
}

#[derive(Debug)]
struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Fixed-capacity blocking channel with cooperative cancellation.
#[derive(Debug)]
pub struct BoundedBlockingChannel<T> {
    inner: Mutex<Inner<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
    order: OrderPolicy,
}

impl<T> BoundedBlockingChannel<T> {
    /// Create a FIFO channel holding at most `capacity` items.
    ///
    /// Fails with [`InvalidCapacityError`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, InvalidCapacityError> {
        Self::with_order(capacity, OrderPolicy::Fifo)
    }

    /// Create a channel with an explicit delivery order.
    pub fn with_order(
        capacity: usize,
        order: OrderPolicy,
    ) -> Result<Self, InvalidCapacityError> {
        if capacity == 0 {
            return Err(InvalidCapacityError(capacity));
        }
        Ok(Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
            order,
        })
    }

    /// Insert an item, blocking while the channel is full.
    ///
    /// Returns [`ChannelError::Cancelled`] if `token` fires while
    /// blocked (the item is dropped, never half-inserted) and
    /// [`ChannelError::Closed`] if the channel is or becomes closed.
    pub fn add(&self, item: T, token: &CancelToken) -> Result<(), ChannelError> {
        let mut inner = self.inner.lock().unwrap();
        loop {
            if inner.closed {
                return Err(ChannelError::Closed);
            }
            if token.is_cancelled() {
                return Err(ChannelError::Cancelled);
            }
            if inner.items.len() < self.capacity {
                inner.items.push_back(item);
                self.not_empty.notify_one();
                return Ok(());
            }

            let (guard, _) = self.not_full.wait_timeout(inner, CANCEL_POLL).unwrap();
            inner = guard;
        }
    }

    /// Remove one item, blocking while the channel is empty and open.
    ///
    /// `Ok(Some(item))` on a hand-off, `Ok(None)` once the channel is
    /// closed and drained, `Err(Cancelled)` if `token` fires while
    /// blocked. Items still present after close are delivered before
    /// end-of-sequence is reported.
    pub fn take(&self, token: &CancelToken) -> Result<Option<T>, ChannelError> {
        let mut inner = self.inner.lock().unwrap();
        loop {
            if let Some(item) = Self::remove(self.order, &mut inner) {
                self.not_full.notify_one();
                return Ok(Some(item));
            }
            if inner.closed {
                return Ok(None);
            }
            if token.is_cancelled() {
                return Err(ChannelError::Cancelled);
            }

            let (guard, _) = self.not_empty.wait_timeout(inner, CANCEL_POLL).unwrap();
            inner = guard;
        }
    }

    /// Consuming iterator over the channel: each `next()` is a blocking
    /// [`take`](Self::take). Ends when the channel is closed and drained.
    pub fn take_all(&self) -> Drain<'_, T> {
        self.take_all_with(CancelToken::new())
    }

    /// [`take_all`](Self::take_all) bound to a cancellation token; the
    /// sequence also ends if the token fires while blocked.
    pub fn take_all_with(&self, token: CancelToken) -> Drain<'_, T> {
        Drain {
            channel: self,
            token,
        }
    }

    /// Close the channel: no further `add` succeeds, blocked producers
    /// and consumers wake immediately, remaining items stay drainable.
    /// Idempotent.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Current number of buffered items.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    /// Whether the channel is currently empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// The fixed capacity this channel was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The delivery order this channel was created with.
    pub fn order(&self) -> OrderPolicy {
        self.order
    }

    fn remove(order: OrderPolicy, inner: &mut Inner<T>) -> Option<T> {
        match order {
            OrderPolicy::Fifo => inner.items.pop_front(),
            OrderPolicy::Lifo => inner.items.pop_back(),
        }
    }
}

impl<T: Clone> BoundedBlockingChannel<T> {
    /// Snapshot of the buffered items in delivery order. Intended for
    /// verification; the channel may change the moment the lock drops.
    pub fn snapshot(&self) -> Vec<T> {
        let inner = self.inner.lock().unwrap();
        match self.order {
            OrderPolicy::Fifo => inner.items.iter().cloned().collect(),
            OrderPolicy::Lifo => inner.items.iter().rev().cloned().collect(),
        }
    }
}

/// Blocking consumer view returned by
/// [`BoundedBlockingChannel::take_all`].
pub struct Drain<'a, T> {
    channel: &'a BoundedBlockingChannel<T>,
    token: CancelToken,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        // Cancellation ends the sequence; the caller asked to stop
        // consuming, there is nothing further to report.
        match self.channel.take(&self.token) {
            Ok(item) => item,
            Err(ChannelError::Cancelled) | Err(ChannelError::Closed) => None,
        }
    }
}


/// Loom tests exhaustively check interleavings of add/take/close.
/// Run with `RUSTFLAGS="--cfg loom" cargo test -p coord-sync --release`.
#[cfg(loom)]
mod loom_tests {
    use super::*;
    use loom::sync::Arc;
    use loom::thread;

    #[test]
    fn loom_handoff_delivers_exactly_once() {
        loom::model(|| {
            let channel = Arc::new(BoundedBlockingChannel::new(1).unwrap());
            let token = CancelToken::new();

            let producer = {
                let channel = Arc::clone(&channel);
                let token = token.clone();
                thread::spawn(move || {
                    channel.add(10, &token).unwrap();
                    channel.add(20, &token).unwrap();
                    channel.close();
                })
            };

            let consumer_token = CancelToken::new();
            let mut seen = Vec::new();
            while let Ok(Some(item)) = channel.take(&consumer_token) {
                seen.push(item);
            }
            producer.join().unwrap();

            assert_eq!(seen, vec![10, 20]);
        });
    }

    #[test]
    fn loom_close_wakes_blocked_consumer() {
        loom::model(|| {
            let channel: Arc<BoundedBlockingChannel<u64>> =
                Arc::new(BoundedBlockingChannel::new(1).unwrap());

            let closer = {
                let channel = Arc::clone(&channel);
                thread::spawn(move || channel.close())
            };

            let outcome = channel.take(&CancelToken::new());
            closer.join().unwrap();

            assert_eq!(outcome, Ok(None));
        });
    }
}
