//! Persistent (structurally shared) immutable stack.
//!
//! Every mutation returns a new handle; the receiver is never touched,
//! so prior handles stay valid forever. Handles branching off a common
//! stack share their suffix node-for-node: space is proportional to the
//! distinct nodes ever pushed, not to the number of handles. A node,
//! once constructed, is immutable, which is what makes the structure
//! safe to read from any thread with no synchronization at all —
//! a writer never mutates a node a reader might be traversing.
//!
//! The empty stack is the `None` head. That is the Rust rendition of a
//! single process-wide empty sentinel: nothing is allocated and every
//! empty handle is trivially "the same" empty.

use std::fmt;
use std::sync::Arc;

use crate::error::EmptyContainerError;

struct Node<T> {
    value: T,
    next: Option<Arc<Node<T>>>,
}

/// Immutable singly linked stack with O(1) push/pop/clone.
pub struct PersistentStack<T> {
    head: Option<Arc<Node<T>>>,
    len: usize,
}

impl<T> PersistentStack<T> {
    /// The empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// A new handle with `value` on top. O(1); the receiver is unchanged.
    #[must_use]
    pub fn push(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Node {
                value,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// A new handle without the top element: the existing tail, shared,
    /// not copied. Fails on the empty stack.
    pub fn pop(&self) -> Result<Self, EmptyContainerError> {
        match &self.head {
            Some(node) => Ok(Self {
                head: node.next.clone(),
                len: self.len - 1,
            }),
            None => Err(EmptyContainerError),
        }
    }

    /// The top element. Fails on the empty stack.
    pub fn peek(&self) -> Result<&T, EmptyContainerError> {
        match &self.head {
            Some(node) => Ok(&node.value),
            None => Err(EmptyContainerError),
        }
    }

    /// Whether this handle is the empty stack.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of elements reachable from this handle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Borrowing iterator from top to bottom. Restartable: iterating a
    /// handle twice yields the same sequence, since nodes never change.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl<T> Clone for PersistentStack<T> {
    /// O(1): clones the handle, not the elements.
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for PersistentStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for PersistentStack<T> {
    fn drop(&mut self) {
        // Unlink the exclusively owned prefix iteratively. A naive
        // recursive drop of the Arc chain overflows the thread stack on
        // long unshared runs; stopping at the first shared node leaves
        // the suffix to the handles that still reference it.
        let mut head = self.head.take();
        while let Some(node) = head {
            match Arc::try_unwrap(node) {
                Ok(mut node) => head = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for PersistentStack<T> {
    /// Element-wise equality of the observable sequences.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PersistentStack<T> {}

/// Iterator over a stack handle, top to bottom.
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(&node.value)
    }
}

impl<'a, T> IntoIterator for &'a PersistentStack<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> FromIterator<T> for PersistentStack<T> {
    /// Builds a stack whose top is the last item yielded.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::new();
        for value in iter {
            stack = stack.push(value);
        }
        stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_fails_pop_and_peek() {
        let stack: PersistentStack<u64> = PersistentStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.pop().unwrap_err(), EmptyContainerError);
        assert_eq!(stack.peek().unwrap_err(), EmptyContainerError);
    }

    #[test]
    fn push_then_pop_restores_the_original_sequence() {
        let s1 = PersistentStack::new().push(1).push(2);
        let s2 = s1.push(99);
        let s3 = s2.pop().unwrap();

        assert_eq!(s3, s1);
        assert_eq!(s3.peek().unwrap(), &2);
        assert_eq!(s3.is_empty(), s1.is_empty());
    }

    #[test]
    fn handles_branch_independently() {
        let base = PersistentStack::new().push(1);

        let left = base.push(10);
        let right = base.push(20);

        // Neither branch affects the other or the base.
        assert_eq!(left.iter().copied().collect::<Vec<_>>(), vec![10, 1]);
        assert_eq!(right.iter().copied().collect::<Vec<_>>(), vec![20, 1]);
        assert_eq!(base.iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn iteration_is_restartable() {
        let stack: PersistentStack<u64> = (1..=5).collect();
        let first: Vec<u64> = stack.iter().copied().collect();
        let second: Vec<u64> = stack.iter().copied().collect();
        assert_eq!(first, vec![5, 4, 3, 2, 1]);
        assert_eq!(first, second);
    }

    #[test]
    fn popping_to_empty_matches_the_sentinel() {
        let stack = PersistentStack::new().push(7);
        let drained = stack.pop().unwrap();
        assert!(drained.is_empty());
        assert_eq!(drained, PersistentStack::new());
    }

    #[test]
    fn shared_suffix_is_not_copied() {
        let base: PersistentStack<u64> = (0..1000).collect();
        let branch = base.push(1000);

        // The branch's tail is the base itself, element for element.
        assert_eq!(branch.pop().unwrap(), base);
        assert_eq!(branch.len(), base.len() + 1);
    }

    #[test]
    fn long_chain_drop_does_not_recurse() {
        // Would overflow the stack if Drop walked the chain recursively.
        let stack: PersistentStack<u64> = (0..200_000).collect();
        drop(stack);
    }

    #[test]
    fn concurrent_readers_share_one_stack() {
        use std::sync::Arc;
        use std::thread;

        let stack: Arc<PersistentStack<u64>> = Arc::new((1..=100).collect());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stack = Arc::clone(&stack);
                thread::spawn(move || stack.iter().sum::<u64>())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 5050);
        }
    }
}
