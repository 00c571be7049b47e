//! Resettable timeout gate.
//!
//! An ordinary timed wait has a fixed deadline: once the wait starts,
//! nothing can push the deadline out. This gate can. Any thread may call
//! [`ResettableTimeoutGate::update_timeout`] to rebase the timeout window
//! to "now", extending the deadline of every in-flight wait. The intended
//! use is a keep-alive watchdog: a long operation periodically proves
//! liveness, and the watchdog only gives up after a full quiet window
//! with no evidence of progress.
//!
//! The state is a single mutex-guarded pair (`signaled`, `window_start`)
//! plus a condvar so `set` and `update_timeout` wake waiters instead of
//! leaving them to sleep out a poll interval. The mutex is intentionally
//! coarse; operations are rare relative to timeout granularity.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

struct GateState {
    signaled: bool,
    /// Start of the current timeout window. Monotonically non-decreasing
    /// while unsignaled; rebased by `update_timeout` and at wait entry.
    window_start: Instant,
}

/// A signal/wait gate whose timeout window can be pushed forward by
/// outside activity.
pub struct ResettableTimeoutGate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl ResettableTimeoutGate {
    /// Create an unsignaled gate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                signaled: false,
                window_start: Instant::now(),
            }),
            cond: Condvar::new(),
        }
    }

    /// Block until the gate is signaled or `timeout` elapses since the
    /// most recent window rebase.
    ///
    /// Returns `true` if the gate was signaled before the deadline,
    /// `false` on timeout. The wait rebases the window to now on entry,
    /// so the deadline is measured from the call, and every later
    /// `update_timeout` pushes it out again.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.wait_with_interval(timeout, Duration::ZERO)
    }

    /// [`wait`](Self::wait) with each internal sleep capped at
    /// `poll_interval` (zero means "sleep the full remaining window").
    ///
    /// The cap only bounds how long a single condvar wait lasts; the
    /// outcome and deadline arithmetic are identical to `wait`.
    pub fn wait_with_interval(&self, timeout: Duration, poll_interval: Duration) -> bool {
        let mut state = self.state.lock().unwrap();
        state.window_start = Instant::now();

        loop {
            if state.signaled {
                return true;
            }

            // window_start is re-read each iteration: update_timeout may
            // have rebased it while we slept.
            let elapsed = state.window_start.elapsed();
            if elapsed >= timeout {
                return false;
            }

            let mut sleep_for = timeout - elapsed;
            if !poll_interval.is_zero() && poll_interval < sleep_for {
                sleep_for = poll_interval;
            }

            let (guard, _timed_out) = self.cond.wait_timeout(state, sleep_for).unwrap();
            state = guard;
        }
    }

    /// Signal the gate. Every blocked and future `wait` returns `true`
    /// until [`reset`](Self::reset). Idempotent.
    pub fn set(&self) {
        let mut state = self.state.lock().unwrap();
        state.signaled = true;
        self.cond.notify_all();
    }

    /// Rebase the timeout window to now, extending the deadline of any
    /// in-flight `wait`.
    pub fn update_timeout(&self) {
        let mut state = self.state.lock().unwrap();
        state.window_start = Instant::now();
        self.cond.notify_all();
    }

    /// Rearm a signaled gate for reuse.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.signaled = false;
        state.window_start = Instant::now();
    }

    /// Whether the gate is currently signaled.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.state.lock().unwrap().signaled
    }
}

impl Default for ResettableTimeoutGate {
    fn default() -> Self {
        Self::new()
    }
}
