#![cfg(not(loom))]
//! Timing behavior of the resettable timeout gate.
//!
//! Bounds are deliberately loose on the upper side: CI schedulers can
//! delay a woken thread arbitrarily. The lower bounds are hard — the
//! gate must never report a timeout before the window actually elapsed.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use coord_sync::ResettableTimeoutGate;

#[test]
fn unsignaled_wait_elapses_the_full_window() {
    let gate = ResettableTimeoutGate::new();
    let timeout = Duration::from_millis(200);

    let started = Instant::now();
    let signaled = gate.wait(timeout);
    let elapsed = started.elapsed();

    assert!(!signaled);
    assert!(elapsed >= timeout, "returned early: {elapsed:?}");
    assert!(elapsed < timeout * 3, "overslept: {elapsed:?}");
}

#[test]
fn update_timeout_pushes_the_deadline_out() {
    let gate = Arc::new(ResettableTimeoutGate::new());
    let timeout = Duration::from_millis(300);
    let update_after = Duration::from_millis(150);

    let updater = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || {
            thread::sleep(update_after);
            gate.update_timeout();
        })
    };

    let started = Instant::now();
    let signaled = gate.wait(timeout);
    let elapsed = started.elapsed();
    updater.join().unwrap();

    assert!(!signaled);
    // The rebase happened no earlier than update_after, so the
    // effective deadline is at least update_after + timeout.
    let minimum = update_after + timeout - Duration::from_millis(20);
    assert!(
        elapsed >= minimum,
        "deadline was not extended: waited only {elapsed:?}"
    );
    assert!(elapsed < (update_after + timeout) * 3, "overslept: {elapsed:?}");
}

#[test]
fn set_wins_over_an_extended_deadline() {
    let gate = Arc::new(ResettableTimeoutGate::new());

    let driver = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            gate.update_timeout();
            thread::sleep(Duration::from_millis(50));
            gate.set();
        })
    };

    let started = Instant::now();
    let signaled = gate.wait(Duration::from_secs(30));
    driver.join().unwrap();

    assert!(signaled);
    assert!(
        started.elapsed() < Duration::from_secs(15),
        "wait should return on the signal, not the deadline"
    );
}

#[test]
fn repeated_updates_keep_an_alive_worker_from_timing_out() {
    let gate = Arc::new(ResettableTimeoutGate::new());

    // Worker proves liveness every 40ms, then signals completion; the
    // 120ms quiet window must never elapse while it does.
    let worker = {
        let gate = Arc::clone(&gate);
        thread::spawn(move || {
            for _ in 0..5 {
                thread::sleep(Duration::from_millis(40));
                gate.update_timeout();
            }
            gate.set();
        })
    };

    let signaled = gate.wait(Duration::from_millis(120));
    worker.join().unwrap();

    assert!(signaled, "watchdog fired despite keep-alives");
}
