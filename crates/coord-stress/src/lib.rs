//! # coord-stress
//!
//! Seeded stress harness for producer/consumer workloads.
//!
//! The harness fixes the workload from a seed: which items each
//! producer submits, and where threads inject scheduling jitter. Thread
//! interleaving itself is still up to the OS — this is stress testing,
//! not simulation — but a failing run prints its seed so the same
//! workload can be replayed while chasing the bug.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use coord_stress::{run_producer_consumer, StressConfig};
//! # struct Target;
//! # impl coord_stress::StressTarget for Target {
//! #     fn produce(&self, _item: u64) -> bool { true }
//! #     fn consume(&self) -> Option<u64> { None }
//! #     fn shutdown(&self) {}
//! # }
//!
//! let seed = coord_stress::get_or_generate_seed();
//! let report = run_producer_consumer(Arc::new(Target), &StressConfig::quick(), seed);
//! assert_eq!(report.consumed.len(), report.produced.len());
//! ```
//!
//! ## Reproducibility
//!
//! To replay a failing workload:
//! ```bash
//! STRESS_SEED=12345 cargo test
//! ```

pub mod harness;
pub mod random;

pub use harness::{run_producer_consumer, StressConfig, StressReport, StressTarget};
pub use random::DeterministicRng;

/// Get the stress seed from the environment or generate a random one.
///
/// Prints the seed in use. Set `STRESS_SEED=<seed>` to reproduce a run.
#[must_use]
pub fn get_or_generate_seed() -> u64 {
    match std::env::var("STRESS_SEED") {
        Ok(s) => {
            let seed: u64 = s.parse().expect("STRESS_SEED must be a valid u64");
            println!("STRESS_SEED={seed} (from environment)");
            seed
        }
        Err(_) => {
            let seed = rand::random::<u64>();
            println!("STRESS_SEED={seed} (randomly generated)");
            seed
        }
    }
}
