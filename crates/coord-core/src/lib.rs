//! # coord-core
//!
//! Property traits and checkers for the coordination primitives.
//!
//! This crate provides:
//! - `PropertyResult` and `PropertyChecker` for verifying invariants
//! - `Counterexample` for rendering failure paths with a reproduction seed
//! - Per-primitive property traits (e.g. `ChannelProperties`)
//!
//! Implementations (or tracked wrappers around them) expose their
//! observable history through a properties trait; the matching checker
//! verifies every invariant against that history after a run. Stress
//! tests carry the seed of the run into the checker so a violation
//! prints how to reproduce it.

pub mod counterexample;
pub mod invariants;
pub mod property;

pub use counterexample::{Counterexample, StateSnapshot, ThreadAction};
pub use property::{PropertyChecker, PropertyResult};
