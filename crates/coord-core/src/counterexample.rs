//! Counterexample representation and rendering.
//!
//! When a property violation is detected, a counterexample shows the
//! state (and, when known, the thread interleaving) that led to the
//! failure, plus the stress seed needed to replay the run.

use std::fmt;

/// A failure path captured at violation time.
#[derive(Debug, Clone, Default)]
pub struct Counterexample {
    /// State snapshots in step order.
    pub states: Vec<StateSnapshot>,
    /// Thread actions leading to the failure, if recorded.
    pub interleaving: Vec<ThreadAction>,
    /// Seed of the stress run that produced this failure, if any.
    pub seed: Option<u64>,
}

/// Snapshot of relevant state at one step.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    /// Step number in the execution.
    pub step: u64,
    /// What this snapshot shows.
    pub description: String,
    /// Named variable values at this point.
    pub variables: Vec<(String, String)>,
}

/// One action taken by one thread.
#[derive(Debug, Clone)]
pub struct ThreadAction {
    /// Thread identifier.
    pub thread_id: u64,
    /// Step number when the action occurred.
    pub step: u64,
    /// Description of the action.
    pub action: String,
}

impl Counterexample {
    /// An empty counterexample.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty counterexample carrying a reproduction seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Append a state snapshot. Steps must arrive in order.
    pub fn add_state(&mut self, state: StateSnapshot) {
        debug_assert!(
            self.states.last().map_or(true, |s| state.step >= s.step),
            "states must be added in step order"
        );
        self.states.push(state);
    }

    /// Append a thread action.
    pub fn add_action(&mut self, action: ThreadAction) {
        self.interleaving.push(action);
    }
}

impl fmt::Display for Counterexample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "counterexample:")?;
        if let Some(seed) = self.seed {
            writeln!(f, "  reproduce with STRESS_SEED={seed}")?;
        }
        for state in &self.states {
            writeln!(f, "  step {}: {}", state.step, state.description)?;
            for (name, value) in &state.variables {
                writeln!(f, "    {name} = {value}")?;
            }
        }
        for action in &self.interleaving {
            writeln!(
                f,
                "  [thread {}] step {}: {}",
                action.thread_id, action.step, action.action
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_seed_and_states() {
        let mut ce = Counterexample::with_seed(42);
        ce.add_state(StateSnapshot {
            step: 1,
            description: "item 3 lost".to_string(),
            variables: vec![("produced".to_string(), "[1, 2, 3]".to_string())],
        });

        let rendered = ce.to_string();
        assert!(rendered.contains("STRESS_SEED=42"));
        assert!(rendered.contains("item 3 lost"));
        assert!(rendered.contains("produced = [1, 2, 3]"));
    }
}
