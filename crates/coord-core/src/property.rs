//! Property check results and the checker trait.

use std::fmt;

use crate::counterexample::Counterexample;

/// Outcome of checking a single named property.
#[derive(Debug, Clone)]
pub struct PropertyResult {
    /// Property name, e.g. `NoLostItems`.
    pub property: String,
    /// Whether the property held.
    pub passed: bool,
    /// Failure details, if any.
    pub details: Option<String>,
    /// Failure path, if one was captured.
    pub counterexample: Option<Counterexample>,
}

impl PropertyResult {
    /// A passing result.
    #[must_use]
    pub fn pass(property: &str) -> Self {
        Self {
            property: property.to_string(),
            passed: true,
            details: None,
            counterexample: None,
        }
    }

    /// A failing result with details and an optional counterexample.
    #[must_use]
    pub fn fail(property: &str, details: String, counterexample: Option<Counterexample>) -> Self {
        Self {
            property: property.to_string(),
            passed: false,
            details: Some(details),
            counterexample,
        }
    }
}

impl fmt::Display for PropertyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(f, "PASS {}", self.property)
        } else {
            write!(
                f,
                "FAIL {}: {}",
                self.property,
                self.details.as_deref().unwrap_or("no details")
            )?;
            if let Some(ce) = &self.counterexample {
                write!(f, "\n{ce}")?;
            }
            Ok(())
        }
    }
}

/// A checker that verifies every invariant of one structure.
pub trait PropertyChecker {
    /// Run all checks and return one result per property.
    fn check_all(&self) -> Vec<PropertyResult>;

    /// Panic with a rendered report if any property failed. Intended
    /// for use at the end of a test run.
    fn assert_all(&self) {
        let results = self.check_all();
        let failures: Vec<&PropertyResult> = results.iter().filter(|r| !r.passed).collect();
        assert!(
            failures.is_empty(),
            "{} propert{} violated:\n{}",
            failures.len(),
            if failures.len() == 1 { "y" } else { "ies" },
            failures
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysPasses;

    impl PropertyChecker for AlwaysPasses {
        fn check_all(&self) -> Vec<PropertyResult> {
            vec![PropertyResult::pass("Trivial")]
        }
    }

    struct AlwaysFails;

    impl PropertyChecker for AlwaysFails {
        fn check_all(&self) -> Vec<PropertyResult> {
            vec![PropertyResult::fail("Trivial", "broken".to_string(), None)]
        }
    }

    #[test]
    fn assert_all_accepts_passing_results() {
        AlwaysPasses.assert_all();
    }

    #[test]
    #[should_panic(expected = "Trivial")]
    fn assert_all_panics_on_failure() {
        AlwaysFails.assert_all();
    }

    #[test]
    fn display_includes_details_on_failure() {
        let result = PropertyResult::fail("NoLostItems", "item 3 lost".to_string(), None);
        assert_eq!(result.to_string(), "FAIL NoLostItems: item 3 lost");
    }
}
