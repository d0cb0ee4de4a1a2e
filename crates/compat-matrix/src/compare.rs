//! Outcome comparison between resolved expectations and emitted output.
//!
//! Sequences are compared element-wise and in order; lengths must match.
//! Positions past the end of either side are reported as `None`, which keeps
//! a missing entry distinguishable from an emitted empty string.

use serde::{Deserialize, Serialize};

use crate::env::TargetEnv;
use crate::probe::ProbeCase;

/// First position at which expected and actual output disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    pub index: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// Result of comparing one execution against its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Pass,
    Mismatch {
        expected: Vec<String>,
        actual: Vec<String>,
        first_difference: Difference,
    },
}

impl Comparison {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Comparison::Pass)
    }
}

/// Finds the first differing position, or `None` when the sequences are equal.
#[must_use]
pub fn first_difference(expected: &[String], actual: &[String]) -> Option<Difference> {
    let len = expected.len().max(actual.len());
    (0..len).find_map(|index| {
        let expected = expected.get(index);
        let actual = actual.get(index);
        (expected != actual).then(|| Difference {
            index,
            expected: expected.cloned(),
            actual: actual.cloned(),
        })
    })
}

/// Compares `actual` against the expectation `case` resolves for `env`.
#[must_use]
pub fn compare(case: &ProbeCase, env: TargetEnv, actual: &[String]) -> Comparison {
    compare_sequences(case.expected(env), actual)
}

#[must_use]
pub fn compare_sequences(expected: &[String], actual: &[String]) -> Comparison {
    match first_difference(expected, actual) {
        None => Comparison::Pass,
        Some(first_difference) => Comparison::Mismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
            first_difference,
        },
    }
}
