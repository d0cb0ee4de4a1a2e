//! Property tests for expectation resolution.

use compat_matrix::{compare_sequences, first_difference, Expectations, TargetEnv};
use proptest::prelude::*;

fn env_strategy() -> impl Strategy<Value = TargetEnv> {
    prop::sample::select(TargetEnv::ALL.to_vec())
}

fn values_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just(String::new()),
            Just("exception".to_string()),
            "[a-z\\[\\] ]{0,12}"
        ],
        0..4,
    )
}

proptest! {
    #[test]
    fn unlisted_environments_fall_back_to_default(
        default in values_strategy(),
        overrides in prop::collection::btree_map(env_strategy(), values_strategy(), 0..4),
        active in env_strategy(),
    ) {
        let mut expectations = Expectations::new(default.clone());
        for (env, values) in &overrides {
            if !env.is_default() {
                expectations = expectations.with_override(*env, values.clone());
            }
        }

        let resolved = expectations.resolve(active);
        match overrides.get(&active) {
            Some(values) if !active.is_default() => prop_assert_eq!(resolved, values.as_slice()),
            _ => prop_assert_eq!(resolved, default.as_slice()),
        }
    }

    #[test]
    fn identical_sequences_always_pass(values in values_strategy()) {
        prop_assert!(compare_sequences(&values, &values).is_pass());
    }

    #[test]
    fn first_difference_points_at_a_real_disagreement(
        expected in values_strategy(),
        actual in values_strategy(),
    ) {
        match first_difference(&expected, &actual) {
            None => prop_assert_eq!(&expected, &actual),
            Some(diff) => {
                prop_assert_eq!(diff.expected.as_ref(), expected.get(diff.index));
                prop_assert_eq!(diff.actual.as_ref(), actual.get(diff.index));
                prop_assert_ne!(expected.get(diff.index), actual.get(diff.index));
                prop_assert_eq!(&expected[..diff.index], &actual[..diff.index]);
            }
        }
    }
}
