use proptest::prelude::*;
use rig_rules::{BasicRule, Rule, RuleKey, Rules};
use std::sync::Arc;

fn arb_rule() -> impl Strategy<Value = (String, i32, bool)> {
    ("[a-d]", -3i32..3, any::<bool>())
}

proptest! {
    #[test]
    fn registry_is_sorted_and_unique(specs in prop::collection::vec(arb_rule(), 0..24)) {
        let rules: Rules = specs
            .iter()
            .map(|(name, priority, is_loop)| {
                Arc::new(
                    BasicRule::new(name.clone())
                        .with_priority(*priority)
                        .with_loop(*is_loop),
                ) as Arc<dyn Rule>
            })
            .collect();

        let keys: Vec<RuleKey> = rules.iter().map(|rule| rule.key()).collect();
        for pair in keys.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }

        let mut expected: Vec<RuleKey> = specs
            .iter()
            .map(|(name, priority, is_loop)| RuleKey {
                priority: *priority,
                is_loop: *is_loop,
                name: name.clone(),
                description: rig_rules::DEFAULT_DESCRIPTION.to_string(),
            })
            .collect();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(keys, expected);
    }
}
