use crate::group::{CompositeRule, GroupKind, RuleGroup};
use rig_rules::{Facts, RuleError};

/// First match wins: only the first applying member, in natural order, fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct Activation;

pub type ActivationRuleGroup = RuleGroup<Activation>;

impl GroupKind for Activation {
    fn evaluate(group: &RuleGroup<Self>, facts: &Facts) -> Result<bool, RuleError> {
        Ok(group
            .rules()
            .iter()
            .any(|member| group.member_applies(member.as_ref(), facts)))
    }

    fn execute(group: &RuleGroup<Self>, facts: &mut Facts) -> Result<(), RuleError> {
        let selected = group
            .rules()
            .iter()
            .find(|member| group.member_applies(member.as_ref(), facts))
            .cloned();
        if let Some(member) = selected {
            member.execute(facts)?;
        }
        Ok(())
    }
}
