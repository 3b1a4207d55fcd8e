use crate::group::{CompositeRule, GroupKind, RuleGroup};
use rig_rules::{Facts, RuleError};

/// All members apply and all fire, or nothing fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unit;

pub type UnitRuleGroup = RuleGroup<Unit>;

impl GroupKind for Unit {
    /// An empty group never applies.
    fn evaluate(group: &RuleGroup<Self>, facts: &Facts) -> Result<bool, RuleError> {
        let members = group.rules();
        if members.is_empty() {
            return Ok(false);
        }
        Ok(members
            .iter()
            .all(|member| group.member_applies(member.as_ref(), facts)))
    }

    fn execute(group: &RuleGroup<Self>, facts: &mut Facts) -> Result<(), RuleError> {
        for member in group.rules() {
            member.execute(facts)?;
        }
        Ok(())
    }
}
