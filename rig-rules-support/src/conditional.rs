use crate::group::{CompositeRule, GroupKind, RuleGroup};
use rig_rules::{Facts, Rule, RuleError};
use std::sync::Arc;

/// The primary member gates the group; once the group fires, every other
/// member fires if it applies on its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct Conditional;

pub type ConditionalRuleGroup = RuleGroup<Conditional>;

impl RuleGroup<Conditional> {
    /// The member with the strictly lowest priority.
    pub fn primary(&self) -> Result<&Arc<dyn Rule>, RuleError> {
        let mut members = self.rules().iter();
        let primary = members
            .next()
            .ok_or_else(|| RuleError::EmptyGroup(self.name().to_string()))?;
        if let Some(next) = members.next() {
            if next.priority() == primary.priority() {
                return Err(RuleError::AmbiguousPrimary {
                    group: self.name().to_string(),
                    priority: primary.priority(),
                });
            }
        }
        Ok(primary)
    }
}

impl GroupKind for Conditional {
    /// An empty group never applies; a tie for the primary is an error.
    fn evaluate(group: &RuleGroup<Self>, facts: &Facts) -> Result<bool, RuleError> {
        if group.rules().is_empty() {
            return Ok(false);
        }
        let primary = group.primary()?;
        Ok(group.member_applies(primary.as_ref(), facts))
    }

    fn execute(group: &RuleGroup<Self>, facts: &mut Facts) -> Result<(), RuleError> {
        group.primary()?.execute(facts)?;
        for member in group.rules().iter().skip(1) {
            if group.member_applies(member.as_ref(), facts) {
                member.execute(facts)?;
            }
        }
        Ok(())
    }
}
