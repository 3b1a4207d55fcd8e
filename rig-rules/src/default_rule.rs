use crate::condition::{Action, AlwaysFalse, Condition};
use crate::error::RuleError;
use crate::rule::{BasicRule, DEFAULT_NAME, Rule};
use fact_registry::Facts;
use std::fmt;
use tracing::debug;

/// A rule made of one condition and an ordered list of actions.
pub struct DefaultRule {
    basic: BasicRule,
    condition: Box<dyn Condition>,
    actions: Vec<Box<dyn Action>>,
}

impl DefaultRule {
    pub fn builder() -> RuleBuilder {
        RuleBuilder::new()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Clear the fired flag so the rule can fire again in a new session.
    pub fn reset(&self) {
        self.basic.reset();
    }
}

impl fmt::Debug for DefaultRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultRule")
            .field("basic", &self.basic)
            .field("actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}

impl Rule for DefaultRule {
    fn name(&self) -> &str {
        self.basic.name()
    }

    fn description(&self) -> &str {
        self.basic.description()
    }

    fn priority(&self) -> i32 {
        self.basic.priority()
    }

    fn is_loop(&self) -> bool {
        self.basic.is_loop()
    }

    fn has_fired(&self) -> bool {
        self.basic.has_fired()
    }

    /// A rule that is not loop-enabled no longer applies once it has fired,
    /// until [`DefaultRule::reset`] is called.
    fn evaluate(&self, facts: &Facts) -> Result<bool, RuleError> {
        if !self.is_loop() && self.has_fired() {
            debug!(rule = %self.name(), "rule has already fired and is not loop-enabled");
            return Ok(false);
        }
        self.condition.evaluate(facts)
    }

    /// Runs the actions in declaration order and stops at the first failure.
    /// The rule counts as fired even when an action fails.
    fn execute(&self, facts: &mut Facts) -> Result<(), RuleError> {
        self.basic.mark_fired();
        for (index, action) in self.actions.iter().enumerate() {
            if let Err(err) = action.execute(facts) {
                debug!(
                    rule = %self.name(),
                    action = index,
                    error = %err,
                    "action failed, remaining actions skipped"
                );
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Fluent builder for [`DefaultRule`].
///
/// Without `when`, the rule never triggers.
pub struct RuleBuilder {
    basic: BasicRule,
    condition: Box<dyn Condition>,
    actions: Vec<Box<dyn Action>>,
}

impl RuleBuilder {
    pub fn new() -> Self {
        Self {
            basic: BasicRule::new(DEFAULT_NAME),
            condition: Box::new(AlwaysFalse),
            actions: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.basic = self.basic.with_name(name);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.basic = self.basic.with_description(description);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.basic = self.basic.with_priority(priority);
        self
    }

    pub fn loop_enabled(mut self, is_loop: bool) -> Self {
        self.basic = self.basic.with_loop(is_loop);
        self
    }

    /// Set the condition from a closure.
    pub fn when<F>(self, condition: F) -> Self
    where
        F: Fn(&Facts) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        self.when_condition(condition)
    }

    pub fn when_condition(mut self, condition: impl Condition + 'static) -> Self {
        self.condition = Box::new(condition);
        self
    }

    /// Append an action given as a closure.
    pub fn then<F>(self, action: F) -> Self
    where
        F: Fn(&mut Facts) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        self.then_action(action)
    }

    pub fn then_action(mut self, action: impl Action + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    pub fn build(self) -> DefaultRule {
        DefaultRule {
            basic: self.basic,
            condition: self.condition,
            actions: self.actions,
        }
    }
}

impl Default for RuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
