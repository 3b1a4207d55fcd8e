use rig_rules::{BasicRule, DEFAULT_NAME, DEFAULT_PRIORITY, Facts, Rule, RuleError, Rules};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// What evaluating and executing a [`RuleGroup`] means.
pub trait GroupKind: Send + Sync + Sized + 'static {
    fn evaluate(group: &RuleGroup<Self>, facts: &Facts) -> Result<bool, RuleError>;

    /// Only called once the group has been selected.
    fn execute(group: &RuleGroup<Self>, facts: &mut Facts) -> Result<(), RuleError>;
}

/// A rule made of member rules.
pub trait CompositeRule: Rule {
    /// Add a member; returns `false` if an equal rule is already a member.
    fn add_rule(&mut self, rule: Arc<dyn Rule>) -> bool;

    fn remove_rule(&mut self, rule: &dyn Rule) -> bool;

    /// Members in natural order.
    fn rules(&self) -> &Rules;
}

/// A named group of member rules with [`GroupKind`] semantics.
///
/// Unless set with [`with_priority`](Self::with_priority), the group's
/// priority is the lowest member priority, or [`DEFAULT_PRIORITY`] while the
/// group is empty. Members are added before the group is registered: a
/// registered group is shared and can no longer change its priority.
pub struct RuleGroup<K> {
    basic: BasicRule,
    priority: Option<i32>,
    members: Rules,
    kind: PhantomData<K>,
}

impl<K: GroupKind> RuleGroup<K> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            basic: BasicRule::new(name),
            priority: None,
            members: Rules::new(),
            kind: PhantomData,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.basic = self.basic.with_description(description);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_loop(mut self, is_loop: bool) -> Self {
        self.basic = self.basic.with_loop(is_loop);
        self
    }

    /// Builder form of [`CompositeRule::add_rule`].
    pub fn with_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.members.register(rule);
        self
    }

    /// Clear the fired flag of the group. Members keep theirs.
    pub fn reset(&self) {
        self.basic.reset();
    }

    /// Evaluate a member; an evaluation error means the member does not apply.
    pub fn member_applies(&self, member: &dyn Rule, facts: &Facts) -> bool {
        match member.evaluate(facts) {
            Ok(applies) => applies,
            Err(err) => {
                debug!(
                    group = %self.name(),
                    rule = %member.name(),
                    error = %err,
                    "member evaluated with error, treating it as not applying"
                );
                false
            }
        }
    }
}

impl<K: GroupKind> Default for RuleGroup<K> {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl<K> fmt::Debug for RuleGroup<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleGroup")
            .field("kind", &std::any::type_name::<K>())
            .field("basic", &self.basic)
            .field("priority", &self.priority)
            .field("members", &self.members)
            .finish()
    }
}

impl<K: GroupKind> CompositeRule for RuleGroup<K> {
    fn add_rule(&mut self, rule: Arc<dyn Rule>) -> bool {
        self.members.register(rule)
    }

    fn remove_rule(&mut self, rule: &dyn Rule) -> bool {
        self.members.unregister(rule)
    }

    fn rules(&self) -> &Rules {
        &self.members
    }
}

impl<K: GroupKind> Rule for RuleGroup<K> {
    fn name(&self) -> &str {
        self.basic.name()
    }

    fn description(&self) -> &str {
        self.basic.description()
    }

    fn priority(&self) -> i32 {
        self.priority
            .or_else(|| self.members.iter().next().map(|member| member.priority()))
            .unwrap_or(DEFAULT_PRIORITY)
    }

    fn is_loop(&self) -> bool {
        self.basic.is_loop()
    }

    fn has_fired(&self) -> bool {
        self.basic.has_fired()
    }

    fn evaluate(&self, facts: &Facts) -> Result<bool, RuleError> {
        K::evaluate(self, facts)
    }

    fn execute(&self, facts: &mut Facts) -> Result<(), RuleError> {
        self.basic.mark_fired();
        K::execute(self, facts)
    }
}
