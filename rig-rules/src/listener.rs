use crate::error::RuleError;
use crate::rule::Rule;
use crate::rules::Rules;
use fact_registry::Facts;

/// Observer of a single rule's evaluation and execution.
///
/// Every method has a no-op default. Listeners are called in registration
/// order.
pub trait RuleListener: Send + Sync {
    /// Gate the rule. The rule is evaluated only if every registered listener
    /// returns `true`; all listeners are asked either way.
    fn before_evaluate(&self, _rule: &dyn Rule, _facts: &Facts) -> bool {
        true
    }

    fn after_evaluate(&self, _rule: &dyn Rule, _facts: &Facts, _evaluation_result: bool) {}

    fn on_evaluation_error(&self, _rule: &dyn Rule, _facts: &Facts, _error: &RuleError) {}

    fn before_execute(&self, _rule: &dyn Rule, _facts: &Facts) {}

    fn on_success(&self, _rule: &dyn Rule, _facts: &Facts) {}

    fn on_failure(&self, _rule: &dyn Rule, _facts: &Facts, _error: &RuleError) {}
}

/// Observer of a whole `fire`/`check` call.
pub trait RulesEngineListener: Send + Sync {
    /// Called once before any rule is touched.
    fn before_evaluate(&self, _rules: &Rules, _facts: &Facts) {}

    /// Called once at the end, whatever happened to the rules.
    fn after_execute(&self, _rules: &Rules, _facts: &Facts) {}
}
