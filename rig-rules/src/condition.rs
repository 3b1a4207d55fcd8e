use crate::error::RuleError;
use fact_registry::Facts;

/// The condition half of a rule.
///
/// Closures `Fn(&Facts) -> Result<bool, RuleError>` are conditions.
pub trait Condition: Send + Sync {
    fn evaluate(&self, facts: &Facts) -> Result<bool, RuleError>;
}

impl<F> Condition for F
where
    F: Fn(&Facts) -> Result<bool, RuleError> + Send + Sync,
{
    fn evaluate(&self, facts: &Facts) -> Result<bool, RuleError> {
        self(facts)
    }
}

/// The action half of a rule.
///
/// Closures `Fn(&mut Facts) -> Result<(), RuleError>` are actions.
pub trait Action: Send + Sync {
    fn execute(&self, facts: &mut Facts) -> Result<(), RuleError>;
}

impl<F> Action for F
where
    F: Fn(&mut Facts) -> Result<(), RuleError> + Send + Sync,
{
    fn execute(&self, facts: &mut Facts) -> Result<(), RuleError> {
        self(facts)
    }
}

/// Condition that always holds.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysTrue;

impl Condition for AlwaysTrue {
    fn evaluate(&self, _facts: &Facts) -> Result<bool, RuleError> {
        Ok(true)
    }
}

/// Condition that never holds.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysFalse;

impl Condition for AlwaysFalse {
    fn evaluate(&self, _facts: &Facts) -> Result<bool, RuleError> {
        Ok(false)
    }
}
