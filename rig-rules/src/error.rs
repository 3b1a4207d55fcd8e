use fact_registry::{Facts, FactsError};
use std::any::Any;
use thiserror::Error;

/// Failure raised by a rule's condition or action.
///
/// The engines never propagate these: an evaluation error is reported through
/// `RuleListener::on_evaluation_error`, an execution error through
/// `RuleListener::on_failure`.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("fact '{0}' is missing")]
    MissingFact(String),

    #[error("fact '{name}' is not a {expected}")]
    FactType {
        name: String,
        expected: &'static str,
    },

    /// A conditional group has no single member with the highest priority.
    #[error("rule group '{group}' has more than one member with the highest priority ({priority})")]
    AmbiguousPrimary { group: String, priority: i32 },

    #[error("rule group '{0}' has no members")]
    EmptyGroup(String),

    #[error(transparent)]
    Facts(#[from] FactsError),

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl RuleError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Look up a fact a condition or action cannot do without.
///
/// Distinguishes a missing fact from a fact of the wrong type.
pub fn require_fact<'a, T: Any>(facts: &'a Facts, name: &str) -> Result<&'a T, RuleError> {
    let fact = facts
        .get_fact(name)
        .ok_or_else(|| RuleError::MissingFact(name.to_string()))?;
    fact.value::<T>().ok_or_else(|| RuleError::FactType {
        name: name.to_string(),
        expected: std::any::type_name::<T>(),
    })
}
