use crate::condition::{Action, Condition};
use crate::error::RuleError;
use crate::rule::{BasicRule, DEFAULT_DESCRIPTION, DEFAULT_LOOP, DEFAULT_PRIORITY, Rule};
use fact_registry::Facts;

/// Rule attributes declared on a plain type, usually via
/// `#[derive(Annotated)]` and a `#[rule(...)]` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleMetadata {
    pub name: String,
    pub description: String,
    pub priority: i32,
    pub is_loop: bool,
}

impl RuleMetadata {
    /// Metadata with the rule defaults and the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            priority: DEFAULT_PRIORITY,
            is_loop: DEFAULT_LOOP,
        }
    }
}

/// A type that carries its own rule attributes.
pub trait Annotated {
    fn metadata() -> RuleMetadata;
}

/// Adapts a plain type that is [`Annotated`], a [`Condition`] and an
/// [`Action`] into a [`Rule`].
///
/// The attributes are read once, when the proxy is built.
#[derive(Debug)]
pub struct RuleProxy<T> {
    target: T,
    basic: BasicRule,
}

impl<T> RuleProxy<T>
where
    T: Annotated + Condition + Action,
{
    pub fn new(target: T) -> Self {
        let metadata = T::metadata();
        let basic = BasicRule::new(metadata.name)
            .with_description(metadata.description)
            .with_priority(metadata.priority)
            .with_loop(metadata.is_loop);
        Self { target, basic }
    }
}

impl<T> RuleProxy<T> {
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn reset(&self) {
        self.basic.reset();
    }
}

impl<T> Rule for RuleProxy<T>
where
    T: Annotated + Condition + Action,
{
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

    fn evaluate(&self, facts: &Facts) -> Result<bool, RuleError> {
        Condition::evaluate(&self.target, facts)
    }

    fn execute(&self, facts: &mut Facts) -> Result<(), RuleError> {
        self.basic.mark_fired();
        Action::execute(&self.target, facts)
    }
}
