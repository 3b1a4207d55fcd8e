//! Rule model for a forward-chaining rules engine.
//!
//! Defines what a rule is ([`Rule`], its natural order and identity), how
//! rules are built ([`RuleBuilder`], [`RuleProxy`]), the [`Rules`] registry
//! they are fired from, the listener protocols the engines notify, the
//! built-in [`RulesEngineHistory`] listener, and [`RulesEngineParameters`].
//!
//! The engines themselves live downstream in `rig-engine`; composite rule
//! groups in `rig-rules-support`.

mod condition;
mod default_rule;
mod error;
mod history;
mod listener;
mod parameters;
mod proxy;
mod rule;
mod rules;

pub use condition::{Action, AlwaysFalse, AlwaysTrue, Condition};
pub use default_rule::{DefaultRule, RuleBuilder};
pub use error::{RuleError, require_fact};
pub use history::{HistorySnapshot, RuleExecutionStatus, RulesEngineHistory};
pub use listener::{RuleListener, RulesEngineListener};
pub use parameters::{
    PRIORITY_THRESHOLD_ENV, RulesEngineParameters, SKIP_ON_FIRST_APPLIED_RULE_ENV,
    SKIP_ON_FIRST_FAILED_RULE_ENV, SKIP_ON_FIRST_NON_TRIGGERED_RULE_ENV,
};
pub use proxy::{Annotated, RuleMetadata, RuleProxy};
pub use rule::{
    BasicRule, DEFAULT_DESCRIPTION, DEFAULT_LOOP, DEFAULT_NAME, DEFAULT_PRIORITY, Rule, RuleKey,
    compare_rules,
};
pub use rules::Rules;

pub use fact_registry::{Fact, FactValue, Facts, FactsError};

#[cfg(feature = "derive")]
pub use rig_rules_derive::Annotated;
