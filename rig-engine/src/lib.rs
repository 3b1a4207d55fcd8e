//! Engines that fire a [`Rules`] registry against [`Facts`].
//!
//! [`DefaultRulesEngine`] makes one ordered pass over the rules.
//! [`InferenceRulesEngine`] keeps selecting and firing candidate rules until a
//! pass selects none, so rules can enable each other through the facts.

mod base;
mod default;
mod inference;

pub use default::DefaultRulesEngine;
pub use inference::InferenceRulesEngine;

use indexmap::IndexMap;
use rig_rules::{
    Facts, HistorySnapshot, RuleKey, RuleListener, Rules, RulesEngineListener,
    RulesEngineParameters,
};
use std::sync::Arc;

/// Evaluation result of every rule that passed the listener gate, in natural
/// order.
pub type CheckResults = IndexMap<RuleKey, bool>;

/// Common surface of the engines.
pub trait RulesEngine {
    /// Copy of the engine's parameters.
    fn parameters(&self) -> RulesEngineParameters;

    fn rule_listeners(&self) -> &[Arc<dyn RuleListener>];

    fn rules_engine_listeners(&self) -> &[Arc<dyn RulesEngineListener>];

    /// Copy of the history recorded by the last `fire`/`check` call.
    fn history(&self) -> HistorySnapshot;

    /// Fire the rules. All effects are visible through the facts, the rules'
    /// fired flags and the history; rule errors are reported to listeners.
    fn fire(&self, rules: &Rules, facts: &mut Facts);

    /// Evaluate the rules without executing any action.
    ///
    /// Ignores the priority threshold and every skip policy.
    fn check(&self, rules: &Rules, facts: &Facts) -> CheckResults;
}
