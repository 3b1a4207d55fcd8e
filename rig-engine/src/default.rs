use crate::base::{EngineCore, Evaluation, Flow};
use crate::{CheckResults, RulesEngine};
use rig_rules::{
    Facts, HistorySnapshot, RuleListener, Rules, RulesEngineListener, RulesEngineParameters,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fires every rule at most once, in natural order.
pub struct DefaultRulesEngine {
    core: EngineCore,
}

impl DefaultRulesEngine {
    pub fn new() -> Self {
        Self::with_parameters(RulesEngineParameters::default())
    }

    pub fn with_parameters(parameters: RulesEngineParameters) -> Self {
        Self {
            core: EngineCore::new(parameters),
        }
    }

    pub fn register_rule_listener(&mut self, listener: Arc<dyn RuleListener>) {
        self.core.register_rule_listener(listener);
    }

    pub fn register_rule_listeners(
        &mut self,
        listeners: impl IntoIterator<Item = Arc<dyn RuleListener>>,
    ) {
        for listener in listeners {
            self.core.register_rule_listener(listener);
        }
    }

    pub fn register_rules_engine_listener(&mut self, listener: Arc<dyn RulesEngineListener>) {
        self.core.register_rules_engine_listener(listener);
    }

    pub fn register_rules_engine_listeners(
        &mut self,
        listeners: impl IntoIterator<Item = Arc<dyn RulesEngineListener>>,
    ) {
        for listener in listeners {
            self.core.register_rules_engine_listener(listener);
        }
    }

    fn do_fire(&self, rules: &Rules, facts: &mut Facts) {
        if rules.is_empty() {
            warn!("no rules registered! nothing to apply");
            return;
        }
        self.core.log_session(rules, facts);
        debug!("rules evaluation started");

        for rule in rules {
            let rule = rule.as_ref();
            if self.core.exceeds_threshold(rule) {
                break;
            }
            if !self.core.should_be_evaluated(rule, facts) {
                continue;
            }
            let flow = match self.core.evaluate(rule, facts) {
                Evaluation::Triggered => self.core.apply(rule, facts),
                Evaluation::NotTriggered | Evaluation::Failed => self.core.after_non_triggered(),
            };
            if flow == Flow::Stop {
                break;
            }
        }
    }
}

impl Default for DefaultRulesEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesEngine for DefaultRulesEngine {
    fn parameters(&self) -> RulesEngineParameters {
        self.core.parameters()
    }

    fn rule_listeners(&self) -> &[Arc<dyn RuleListener>] {
        self.core.rule_listeners()
    }

    fn rules_engine_listeners(&self) -> &[Arc<dyn RulesEngineListener>] {
        self.core.rules_engine_listeners()
    }

    fn history(&self) -> HistorySnapshot {
        self.core.history()
    }

    fn fire(&self, rules: &Rules, facts: &mut Facts) {
        self.core.before_rules(rules, facts);
        self.do_fire(rules, facts);
        self.core.after_rules(rules, facts);
    }

    fn check(&self, rules: &Rules, facts: &Facts) -> CheckResults {
        self.core.check(rules, facts)
    }
}
