use crate::CheckResults;
use rig_rules::{
    Facts, HistorySnapshot, Rule, RuleError, RuleListener, Rules, RulesEngineHistory,
    RulesEngineListener, RulesEngineParameters,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Whether a pass goes on after a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop,
}

/// Outcome of evaluating one rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Evaluation {
    Triggered,
    NotTriggered,
    Failed,
}

/// State and listener plumbing shared by both engines.
///
/// The history is registered first as both a rule listener and an engine
/// listener, so it sees every notification before user listeners do.
pub(crate) struct EngineCore {
    parameters: RulesEngineParameters,
    history: Arc<RulesEngineHistory>,
    rule_listeners: Vec<Arc<dyn RuleListener>>,
    rules_engine_listeners: Vec<Arc<dyn RulesEngineListener>>,
}

impl EngineCore {
    pub(crate) fn new(parameters: RulesEngineParameters) -> Self {
        let history = Arc::new(RulesEngineHistory::new());
        Self {
            parameters,
            rule_listeners: vec![history.clone() as Arc<dyn RuleListener>],
            rules_engine_listeners: vec![history.clone() as Arc<dyn RulesEngineListener>],
            history,
        }
    }

    pub(crate) fn parameters(&self) -> RulesEngineParameters {
        self.parameters
    }

    pub(crate) fn history(&self) -> HistorySnapshot {
        self.history.snapshot()
    }

    pub(crate) fn rule_listeners(&self) -> &[Arc<dyn RuleListener>] {
        &self.rule_listeners
    }

    pub(crate) fn rules_engine_listeners(&self) -> &[Arc<dyn RulesEngineListener>] {
        &self.rules_engine_listeners
    }

    pub(crate) fn register_rule_listener(&mut self, listener: Arc<dyn RuleListener>) {
        self.rule_listeners.push(listener);
    }

    pub(crate) fn register_rules_engine_listener(
        &mut self,
        listener: Arc<dyn RulesEngineListener>,
    ) {
        self.rules_engine_listeners.push(listener);
    }

    // ── Engine listeners ─────────────────────────────────────────────────────

    pub(crate) fn before_rules(&self, rules: &Rules, facts: &Facts) {
        for listener in &self.rules_engine_listeners {
            listener.before_evaluate(rules, facts);
        }
    }

    pub(crate) fn after_rules(&self, rules: &Rules, facts: &Facts) {
        for listener in &self.rules_engine_listeners {
            listener.after_execute(rules, facts);
        }
    }

    // ── Rule listeners and policies ──────────────────────────────────────────

    /// Ask every rule listener whether `rule` may be evaluated.
    ///
    /// All listeners are asked, even after one has said no.
    pub(crate) fn should_be_evaluated(&self, rule: &dyn Rule, facts: &Facts) -> bool {
        let allowed = self
            .rule_listeners
            .iter()
            .fold(true, |allowed, listener| listener.before_evaluate(rule, facts) && allowed);
        if !allowed {
            debug!(rule = %rule.name(), "rule has been skipped before being evaluated");
        }
        allowed
    }

    pub(crate) fn exceeds_threshold(&self, rule: &dyn Rule) -> bool {
        let threshold = self.parameters.priority_threshold();
        let priority = rule.priority();
        if priority > threshold {
            debug!(
                rule = %rule.name(),
                priority,
                threshold,
                "rule priority threshold exceeded, next rules will be skipped"
            );
            return true;
        }
        false
    }

    /// Evaluate `rule` and notify listeners of the outcome.
    ///
    /// A failed evaluation counts as `false`. With
    /// `skip_on_first_non_triggered_rule` set, the pass stops right after the
    /// error is reported and `after_evaluate` is not called.
    pub(crate) fn evaluate(&self, rule: &dyn Rule, facts: &Facts) -> Evaluation {
        match rule.evaluate(facts) {
            Ok(true) => {
                for listener in &self.rule_listeners {
                    listener.after_evaluate(rule, facts, true);
                }
                Evaluation::Triggered
            }
            Ok(false) => self.not_triggered(rule, facts),
            Err(err) => {
                self.evaluation_failed(rule, facts, &err);
                if self.parameters.skip_on_first_non_triggered_rule() {
                    return Evaluation::Failed;
                }
                self.not_triggered(rule, facts)
            }
        }
    }

    /// Report `rule` as evaluated to `false`.
    pub(crate) fn not_triggered(&self, rule: &dyn Rule, facts: &Facts) -> Evaluation {
        debug!(
            rule = %rule.name(),
            "rule has been evaluated to false, it has not been executed"
        );
        for listener in &self.rule_listeners {
            listener.after_evaluate(rule, facts, false);
        }
        Evaluation::NotTriggered
    }

    fn evaluation_failed(&self, rule: &dyn Rule, facts: &Facts, err: &RuleError) {
        error!(rule = %rule.name(), error = %err, "rule evaluated with error");
        for listener in &self.rule_listeners {
            listener.on_evaluation_error(rule, facts, err);
        }
    }

    /// Skip policy for a rule that did not trigger or failed to evaluate.
    pub(crate) fn after_non_triggered(&self) -> Flow {
        if self.parameters.skip_on_first_non_triggered_rule() {
            debug!("next rules will be skipped since skip_on_first_non_triggered_rule is set");
            return Flow::Stop;
        }
        Flow::Continue
    }

    /// Execute a triggered rule, notify listeners and apply the skip policies.
    pub(crate) fn apply(&self, rule: &dyn Rule, facts: &mut Facts) -> Flow {
        let name = rule.name();
        debug!(rule = %name, "rule triggered");
        for listener in &self.rule_listeners {
            listener.before_execute(rule, facts);
        }

        match rule.execute(facts) {
            Ok(()) => {
                debug!(rule = %name, "rule performed successfully");
                for listener in &self.rule_listeners {
                    listener.on_success(rule, facts);
                }
                if self.parameters.skip_on_first_applied_rule() {
                    debug!("next rules will be skipped since skip_on_first_applied_rule is set");
                    return Flow::Stop;
                }
            }
            Err(err) => {
                error!(rule = %name, error = %err, "rule performed with error");
                for listener in &self.rule_listeners {
                    listener.on_failure(rule, facts, &err);
                }
                if self.parameters.skip_on_first_failed_rule() {
                    debug!("next rules will be skipped since skip_on_first_failed_rule is set");
                    return Flow::Stop;
                }
            }
        }
        Flow::Continue
    }

    pub(crate) fn log_session(&self, rules: &Rules, facts: &Facts) {
        debug!("{}", self.parameters);
        debug!("registered rules:");
        for rule in rules {
            debug!(
                rule = %rule.name(),
                description = %rule.description(),
                priority = rule.priority(),
                "rule"
            );
        }
        debug!("known facts:");
        for fact in facts {
            debug!("{fact}");
        }
    }

    // ── Dry run ──────────────────────────────────────────────────────────────

    pub(crate) fn check(&self, rules: &Rules, facts: &Facts) -> CheckResults {
        self.before_rules(rules, facts);
        debug!("checking rules");

        let mut results = CheckResults::new();
        for rule in rules {
            let rule = rule.as_ref();
            if !self.should_be_evaluated(rule, facts) {
                continue;
            }
            let result = match rule.evaluate(facts) {
                Ok(result) => result,
                Err(err) => {
                    self.evaluation_failed(rule, facts, &err);
                    false
                }
            };
            results.insert(rule.key(), result);
        }

        self.after_rules(rules, facts);
        results
    }
}
