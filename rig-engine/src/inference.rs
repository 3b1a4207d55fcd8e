use crate::base::{EngineCore, Evaluation, Flow};
use crate::{CheckResults, RulesEngine};
use rig_rules::{
    Facts, HistorySnapshot, RuleListener, Rules, RulesEngineListener, RulesEngineParameters,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Forward-chaining engine.
///
/// Each cycle selects the rules that currently apply and fires them; the
/// session ends when a cycle selects nothing. A rule that is not loop-enabled
/// is never selected again once it has fired.
///
/// Candidate selection stops at the first rule whose priority exceeds the
/// priority threshold. Rules past that point are neither evaluated nor fired.
///
/// Without a cycle limit, a loop-enabled rule whose condition never turns
/// false keeps the session running forever.
pub struct InferenceRulesEngine {
    core: EngineCore,
    max_cycles: Option<usize>,
}

impl InferenceRulesEngine {
    pub fn new() -> Self {
        Self::with_parameters(RulesEngineParameters::default())
    }

    pub fn with_parameters(parameters: RulesEngineParameters) -> Self {
        Self {
            core: EngineCore::new(parameters),
            max_cycles: None,
        }
    }

    /// Stop a session after `max_cycles` candidate passes.
    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    pub fn max_cycles(&self) -> Option<usize> {
        self.max_cycles
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

    /// Rules that apply to `facts`, in natural order.
    ///
    /// Selection stops at the first rule above the priority threshold, so a
    /// rule the passes would never fire cannot keep the session alive.
    fn select_candidates(&self, rules: &Rules, facts: &Facts) -> Rules {
        let mut candidates = Rules::new();
        for rule in rules {
            let current = rule.as_ref();
            if self.core.exceeds_threshold(current) {
                break;
            }
            if !self.core.should_be_evaluated(current, facts) {
                continue;
            }
            let evaluation = if !current.is_loop() && current.has_fired() {
                debug!(rule = %current.name(), "rule has already fired and is not loop-enabled");
                self.core.not_triggered(current, facts)
            } else {
                self.core.evaluate(current, facts)
            };
            match evaluation {
                Evaluation::Triggered => {
                    candidates.register(Arc::clone(rule));
                }
                Evaluation::NotTriggered | Evaluation::Failed => {
                    if self.core.after_non_triggered() == Flow::Stop {
                        break;
                    }
                }
            }
        }
        candidates
    }

    fn do_fire(&self, candidates: &Rules, facts: &mut Facts) {
        self.core.log_session(candidates, facts);
        for rule in candidates {
            if self.core.apply(rule.as_ref(), facts) == Flow::Stop {
                break;
            }
        }
    }
}

impl Default for InferenceRulesEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesEngine for InferenceRulesEngine {
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

        let mut cycles = 0usize;
        loop {
            if self.max_cycles.is_some_and(|max| cycles >= max) {
                warn!(cycles, "inference stopped after reaching the cycle limit");
                break;
            }
            debug!(facts = %facts, "selecting candidate rules");
            let candidates = self.select_candidates(rules, facts);
            if candidates.is_empty() {
                debug!(facts = %facts, "no candidate rules found");
                break;
            }
            cycles += 1;
            self.do_fire(&candidates, facts);
        }

        self.core.after_rules(rules, facts);
    }

    fn check(&self, rules: &Rules, facts: &Facts) -> CheckResults {
        self.core.check(rules, facts)
    }
}
