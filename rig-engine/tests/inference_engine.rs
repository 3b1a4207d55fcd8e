use parking_lot::Mutex;
use rig_engine::{InferenceRulesEngine, RulesEngine};
use rig_rules::{
    Action, Annotated, BasicRule, Condition, Facts, Rule, RuleError, RuleExecutionStatus::*,
    RuleProxy, Rules, RulesEngineListener, RulesEngineParameters, require_fact,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Loop-enabled rule answering evaluations from a script, then `false`.
struct ScriptedRule {
    basic: BasicRule,
    answers: Mutex<VecDeque<bool>>,
    executions: AtomicUsize,
    broken_condition: bool,
    broken_action: bool,
}

impl ScriptedRule {
    fn new(name: &str, priority: i32, answers: &[bool]) -> Self {
        Self {
            basic: BasicRule::new(name).with_priority(priority).with_loop(true),
            answers: Mutex::new(answers.iter().copied().collect()),
            executions: AtomicUsize::new(0),
            broken_condition: false,
            broken_action: false,
        }
    }

    fn without_loop(mut self) -> Self {
        self.basic = self.basic.with_loop(false);
        self
    }

    /// Every evaluation fails.
    fn with_broken_condition(mut self) -> Self {
        self.broken_condition = true;
        self
    }

    /// Every execution fails after being counted.
    fn with_broken_action(mut self) -> Self {
        self.broken_action = true;
        self
    }

    fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

impl Rule for ScriptedRule {
    fn name(&self) -> &str {
        self.basic.name()
    }

    fn priority(&self) -> i32 {
        self.basic.priority()
    }

    fn is_loop(&self) -> bool {
        self.basic.is_loop()
    }

    fn has_fired(&self) -> bool {
        self.executions() > 0
    }

    fn evaluate(&self, _facts: &Facts) -> Result<bool, RuleError> {
        if self.broken_condition {
            return Err(RuleError::failed("cannot evaluate"));
        }
        Ok(self.answers.lock().pop_front().unwrap_or(false))
    }

    fn execute(&self, _facts: &mut Facts) -> Result<(), RuleError> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        if self.broken_action {
            return Err(RuleError::failed("boom"));
        }
        Ok(())
    }
}

/// Fires while `flag` is set, then clears it and logs its name.
#[derive(Annotated)]
#[rule(name = "foo rule", priority = 1)]
struct FooRule {
    executed: AtomicBool,
}

#[derive(Annotated)]
#[rule(name = "bar rule", priority = 2)]
struct BarRule {
    executed: AtomicBool,
}

fn consume_flag(facts: &mut Facts, flag: &str) -> Result<(), RuleError> {
    facts.remove(flag);
    let order = facts
        .get_mut::<Vec<String>>("order")
        .ok_or_else(|| RuleError::MissingFact("order".into()))?;
    order.push(flag.to_string());
    Ok(())
}

impl Condition for FooRule {
    fn evaluate(&self, facts: &Facts) -> Result<bool, RuleError> {
        Ok(facts.get::<bool>("foo").copied().unwrap_or(false))
    }
}

impl Action for FooRule {
    fn execute(&self, facts: &mut Facts) -> Result<(), RuleError> {
        self.executed.store(true, Ordering::SeqCst);
        consume_flag(facts, "foo")
    }
}

impl Condition for BarRule {
    fn evaluate(&self, facts: &Facts) -> Result<bool, RuleError> {
        Ok(facts.get::<bool>("bar").copied().unwrap_or(false))
    }
}

impl Action for BarRule {
    fn execute(&self, facts: &mut Facts) -> Result<(), RuleError> {
        self.executed.store(true, Ordering::SeqCst);
        consume_flag(facts, "bar")
    }
}

fn flag_rules() -> (Arc<RuleProxy<FooRule>>, Arc<RuleProxy<BarRule>>, Rules) {
    let foo = Arc::new(RuleProxy::new(FooRule {
        executed: AtomicBool::new(false),
    }));
    let bar = Arc::new(RuleProxy::new(BarRule {
        executed: AtomicBool::new(false),
    }));
    let rules: Rules = [foo.clone() as Arc<dyn Rule>, bar.clone()].into_iter().collect();
    (foo, bar, rules)
}

fn facts_with(flags: &[&str]) -> Facts {
    let mut facts = Facts::new();
    facts.put("order", Vec::<String>::new()).unwrap();
    for flag in flags {
        facts.put(*flag, true).unwrap();
    }
    facts
}

#[test]
fn candidate_selection_fires_only_applying_rules() {
    init_tracing();
    let (foo, bar, rules) = flag_rules();
    let mut facts = facts_with(&["foo"]);

    InferenceRulesEngine::new().fire(&rules, &mut facts);

    assert!(foo.target().executed.load(Ordering::SeqCst));
    assert!(!bar.target().executed.load(Ordering::SeqCst));
}

#[test]
fn candidates_fire_in_natural_order() {
    init_tracing();
    let (foo, bar, rules) = flag_rules();
    let mut facts = facts_with(&["bar", "foo"]);

    InferenceRulesEngine::new().fire(&rules, &mut facts);

    assert!(foo.has_fired());
    assert!(bar.has_fired());
    assert_eq!(facts.get::<Vec<String>>("order").unwrap(), &["foo", "bar"]);
    assert!(!facts.contains("foo"));
    assert!(!facts.contains("bar"));
}

#[test]
fn candidate_loop_records_every_cycle() {
    init_tracing();
    let first = Arc::new(ScriptedRule::new("first", 1, &[true, false]));
    let second = Arc::new(ScriptedRule::new("second", 2, &[true, true, false]));
    let rules: Rules = [first.clone() as Arc<dyn Rule>, second.clone()]
        .into_iter()
        .collect();

    let engine = InferenceRulesEngine::new();
    engine.fire(&rules, &mut Facts::new());

    assert_eq!(first.executions(), 1);
    assert_eq!(second.executions(), 2);

    let history = engine.history();
    assert_eq!(history.len(), 8);
    assert_eq!(
        history.statuses(first.as_ref()),
        &[NotEvaluated, Executed, Skipped, Skipped]
    );
    assert_eq!(
        history.statuses(second.as_ref()),
        &[NotEvaluated, Executed, Executed, Skipped]
    );
}

#[test]
fn loop_rule_stabilizes_after_flipping_its_own_fact() {
    init_tracing();
    let toggle: Arc<dyn Rule> = Arc::new(
        rig_rules::DefaultRule::builder()
            .name("toggle")
            .loop_enabled(true)
            .when(|facts| require_fact::<bool>(facts, "armed").copied())
            .then(|facts| Ok(facts.put("armed", false)?))
            .build(),
    );
    let rules: Rules = [toggle.clone()].into_iter().collect();
    let mut facts = Facts::new();
    facts.put("armed", true).unwrap();

    let engine = InferenceRulesEngine::new();
    engine.fire(&rules, &mut facts);

    assert_eq!(facts.get::<bool>("armed"), Some(&false));
    assert_eq!(
        engine.history().statuses(toggle.as_ref()),
        &[NotEvaluated, Executed, Skipped]
    );
}

#[test]
fn skip_on_first_non_triggered_rule_stops_selection() {
    init_tracing();
    let first = Arc::new(ScriptedRule::new("first", 1, &[false]));
    let second = Arc::new(ScriptedRule::new("second", 2, &[true, true]));
    let rules: Rules = [first.clone() as Arc<dyn Rule>, second.clone()]
        .into_iter()
        .collect();
    let parameters = RulesEngineParameters::new().with_skip_on_first_non_triggered_rule(true);

    let engine = InferenceRulesEngine::with_parameters(parameters);
    engine.fire(&rules, &mut Facts::new());

    assert_eq!(second.executions(), 0);
    let history = engine.history();
    assert_eq!(history.statuses(first.as_ref()), &[NotEvaluated, Skipped]);
    assert_eq!(history.statuses(second.as_ref()), &[NotEvaluated]);
}

#[test]
fn skip_on_first_failed_rule_drops_the_rest_of_each_cycle() {
    init_tracing();
    let failing = Arc::new(ScriptedRule::new("failing", 1, &[true, true]).with_broken_action());
    let after = Arc::new(ScriptedRule::new("after", 2, &[true]));
    let rules: Rules = [failing.clone() as Arc<dyn Rule>, after.clone()]
        .into_iter()
        .collect();
    let parameters = RulesEngineParameters::new().with_skip_on_first_failed_rule(true);

    let engine = InferenceRulesEngine::with_parameters(parameters);
    engine.fire(&rules, &mut Facts::new());

    assert_eq!(failing.executions(), 2);
    assert_eq!(after.executions(), 0);
    let history = engine.history();
    assert_eq!(
        history.statuses(failing.as_ref()),
        &[NotEvaluated, ExecutionFailure, ExecutionFailure, Skipped]
    );
    assert_eq!(history.statuses(after.as_ref()), &[NotEvaluated, Skipped, Skipped]);
}

#[test]
fn condition_error_during_selection_counts_as_non_triggered() {
    init_tracing();
    let broken = Arc::new(ScriptedRule::new("broken", 1, &[]).with_broken_condition());
    let next = Arc::new(ScriptedRule::new("next", 2, &[true]));
    let rules: Rules = [broken.clone() as Arc<dyn Rule>, next.clone()]
        .into_iter()
        .collect();

    let engine = InferenceRulesEngine::new();
    engine.fire(&rules, &mut Facts::new());

    assert_eq!(next.executions(), 1);
    let history = engine.history();
    assert_eq!(
        history.statuses(broken.as_ref()),
        &[NotEvaluated, EvaluationFailure, Skipped, EvaluationFailure, Skipped]
    );
    assert_eq!(history.statuses(next.as_ref()), &[NotEvaluated, Executed, Skipped]);
}

#[test]
fn condition_error_ends_the_session_when_skipping_non_triggered() {
    init_tracing();
    let broken = Arc::new(ScriptedRule::new("broken", 1, &[]).with_broken_condition());
    let next = Arc::new(ScriptedRule::new("next", 2, &[true]));
    let rules: Rules = [broken.clone() as Arc<dyn Rule>, next.clone()]
        .into_iter()
        .collect();
    let parameters = RulesEngineParameters::new().with_skip_on_first_non_triggered_rule(true);

    let engine = InferenceRulesEngine::with_parameters(parameters);
    engine.fire(&rules, &mut Facts::new());

    assert_eq!(next.executions(), 0);
    let history = engine.history();
    assert_eq!(history.statuses(broken.as_ref()), &[NotEvaluated, EvaluationFailure]);
    assert_eq!(history.statuses(next.as_ref()), &[NotEvaluated]);
}

#[test]
fn fired_non_loop_rule_ends_the_session_when_skipping_non_triggered() {
    init_tracing();
    let once = Arc::new(ScriptedRule::new("once", 1, &[true, true, true]).without_loop());
    let follower = Arc::new(ScriptedRule::new("follower", 2, &[true, true, true]));
    let rules: Rules = [once.clone() as Arc<dyn Rule>, follower.clone()]
        .into_iter()
        .collect();
    let parameters = RulesEngineParameters::new().with_skip_on_first_non_triggered_rule(true);

    let engine = InferenceRulesEngine::with_parameters(parameters);
    engine.fire(&rules, &mut Facts::new());

    assert_eq!(once.executions(), 1);
    assert_eq!(follower.executions(), 1);
    assert_eq!(engine.history().statuses(once.as_ref()), &[NotEvaluated, Executed, Skipped]);
}

#[test]
fn engine_listener_wraps_the_session() {
    #[derive(Default)]
    struct Stub {
        before: AtomicBool,
        after: AtomicBool,
    }

    impl RulesEngineListener for Stub {
        fn before_evaluate(&self, _rules: &Rules, _facts: &Facts) {
            self.before.store(true, Ordering::SeqCst);
        }

        fn after_execute(&self, _rules: &Rules, _facts: &Facts) {
            self.after.store(true, Ordering::SeqCst);
        }
    }

    init_tracing();
    let (foo, _, rules) = flag_rules();
    let listener = Arc::new(Stub::default());
    let mut engine = InferenceRulesEngine::new();
    engine.register_rules_engine_listener(listener.clone());

    engine.fire(&rules, &mut facts_with(&["foo"]));

    assert!(listener.before.load(Ordering::SeqCst));
    assert!(listener.after.load(Ordering::SeqCst));
    assert!(foo.has_fired());
}

#[test]
fn check_leaves_facts_and_fired_flags_alone() {
    init_tracing();
    let (foo, bar, rules) = flag_rules();
    let facts = facts_with(&["foo"]);

    let results = InferenceRulesEngine::new().check(&rules, &facts);

    assert_eq!(results.get(&foo.key()), Some(&true));
    assert_eq!(results.get(&bar.key()), Some(&false));
    assert!(facts.contains("foo"));
    assert!(!foo.has_fired());
    assert!(!bar.has_fired());
}
