use crate::error::RuleError;
use crate::listener::{RuleListener, RulesEngineListener};
use crate::rule::{Rule, RuleKey};
use crate::rules::Rules;
use fact_registry::Facts;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Deserialize;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// What happened to a rule during a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleExecutionStatus {
    NotEvaluated,
    Skipped,
    EvaluationFailure,
    Executed,
    ExecutionFailure,
}

/// Built-in listener that records the status transitions of every rule for
/// the current `fire`/`check` call.
///
/// The record is reset and seeded with [`RuleExecutionStatus::NotEvaluated`]
/// for every registered rule when the engine announces a new call; statuses
/// are then appended as the session goes. A rule that evaluated to `true` but
/// was never executed keeps only what it had.
#[derive(Debug, Default)]
pub struct RulesEngineHistory {
    statuses: Mutex<IndexMap<RuleKey, Vec<RuleExecutionStatus>>>,
}

impl RulesEngineHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the record so far.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            statuses: self.statuses.lock().clone(),
        }
    }

    fn record(&self, rule: &dyn Rule, status: RuleExecutionStatus) {
        self.statuses.lock().entry(rule.key()).or_default().push(status);
    }
}

impl RuleListener for RulesEngineHistory {
    fn after_evaluate(&self, rule: &dyn Rule, _facts: &Facts, evaluation_result: bool) {
        if !evaluation_result {
            self.record(rule, RuleExecutionStatus::Skipped);
        }
    }

    fn on_evaluation_error(&self, rule: &dyn Rule, _facts: &Facts, _error: &RuleError) {
        self.record(rule, RuleExecutionStatus::EvaluationFailure);
    }

    fn on_success(&self, rule: &dyn Rule, _facts: &Facts) {
        self.record(rule, RuleExecutionStatus::Executed);
    }

    fn on_failure(&self, rule: &dyn Rule, _facts: &Facts, _error: &RuleError) {
        self.record(rule, RuleExecutionStatus::ExecutionFailure);
    }
}

impl RulesEngineListener for RulesEngineHistory {
    fn before_evaluate(&self, rules: &Rules, _facts: &Facts) {
        let mut statuses = self.statuses.lock();
        statuses.clear();
        for rule in rules {
            statuses.insert(rule.key(), vec![RuleExecutionStatus::NotEvaluated]);
        }
    }
}

/// Read-only copy of a [`RulesEngineHistory`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistorySnapshot {
    statuses: IndexMap<RuleKey, Vec<RuleExecutionStatus>>,
}

impl HistorySnapshot {
    /// Statuses recorded for `rule`, oldest first.
    pub fn statuses(&self, rule: &dyn Rule) -> &[RuleExecutionStatus] {
        self.statuses
            .get(&rule.key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Statuses of the first recorded rule named `name`.
    pub fn statuses_by_name(&self, name: &str) -> &[RuleExecutionStatus] {
        self.statuses
            .iter()
            .find(|(key, _)| key.name == name)
            .map(|(_, statuses)| statuses.as_slice())
            .unwrap_or_default()
    }

    pub fn last_status(&self, rule: &dyn Rule) -> Option<RuleExecutionStatus> {
        self.statuses(rule).last().copied()
    }

    /// Total number of recorded statuses across all rules.
    pub fn len(&self) -> usize {
        self.statuses.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn rule_count(&self) -> usize {
        self.statuses.len()
    }

    /// Rules and their statuses, in the order rules were first recorded.
    pub fn iter(&self) -> impl Iterator<Item = (&RuleKey, &[RuleExecutionStatus])> + '_ {
        self.statuses
            .iter()
            .map(|(key, statuses)| (key, statuses.as_slice()))
    }
}

#[derive(serde::Serialize)]
struct HistoryEntry<'a> {
    rule: &'a RuleKey,
    statuses: &'a [RuleExecutionStatus],
}

impl Serialize for HistorySnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.statuses.len()))?;
        for (rule, statuses) in &self.statuses {
            seq.serialize_element(&HistoryEntry { rule, statuses })?;
        }
        seq.end()
    }
}
