use serde::{Deserialize, Serialize};
use std::fmt;

pub const SKIP_ON_FIRST_APPLIED_RULE_ENV: &str = "RULES_SKIP_ON_FIRST_APPLIED_RULE";
pub const SKIP_ON_FIRST_FAILED_RULE_ENV: &str = "RULES_SKIP_ON_FIRST_FAILED_RULE";
pub const SKIP_ON_FIRST_NON_TRIGGERED_RULE_ENV: &str = "RULES_SKIP_ON_FIRST_NON_TRIGGERED_RULE";
pub const PRIORITY_THRESHOLD_ENV: &str = "RULES_PRIORITY_THRESHOLD";

/// Conflict-resolution settings of an engine.
///
/// A plain `Copy` value: engines hand out copies, never the live settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesEngineParameters {
    skip_on_first_applied_rule: bool,
    skip_on_first_failed_rule: bool,
    skip_on_first_non_triggered_rule: bool,
    priority_threshold: i32,
}

impl Default for RulesEngineParameters {
    fn default() -> Self {
        Self {
            skip_on_first_applied_rule: false,
            skip_on_first_failed_rule: false,
            skip_on_first_non_triggered_rule: false,
            priority_threshold: i32::MAX,
        }
    }
}

impl RulesEngineParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the pass after the first rule that executed successfully.
    pub fn with_skip_on_first_applied_rule(mut self, skip: bool) -> Self {
        self.skip_on_first_applied_rule = skip;
        self
    }

    /// Stop the pass after the first rule whose action failed.
    pub fn with_skip_on_first_failed_rule(mut self, skip: bool) -> Self {
        self.skip_on_first_failed_rule = skip;
        self
    }

    /// Stop the pass after the first rule that did not trigger.
    pub fn with_skip_on_first_non_triggered_rule(mut self, skip: bool) -> Self {
        self.skip_on_first_non_triggered_rule = skip;
        self
    }

    /// Rules with a priority value above `threshold` are never fired.
    pub fn with_priority_threshold(mut self, threshold: i32) -> Self {
        self.priority_threshold = threshold;
        self
    }

    pub fn skip_on_first_applied_rule(&self) -> bool {
        self.skip_on_first_applied_rule
    }

    pub fn skip_on_first_failed_rule(&self) -> bool {
        self.skip_on_first_failed_rule
    }

    pub fn skip_on_first_non_triggered_rule(&self) -> bool {
        self.skip_on_first_non_triggered_rule
    }

    pub fn priority_threshold(&self) -> i32 {
        self.priority_threshold
    }

    /// Read the parameters from `RULES_*` environment variables.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|v| v.trim().parse::<bool>().ok())
                .unwrap_or(default)
        };

        Self {
            skip_on_first_applied_rule: flag(
                SKIP_ON_FIRST_APPLIED_RULE_ENV,
                defaults.skip_on_first_applied_rule,
            ),
            skip_on_first_failed_rule: flag(
                SKIP_ON_FIRST_FAILED_RULE_ENV,
                defaults.skip_on_first_failed_rule,
            ),
            skip_on_first_non_triggered_rule: flag(
                SKIP_ON_FIRST_NON_TRIGGERED_RULE_ENV,
                defaults.skip_on_first_non_triggered_rule,
            ),
            priority_threshold: lookup(PRIORITY_THRESHOLD_ENV)
                .and_then(|v| v.trim().parse::<i32>().ok())
                .unwrap_or(defaults.priority_threshold),
        }
    }
}

impl fmt::Display for RulesEngineParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "engine parameters {{ skip_on_first_applied_rule = {}, skip_on_first_non_triggered_rule = {}, skip_on_first_failed_rule = {}, priority_threshold = {} }}",
            self.skip_on_first_applied_rule,
            self.skip_on_first_non_triggered_rule,
            self.skip_on_first_failed_rule,
            self.priority_threshold
        )
    }
}
