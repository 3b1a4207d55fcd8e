use crate::error::RuleError;
use fact_registry::Facts;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

pub const DEFAULT_NAME: &str = "rule";
pub const DEFAULT_DESCRIPTION: &str = "description";
/// Lowest usable precedence; leaves room for a threshold of `i32::MAX`.
pub const DEFAULT_PRIORITY: i32 = i32::MAX - 1;
pub const DEFAULT_LOOP: bool = false;

// ── Rule ─────────────────────────────────────────────────────────────────────

/// A named, prioritised condition with actions.
///
/// Anything implementing this trait can be registered in [`Rules`](crate::Rules)
/// and fired by an engine, whether hand-written, built with
/// [`RuleBuilder`](crate::RuleBuilder), adapted with
/// [`RuleProxy`](crate::RuleProxy) or composed from other rules.
///
/// # Ordering and identity
/// Rules are ordered by [`compare_rules`]: priority ascending (a lower value
/// wins), then non-loop before loop, then name, then description. Two rules are
/// equal when all four match. The four values must not change while the rule
/// is registered.
pub trait Rule: Send + Sync {
    /// Unique within one registry.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        DEFAULT_DESCRIPTION
    }

    /// Lower value means higher precedence.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Whether the inference engine may fire this rule again after it fired once.
    fn is_loop(&self) -> bool {
        DEFAULT_LOOP
    }

    /// Whether the rule's actions have run. Registries never reset this.
    fn has_fired(&self) -> bool {
        false
    }

    /// Test the condition. Must not mutate the facts.
    fn evaluate(&self, facts: &Facts) -> Result<bool, RuleError>;

    /// Run the actions. Effects already applied are not rolled back on error.
    fn execute(&self, facts: &mut Facts) -> Result<(), RuleError>;

    /// Owned identity of this rule.
    fn key(&self) -> RuleKey {
        RuleKey {
            priority: self.priority(),
            is_loop: self.is_loop(),
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name())
            .field("priority", &self.priority())
            .field("loop", &self.is_loop())
            .finish()
    }
}

/// Natural order of rules.
pub fn compare_rules(a: &dyn Rule, b: &dyn Rule) -> Ordering {
    a.priority()
        .cmp(&b.priority())
        .then_with(|| a.is_loop().cmp(&b.is_loop()))
        .then_with(|| a.name().cmp(b.name()))
        .then_with(|| a.description().cmp(b.description()))
}

// ── RuleKey ──────────────────────────────────────────────────────────────────

/// The identity of a rule, detached from the rule itself.
///
/// Field order makes the derived `Ord` the natural rule order; the derived
/// `Eq`/`Hash` are rule equality. History and check results are keyed by it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleKey {
    pub priority: i32,
    #[serde(rename = "loop")]
    pub is_loop: bool,
    pub name: String,
    pub description: String,
}

impl RuleKey {
    pub fn of(rule: &dyn Rule) -> Self {
        rule.key()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ── BasicRule ────────────────────────────────────────────────────────────────

/// Rule attributes plus a fired flag; never triggers on its own.
///
/// Used as the common part of concrete rules, and directly as a placeholder
/// rule in tests.
#[derive(Debug)]
pub struct BasicRule {
    name: String,
    description: String,
    priority: i32,
    is_loop: bool,
    fired: AtomicBool,
}

impl BasicRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            priority: DEFAULT_PRIORITY,
            is_loop: DEFAULT_LOOP,
            fired: AtomicBool::new(false),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_loop(mut self, is_loop: bool) -> Self {
        self.is_loop = is_loop;
        self
    }

    pub fn mark_fired(&self) {
        self.fired.store(true, AtomicOrdering::SeqCst);
    }

    /// Forget that the rule fired, so a new session can fire it again.
    pub fn reset(&self) {
        self.fired.store(false, AtomicOrdering::SeqCst);
    }
}

impl Default for BasicRule {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl Rule for BasicRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn is_loop(&self) -> bool {
        self.is_loop
    }

    fn has_fired(&self) -> bool {
        self.fired.load(AtomicOrdering::SeqCst)
    }

    fn evaluate(&self, _facts: &Facts) -> Result<bool, RuleError> {
        Ok(false)
    }

    fn execute(&self, _facts: &mut Facts) -> Result<(), RuleError> {
        Ok(())
    }
}
