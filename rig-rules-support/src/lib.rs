//! Composite rules: several rules fired as one.
//!
//! A [`RuleGroup`] is itself a [`Rule`](rig_rules::Rule), so it can be
//! registered with any engine. What evaluating and executing the group means
//! is decided by its [`GroupKind`]:
//!
//! - [`UnitRuleGroup`]: all members apply, then all fire; otherwise none do.
//! - [`ConditionalRuleGroup`]: the lowest-priority member gates the group,
//!   every other member decides for itself once the group fires.
//! - [`ActivationRuleGroup`]: the first applying member fires, the rest don't.

mod activation;
mod conditional;
mod group;
mod unit;

pub use activation::{Activation, ActivationRuleGroup};
pub use conditional::{Conditional, ConditionalRuleGroup};
pub use group::{CompositeRule, GroupKind, RuleGroup};
pub use unit::{Unit, UnitRuleGroup};
