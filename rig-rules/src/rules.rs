use crate::rule::{Rule, compare_rules};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A registry of rules, unique by rule equality and kept in natural order.
///
/// Registering a rule equal to one already present is a no-op: the first
/// instance stays. The registry never touches a rule's fired flag.
#[derive(Clone, Default)]
pub struct Rules {
    rules: Vec<Arc<dyn Rule>>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. Returns `false` if an equal rule was already registered.
    pub fn register(&mut self, rule: Arc<dyn Rule>) -> bool {
        match self.position(rule.as_ref()) {
            Ok(_) => false,
            Err(index) => {
                self.rules.insert(index, rule);
                true
            }
        }
    }

    pub fn register_all<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = Arc<dyn Rule>>,
    {
        for rule in rules {
            self.register(rule);
        }
    }

    /// Remove the rule equal to `rule`. Returns whether one was removed.
    pub fn unregister(&mut self, rule: &dyn Rule) -> bool {
        match self.position(rule) {
            Ok(index) => {
                self.rules.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Remove every rule named `name`.
    pub fn unregister_by_name(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.name() != name);
        self.rules.len() != before
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    pub fn contains(&self, rule: &dyn Rule) -> bool {
        self.position(rule).is_ok()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Rules in natural order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn Rule>> {
        self.rules.iter()
    }

    fn position(&self, rule: &dyn Rule) -> Result<usize, usize> {
        self.rules
            .binary_search_by(|probe| compare_rules(probe.as_ref(), rule))
    }
}

impl FromIterator<Arc<dyn Rule>> for Rules {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Rule>>>(iter: I) -> Self {
        let mut rules = Rules::new();
        rules.register_all(iter);
        rules
    }
}

impl Extend<Arc<dyn Rule>> for Rules {
    fn extend<I: IntoIterator<Item = Arc<dyn Rule>>>(&mut self, iter: I) {
        self.register_all(iter);
    }
}

impl<'a> IntoIterator for &'a Rules {
    type Item = &'a Arc<dyn Rule>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Rule>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl fmt::Debug for Rules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name()))
            .finish()
    }
}

impl PartialEq for Rules {
    fn eq(&self, other: &Self) -> bool {
        self.rules.len() == other.rules.len()
            && self
                .rules
                .iter()
                .zip(&other.rules)
                .all(|(a, b)| compare_rules(a.as_ref(), b.as_ref()) == Ordering::Equal)
    }
}
