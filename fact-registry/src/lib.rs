//! Named, typed facts: the shared working memory rules read and write.
//!
//! [`Facts`] keeps one [`Fact`] per name in insertion order. Values are of any
//! `'static` type that is `Debug + Send + Sync`; readers downcast with
//! [`Facts::get`]. Replacing an existing fact keeps its position.

use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use thiserror::Error;

/// Errors raised while building facts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactsError {
    /// Fact names must contain at least one non-whitespace character.
    #[error("fact name must not be empty")]
    EmptyName,
}

/// A value that can be stored in [`Facts`].
///
/// Implemented for every `Any + Debug + Send + Sync` type; there is no need to
/// implement it by hand.
pub trait FactValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> FactValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A named value. Two facts are the same fact when their names match.
#[derive(Debug)]
pub struct Fact {
    name: String,
    value: Box<dyn FactValue>,
}

impl Fact {
    pub fn new<T: FactValue>(name: impl Into<String>, value: T) -> Result<Self, FactsError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            value: Box::new(value),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the value as `T`, or `None` if it holds another type.
    pub fn value<T: Any>(&self) -> Option<&T> {
        let value: &dyn FactValue = &*self.value;
        value.as_any().downcast_ref::<T>()
    }

    pub fn value_mut<T: Any>(&mut self) -> Option<&mut T> {
        let value: &mut dyn FactValue = &mut *self.value;
        value.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value::<T>().is_some()
    }

    /// The value without a type, for diagnostics.
    pub fn raw(&self) -> &dyn FactValue {
        &*self.value
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Fact {}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fact{{name='{}', value={:?}}}", self.name, self.raw())
    }
}

fn validate_name(name: &str) -> Result<(), FactsError> {
    if name.trim().is_empty() {
        return Err(FactsError::EmptyName);
    }
    Ok(())
}

/// Insertion-ordered set of facts, unique by name.
#[derive(Debug, Default)]
pub struct Facts {
    facts: IndexMap<String, Fact>,
}

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fact, or replace the value of the fact with the same name.
    ///
    /// A replaced fact keeps its original position.
    pub fn put<T: FactValue>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> Result<(), FactsError> {
        self.add(Fact::new(name, value)?);
        Ok(())
    }

    /// Add an already-built fact, replacing any fact with the same name.
    pub fn add(&mut self, fact: Fact) -> Option<Fact> {
        self.facts.insert(fact.name.clone(), fact)
    }

    /// The value of `name` as `T`.
    ///
    /// `None` when the fact is absent or holds another type; use
    /// [`Facts::contains`] or [`Facts::get_fact`] to tell the two apart.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.facts.get(name).and_then(Fact::value::<T>)
    }

    pub fn get_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.facts.get_mut(name).and_then(Fact::value_mut::<T>)
    }

    pub fn get_fact(&self, name: &str) -> Option<&Fact> {
        self.facts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    /// Remove a fact by name. Remaining facts keep their relative order.
    pub fn remove(&mut self, name: &str) -> Option<Fact> {
        self.facts.shift_remove(name)
    }

    /// Read-only view of the facts keyed by name.
    pub fn as_map(&self) -> &IndexMap<String, Fact> {
        &self.facts
    }

    /// Facts in insertion order. Each call starts a fresh iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Fact> + '_ {
        self.facts.values()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn clear(&mut self) {
        self.facts.clear();
    }
}

impl<'a> IntoIterator for &'a Facts {
    type Item = &'a Fact;
    type IntoIter = indexmap::map::Values<'a, String, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.values()
    }
}

impl fmt::Display for Facts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, fact) in self.facts.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{fact}")?;
        }
        f.write_str("]")
    }
}
