//! A single allowed edge on a state field.

use super::entity::Entity;
use super::guard::Guard;
use super::state::StateValue;
use std::fmt;

/// One allowed `(from, to)` edge for one field, with an optional guard.
///
/// The rule name is derived from the two states and is only used to find
/// hooks; two rules with the same name are still distinct entries.
pub struct Rule<E: Entity> {
    field: String,
    from: E::State,
    to: E::State,
    name: String,
    guard: Option<Guard<E>>,
}

impl<E: Entity> Rule<E> {
    pub fn new(field: impl Into<String>, from: E::State, to: E::State) -> Self {
        let name = rule_name(&from, &to);
        Self {
            field: field.into(),
            from,
            to,
            name,
            guard: None,
        }
    }

    pub fn guarded(field: impl Into<String>, from: E::State, to: E::State, guard: Guard<E>) -> Self {
        Self {
            guard: Some(guard),
            ..Self::new(field, from, to)
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn from(&self) -> &E::State {
        &self.from
    }

    pub fn to(&self) -> &E::State {
        &self.to
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn guard(&self) -> Option<&Guard<E>> {
        self.guard.as_ref()
    }

    /// Structural match: the requested edge equals this rule's edge.
    /// The guard is not consulted.
    pub fn matches(&self, from: &E::State, to: &E::State) -> bool {
        self.from == *from && self.to == *to
    }

    /// Evaluate the guard, treating an absent guard as permitting.
    pub fn permits(&self, entity: &E) -> bool {
        self.guard.as_ref().is_none_or(|g| g.evaluate(entity))
    }
}

impl<E: Entity> Clone for Rule<E> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            name: self.name.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<E: Entity> fmt::Debug for Rule<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("name", &self.name)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// Rule name for an edge: `draft -> published` becomes `DraftToPublished`.
pub fn rule_name<S: StateValue>(from: &S, to: &S) -> String {
    format!("{}To{}", studly(&from.name()), studly(&to.name()))
}

/// Upper-case the first letter of every word and drop the separators.
///
/// Words are split on `-`, `_` and whitespace; the rest of each word is kept
/// as written, so `in_review` becomes `InReview` and `HTTP-error` becomes
/// `HTTPError`.
pub fn studly(value: &str) -> String {
    value
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
