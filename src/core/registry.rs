//! Per-entity collection of allowed transitions.

use super::entity::{Entity, Transitionable};
use super::guard::Guard;
use super::rule::Rule;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Outcome of looking up a requested edge.
pub enum Lookup<'r, E: Entity> {
    /// The first structurally matching rule, whose guard (if any) passed.
    Allowed(&'r Rule<E>),
    /// No rule on the field has this `(from, to)` pair.
    NoRule,
    /// The first structurally matching rule's guard returned `false`.
    GuardRejected(&'r Rule<E>),
}

impl<E: Entity> Lookup<'_, E> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Lookup::Allowed(_))
    }
}

impl<E: Entity> fmt::Debug for Lookup<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Allowed(rule) => f.debug_tuple("Allowed").field(rule).finish(),
            Lookup::NoRule => f.write_str("NoRule"),
            Lookup::GuardRejected(rule) => f.debug_tuple("GuardRejected").field(rule).finish(),
        }
    }
}

/// Ordered rules per field, built once by the entity's registration callback.
///
/// Insertion order matters: [`TransitionRegistry::lookup`] returns the first
/// rule whose edge matches and never looks further, so a later rule with the
/// same `(from, to)` is unreachable.
pub struct TransitionRegistry<E: Entity> {
    rules: BTreeMap<String, Vec<Rule<E>>>,
    initialized: bool,
}

impl<E: Entity> TransitionRegistry<E> {
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
            initialized: false,
        }
    }

    /// Allow `from -> to` on `field` without a guard.
    pub fn register(&mut self, field: impl Into<String>, from: E::State, to: E::State) -> &mut Self {
        self.add_rule(Rule::new(field, from, to))
    }

    /// Allow `from -> to` on `field` while `guard` holds.
    pub fn register_guarded(
        &mut self,
        field: impl Into<String>,
        from: E::State,
        to: E::State,
        guard: Guard<E>,
    ) -> &mut Self {
        self.add_rule(Rule::guarded(field, from, to, guard))
    }

    /// Allow `from -> to` on `field` while `predicate` holds.
    pub fn register_when<F>(
        &mut self,
        field: impl Into<String>,
        from: E::State,
        to: E::State,
        predicate: F,
    ) -> &mut Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.register_guarded(field, from, to, Guard::new(predicate))
    }

    /// Append a pre-built rule to its field's sequence. No deduplication.
    pub fn add_rule(&mut self, rule: Rule<E>) -> &mut Self {
        self.rules
            .entry(rule.field().to_string())
            .or_default()
            .push(rule);
        self
    }

    /// Find the rule for `from -> to` on `field`.
    ///
    /// Scans in insertion order and stops at the first structural match. If
    /// that rule's guard rejects the entity the lookup is denied outright,
    /// even when a later rule has the same edge.
    pub fn lookup<'r>(
        &'r self,
        field: &str,
        from: &E::State,
        to: &E::State,
        entity: &E,
    ) -> Lookup<'r, E> {
        let Some(rule) = self
            .rules(field)
            .iter()
            .find(|rule| rule.matches(from, to))
        else {
            return Lookup::NoRule;
        };

        if rule.permits(entity) {
            Lookup::Allowed(rule)
        } else {
            Lookup::GuardRejected(rule)
        }
    }

    /// Rules registered for `field`, in insertion order.
    pub fn rules(&self, field: &str) -> &[Rule<E>] {
        self.rules.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Fields that have at least one rule, in name order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Targets that have an edge out of `current` on `field`, ignoring guards.
    pub fn targets_from<'r>(
        &'r self,
        field: &str,
        current: &'r E::State,
    ) -> impl Iterator<Item = &'r E::State> + 'r {
        self.rules(field)
            .iter()
            .filter(move |rule| rule.from() == current)
            .map(Rule::to)
    }
}

impl<E: Transitionable> TransitionRegistry<E> {
    /// Run the entity's registration callback if it has not run yet.
    ///
    /// After the first call the rule set is frozen: later calls return
    /// immediately even if the callback would now register something else.
    pub fn ensure_initialized(&mut self, entity: &E) {
        if self.initialized {
            return;
        }

        entity.register_transitions(self);
        self.initialized = true;

        debug!(
            entity = entity.entity_type(),
            rules = self.len(),
            "transition registry initialized"
        );
    }
}

impl<E: Entity> Default for TransitionRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}
