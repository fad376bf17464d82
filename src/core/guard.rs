//! Guard predicates for controlling transitions.
//!
//! A guard decides whether a structurally matching edge is permitted for the
//! entity as it is right now. Guards are `Arc`-shared; cloning a rule does
//! not clone its predicate.

use std::fmt;
use std::sync::Arc;

/// Predicate over an entity that gates a single rule.
///
/// # Example
///
/// ```rust
/// use statefield::core::Guard;
///
/// struct Article {
///     word_count: usize,
/// }
///
/// let long_enough = Guard::new(|a: &Article| a.word_count >= 100);
///
/// assert!(long_enough.evaluate(&Article { word_count: 250 }));
/// assert!(!long_enough.evaluate(&Article { word_count: 12 }));
/// ```
pub struct Guard<E> {
    predicate: Arc<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E> Guard<E> {
    /// Create a guard from a predicate function.
    ///
    /// The predicate should not mutate anything observable; it may be
    /// evaluated by both `can_transition` and `transition_to`.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Guard that always permits the transition.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Guard that never permits the transition.
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    /// Evaluate the guard against the entity.
    pub fn evaluate(&self, entity: &E) -> bool {
        (self.predicate)(entity)
    }
}

impl<E> Clone for Guard<E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<E> fmt::Debug for Guard<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
