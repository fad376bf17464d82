//! Builder for constructing rules.

use crate::builder::error::BuildError;
use crate::core::{Entity, Guard, Rule};

/// Builder for constructing rules with a fluent API.
///
/// Useful when rules are assembled from configuration rather than written
/// directly in a registration callback.
pub struct RuleBuilder<E: Entity> {
    field: Option<String>,
    from: Option<E::State>,
    to: Option<E::State>,
    guard: Option<Guard<E>>,
}

impl<E: Entity> RuleBuilder<E> {
    /// Create a new rule builder.
    pub fn new() -> Self {
        Self {
            field: None,
            from: None,
            to: None,
            guard: None,
        }
    }

    /// Set the state field (required).
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the source state (required).
    pub fn from(mut self, state: E::State) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: E::State) -> Self {
        self.to = Some(state);
        self
    }

    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard<E>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Build the rule.
    pub fn build(self) -> Result<Rule<E>, BuildError> {
        let field = self.field.ok_or(BuildError::MissingField)?;
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(match self.guard {
            Some(guard) => Rule::guarded(field, from, to, guard),
            None => Rule::new(field, from, to),
        })
    }
}

impl<E: Entity> Default for RuleBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PersistenceError;

    struct Order {
        status: u8,
        paid: bool,
    }

    impl Entity for Order {
        type State = u8;

        fn entity_type(&self) -> &str {
            "Order"
        }

        fn get_attribute(&self, field: &str) -> Option<u8> {
            (field == "status").then_some(self.status)
        }

        fn set_attribute(&mut self, _field: &str, value: u8) {
            self.status = value;
        }

        fn persist(&mut self) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    #[test]
    fn builder_requires_field() {
        let result = RuleBuilder::<Order>::new().from(0).to(1).build();
        assert!(matches!(result, Err(BuildError::MissingField)));
    }

    #[test]
    fn builder_validates_required_states() {
        let result = RuleBuilder::<Order>::new().field("status").from(0).build();
        assert!(matches!(result, Err(BuildError::MissingToState)));

        let result = RuleBuilder::<Order>::new().field("status").to(1).build();
        assert!(matches!(result, Err(BuildError::MissingFromState)));
    }

    #[test]
    fn fluent_api_builds_rule() {
        let rule = RuleBuilder::<Order>::new()
            .field("status")
            .from(0)
            .to(1)
            .build()
            .unwrap();

        assert_eq!(rule.field(), "status");
        assert_eq!(rule.from(), &0);
        assert_eq!(rule.to(), &1);
        assert_eq!(rule.name(), "0To1");
        assert!(rule.guard().is_none());
    }

    #[test]
    fn rule_builder_with_guard() {
        let rule = RuleBuilder::<Order>::new()
            .field("status")
            .from(1)
            .to(2)
            .when(|o: &Order| o.paid)
            .build()
            .unwrap();

        assert!(!rule.permits(&Order {
            status: 1,
            paid: false
        }));
        assert!(rule.permits(&Order {
            status: 1,
            paid: true
        }));
    }
}
