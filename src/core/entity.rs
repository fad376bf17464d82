//! Capabilities an entity exposes to the transition engine.

use super::registry::TransitionRegistry;
use super::state::StateValue;
use std::error::Error as StdError;
use thiserror::Error;

/// Error reported by an entity when saving fails.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PersistenceError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying storage error.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Attribute access and persistence for a domain entity.
///
/// The engine never owns an entity; it borrows one for the duration of a
/// transition and talks to it only through this trait.
pub trait Entity {
    /// Type of the values held by the entity's state fields.
    type State: StateValue;

    /// Short type name, used in diagnostics and hook identifiers.
    fn entity_type(&self) -> &str;

    /// Read a state attribute. `None` means the attribute is not readable.
    fn get_attribute(&self, field: &str) -> Option<Self::State>;

    /// Write a state attribute. Only called for fields that passed
    /// [`Entity::has_attribute`].
    fn set_attribute(&mut self, field: &str, value: Self::State);

    /// Save the entity.
    fn persist(&mut self) -> Result<(), PersistenceError>;

    fn has_attribute(&self, field: &str) -> bool {
        self.get_attribute(field).is_some()
    }
}

/// An entity that declares its own allowed transitions.
///
/// `register_transitions` is the registration callback. It runs at most once
/// per engine, the first time a transition is requested or queried, and may
/// consult the entity to decide which edges to allow.
///
/// # Example
///
/// ```rust
/// use statefield::core::{Entity, PersistenceError, Transitionable, TransitionRegistry};
///
/// struct Ticket {
///     status: String,
/// }
///
/// impl Entity for Ticket {
///     type State = String;
///
///     fn entity_type(&self) -> &str {
///         "Ticket"
///     }
///
///     fn get_attribute(&self, field: &str) -> Option<String> {
///         (field == "status").then(|| self.status.clone())
///     }
///
///     fn set_attribute(&mut self, _field: &str, value: String) {
///         self.status = value;
///     }
///
///     fn persist(&mut self) -> Result<(), PersistenceError> {
///         Ok(())
///     }
/// }
///
/// impl Transitionable for Ticket {
///     fn register_transitions(&self, registry: &mut TransitionRegistry<Self>) {
///         registry.register("status", "open".to_string(), "closed".to_string());
///     }
/// }
/// ```
pub trait Transitionable: Entity + Sized {
    fn register_transitions(&self, registry: &mut TransitionRegistry<Self>);
}
