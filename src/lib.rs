//! Statefield: guarded state transitions on entity fields
//!
//! Statefield lets a domain entity move a named field between states only
//! along edges it has registered. Each edge may carry a guard that reads the
//! entity, hooks can wrap the mutation, and a notification is published once
//! the new value has been persisted.
//!
//! # Core Concepts
//!
//! - **Entity**: attribute access and persistence via the `Entity` trait
//! - **Rules**: allowed `(from, to)` edges per field, first match wins
//! - **Guards**: predicates over the entity that can veto a matching edge
//! - **Hooks**: `before`/`after` handlers, a common one per field wrapping a
//!   specific one per edge
//! - **Engine**: `TransitionEngine` borrows the entity and runs the sequence
//!
//! # Example
//!
//! ```rust
//! use statefield::core::{Entity, PersistenceError, Transitionable, TransitionRegistry};
//! use statefield::engine::TransitionEngine;
//!
//! struct Article {
//!     status: String,
//!     reviewed: bool,
//! }
//!
//! impl Entity for Article {
//!     type State = String;
//!
//!     fn entity_type(&self) -> &str {
//!         "Article"
//!     }
//!
//!     fn get_attribute(&self, field: &str) -> Option<String> {
//!         (field == "status").then(|| self.status.clone())
//!     }
//!
//!     fn set_attribute(&mut self, _field: &str, value: String) {
//!         self.status = value;
//!     }
//!
//!     fn persist(&mut self) -> Result<(), PersistenceError> {
//!         Ok(())
//!     }
//! }
//!
//! impl Transitionable for Article {
//!     fn register_transitions(&self, registry: &mut TransitionRegistry<Self>) {
//!         registry.register_when("status", "draft".into(), "published".into(), |a: &Article| {
//!             a.reviewed
//!         });
//!     }
//! }
//!
//! let mut article = Article { status: "draft".into(), reviewed: false };
//! let mut engine = TransitionEngine::new(&mut article);
//!
//! assert!(!engine.can_transition("status", &"published".to_string()));
//!
//! engine.entity_mut().reviewed = true;
//! let record = engine.transition_to("status", "published".into()).unwrap();
//! assert_eq!(record.from, "draft");
//! assert_eq!(article.status, "published");
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod events;
pub mod hooks;
pub mod inspect;

// Re-export commonly used types
pub use crate::builder::{BuildError, HookResolverBuilder, RuleBuilder};
pub use crate::core::{
    Entity, Guard, PersistenceError, Rule, StateValue, Transitionable, TransitionRegistry,
};
pub use crate::engine::{EngineConfig, TransitionEngine, TransitionError};
pub use crate::events::{EventNotifier, StateTransitioned, TransitionRecord};
pub use crate::hooks::{FnHook, HookCatalog, HookError, HookResolver, TransitionHook};
pub use crate::inspect::{Inspection, RegistrySnapshot};
