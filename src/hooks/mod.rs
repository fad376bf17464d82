//! Lifecycle hooks run around a transition.
//!
//! A hook has two stages, `before` and `after`. The engine runs them in
//! onion order around the mutation:
//!
//! ```text
//! common.before -> specific.before -> set + persist + publish -> specific.after -> common.after
//! ```
//!
//! A *common* hook is bound to a whole field and wraps every transition on
//! it; a *specific* hook is bound to one rule. Either may be absent.

mod resolver;

pub use resolver::{HookBindingError, HookCatalog, HookResolver, DEFAULT_HOOK_NAMESPACE};

use crate::core::Entity;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error raised by a hook. Never caught by the engine.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

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

/// Which half of a hook was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookStage {
    Before,
    After,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookStage::Before => f.write_str("before"),
            HookStage::After => f.write_str("after"),
        }
    }
}

/// Whether a hook wraps the whole field or a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookScope {
    Common,
    Specific,
}

impl fmt::Display for HookScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookScope::Common => f.write_str("common"),
            HookScope::Specific => f.write_str("specific"),
        }
    }
}

/// Handler invoked around a transition.
///
/// Both stages are required. `before` runs ahead of any mutation and can
/// abort the transition by returning an error; `after` runs once the new
/// value has been persisted and published, so an error from it cannot undo
/// the transition.
pub trait TransitionHook<E: Entity>: Send + Sync {
    fn before(&self, entity: &mut E, from: &E::State, to: &E::State) -> Result<(), HookError>;

    fn after(&self, entity: &mut E, from: &E::State, to: &E::State) -> Result<(), HookError>;
}

/// Shared handle to a hook.
pub type SharedHook<E> = Arc<dyn TransitionHook<E>>;

type HookFn<E> = Box<
    dyn Fn(&mut E, &<E as Entity>::State, &<E as Entity>::State) -> Result<(), HookError>
        + Send
        + Sync,
>;

/// Hook assembled from closures. A stage without a closure does nothing.
///
/// # Example
///
/// ```rust
/// use statefield::hooks::FnHook;
/// # use statefield::core::{Entity, PersistenceError};
/// # struct Invoice { status: String, sent: bool }
/// # impl Entity for Invoice {
/// #     type State = String;
/// #     fn entity_type(&self) -> &str { "Invoice" }
/// #     fn get_attribute(&self, _f: &str) -> Option<String> { Some(self.status.clone()) }
/// #     fn set_attribute(&mut self, _f: &str, v: String) { self.status = v; }
/// #     fn persist(&mut self) -> Result<(), PersistenceError> { Ok(()) }
/// # }
///
/// let mark_sent = FnHook::<Invoice>::new().on_after(|invoice, _from, _to| {
///     invoice.sent = true;
///     Ok(())
/// });
/// ```
pub struct FnHook<E: Entity> {
    before: Option<HookFn<E>>,
    after: Option<HookFn<E>>,
}

impl<E: Entity> FnHook<E> {
    pub fn new() -> Self {
        Self {
            before: None,
            after: None,
        }
    }

    pub fn on_before<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut E, &E::State, &E::State) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.before = Some(Box::new(f));
        self
    }

    pub fn on_after<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut E, &E::State, &E::State) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.after = Some(Box::new(f));
        self
    }
}

impl<E: Entity> Default for FnHook<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> TransitionHook<E> for FnHook<E> {
    fn before(&self, entity: &mut E, from: &E::State, to: &E::State) -> Result<(), HookError> {
        match &self.before {
            Some(f) => f(entity, from, to),
            None => Ok(()),
        }
    }

    fn after(&self, entity: &mut E, from: &E::State, to: &E::State) -> Result<(), HookError> {
        match &self.after {
            Some(f) => f(entity, from, to),
            None => Ok(()),
        }
    }
}
