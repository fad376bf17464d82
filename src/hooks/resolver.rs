//! Finding the hooks that apply to a transition.
//!
//! Hooks come from two places. Explicit tables, fixed when the resolver is
//! built, are consulted first. A [`HookCatalog`] keyed by conventional
//! identifiers is the fallback; its entries are type-erased, so a value bound
//! under a hook identifier that is not actually a hook is reported as an
//! invalid binding instead of being skipped.

use super::{SharedHook, TransitionHook};
use crate::core::{studly, Entity};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Namespace used by [`HookCatalog::new`].
pub const DEFAULT_HOOK_NAMESPACE: &str = "hooks";

/// A hook identifier resolved to something that is not a hook.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid hook binding '{identifier}': bound value does not implement TransitionHook for {entity_type}")]
pub struct HookBindingError {
    pub identifier: String,
    pub entity_type: String,
}

/// Type-erased hooks keyed by conventional identifiers.
///
/// Specific hooks live at `{namespace}::{Entity}::{Entity}{Field}{RuleName}`
/// and common hooks at `{namespace}::{Entity}::{Entity}{Field}Common`, with
/// the field name studly-cased.
///
/// # Example
///
/// ```rust
/// use statefield::hooks::HookCatalog;
///
/// let catalog = HookCatalog::with_namespace("app::hooks");
/// assert_eq!(
///     catalog.specific_identifier("Article", "status", "DraftToPublished"),
///     "app::hooks::Article::ArticleStatusDraftToPublished"
/// );
/// assert_eq!(
///     catalog.common_identifier("Article", "status"),
///     "app::hooks::Article::ArticleStatusCommon"
/// );
/// ```
pub struct HookCatalog {
    namespace: String,
    entries: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl HookCatalog {
    pub fn new() -> Self {
        Self::with_namespace(DEFAULT_HOOK_NAMESPACE)
    }

    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn specific_identifier(&self, entity_type: &str, field: &str, rule_name: &str) -> String {
        format!(
            "{}::{entity_type}::{entity_type}{}{rule_name}",
            self.namespace,
            studly(field)
        )
    }

    pub fn common_identifier(&self, entity_type: &str, field: &str) -> String {
        format!(
            "{}::{entity_type}::{entity_type}{}Common",
            self.namespace,
            studly(field)
        )
    }

    /// Bind a hook for `E` under `identifier`, replacing any previous entry.
    pub fn bind<E, H>(&mut self, identifier: impl Into<String>, hook: H) -> &mut Self
    where
        E: Entity + 'static,
        H: TransitionHook<E> + 'static,
    {
        let shared: SharedHook<E> = Arc::new(hook);
        self.bind_shared(identifier, shared)
    }

    /// Bind an already shared hook under `identifier`.
    pub fn bind_shared<E>(&mut self, identifier: impl Into<String>, hook: SharedHook<E>) -> &mut Self
    where
        E: Entity + 'static,
    {
        self.insert_value(identifier, hook)
    }

    /// Store an arbitrary value under `identifier`.
    ///
    /// For entries produced outside the hook API, e.g. a plugin table keyed
    /// by name. Only values stored through [`HookCatalog::bind`] or
    /// [`HookCatalog::bind_shared`] resolve as hooks; anything else under a
    /// hook identifier resolves to [`HookBindingError`].
    pub fn insert_value<T>(&mut self, identifier: impl Into<String>, value: T) -> &mut Self
    where
        T: Any + Send + Sync,
    {
        self.entries.insert(identifier.into(), Box::new(value));
        self
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `identifier` and check that it holds a hook for `E`.
    pub fn resolve<E: Entity + 'static>(
        &self,
        identifier: &str,
        entity_type: &str,
    ) -> Result<Option<SharedHook<E>>, HookBindingError> {
        let Some(value) = self.entries.get(identifier) else {
            return Ok(None);
        };

        (**value)
            .downcast_ref::<SharedHook<E>>()
            .map(|hook| Some(Arc::clone(hook)))
            .ok_or_else(|| HookBindingError {
                identifier: identifier.to_string(),
                entity_type: entity_type.to_string(),
            })
    }
}

impl Default for HookCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a transition to its common and specific hooks.
///
/// Built with [`crate::builder::HookResolverBuilder`]. Resolution is pure and
/// can be repeated.
pub struct HookResolver<E: Entity> {
    pub(crate) specific: HashMap<(String, String), SharedHook<E>>,
    pub(crate) common: HashMap<String, SharedHook<E>>,
    pub(crate) catalog: Option<HookCatalog>,
}

impl<E: Entity + 'static> HookResolver<E> {
    /// Resolver with no hooks at all.
    pub fn empty() -> Self {
        Self {
            specific: HashMap::new(),
            common: HashMap::new(),
            catalog: None,
        }
    }

    /// Hook bound to the rule `rule_name` on `field`, if any.
    pub fn resolve_specific(
        &self,
        entity_type: &str,
        field: &str,
        rule_name: &str,
    ) -> Result<Option<SharedHook<E>>, HookBindingError> {
        if let Some(hook) = self
            .specific
            .get(&(field.to_string(), rule_name.to_string()))
        {
            return Ok(Some(Arc::clone(hook)));
        }

        match &self.catalog {
            Some(catalog) => catalog.resolve(
                &catalog.specific_identifier(entity_type, field, rule_name),
                entity_type,
            ),
            None => Ok(None),
        }
    }

    /// Hook bound to every transition on `field`, if any.
    pub fn resolve_common(
        &self,
        entity_type: &str,
        field: &str,
    ) -> Result<Option<SharedHook<E>>, HookBindingError> {
        if let Some(hook) = self.common.get(field) {
            return Ok(Some(Arc::clone(hook)));
        }

        match &self.catalog {
            Some(catalog) => {
                catalog.resolve(&catalog.common_identifier(entity_type, field), entity_type)
            }
            None => Ok(None),
        }
    }

    pub fn catalog(&self) -> Option<&HookCatalog> {
        self.catalog.as_ref()
    }

    /// Number of explicitly bound hooks (catalog entries excluded).
    pub fn len(&self) -> usize {
        self.specific.len() + self.common.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity + 'static> Default for HookResolver<E> {
    fn default() -> Self {
        Self::empty()
    }
}
