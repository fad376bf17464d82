//! Builder for constructing hook resolvers.

use crate::builder::error::{BindingViolation, BuildError};
use crate::core::{rule_name, Entity};
use crate::hooks::{HookCatalog, HookResolver, HookScope, SharedHook, TransitionHook};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<BindingViolation>>;

/// Builder for a [`HookResolver`] with explicit hook tables.
///
/// Bindings are validated together in [`HookResolverBuilder::build`]; every
/// problem is reported at once rather than the first one.
pub struct HookResolverBuilder<E: Entity> {
    specific: Vec<(String, String, SharedHook<E>)>,
    common: Vec<(String, SharedHook<E>)>,
    catalog: Option<HookCatalog>,
}

impl<E: Entity + 'static> HookResolverBuilder<E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            specific: Vec::new(),
            common: Vec::new(),
            catalog: None,
        }
    }

    /// Bind a hook to the `from -> to` rule on `field`.
    pub fn specific<H>(
        self,
        field: impl Into<String>,
        from: &E::State,
        to: &E::State,
        hook: H,
    ) -> Self
    where
        H: TransitionHook<E> + 'static,
    {
        let name = rule_name(from, to);
        self.specific_named(field, name, hook)
    }

    /// Bind a hook to a rule by its derived name, e.g. `DraftToPublished`.
    pub fn specific_named<H>(
        mut self,
        field: impl Into<String>,
        rule_name: impl Into<String>,
        hook: H,
    ) -> Self
    where
        H: TransitionHook<E> + 'static,
    {
        let hook: SharedHook<E> = Arc::new(hook);
        self.specific.push((field.into(), rule_name.into(), hook));
        self
    }

    /// Bind a hook that wraps every transition on `field`.
    pub fn common<H>(mut self, field: impl Into<String>, hook: H) -> Self
    where
        H: TransitionHook<E> + 'static,
    {
        let hook: SharedHook<E> = Arc::new(hook);
        self.common.push((field.into(), hook));
        self
    }

    /// Fall back to a conventional-identifier catalog for unbound keys.
    pub fn catalog(mut self, catalog: HookCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Build the resolver.
    /// Returns every binding violation if any binding is invalid.
    pub fn build(self) -> Result<HookResolver<E>, BuildError> {
        let mut checks: Vec<Check> = Vec::new();

        let mut seen_common = HashSet::new();
        for (field, _) in &self.common {
            checks.push(check_field(field, HookScope::Common));
            checks.push(if seen_common.insert(field.as_str()) {
                Validation::success(())
            } else {
                Validation::fail(BindingViolation::DuplicateCommon {
                    field: field.clone(),
                })
            });
        }

        let mut seen_specific = HashSet::new();
        for (field, name, _) in &self.specific {
            checks.push(check_field(field, HookScope::Specific));
            checks.push(if name.is_empty() {
                Validation::fail(BindingViolation::EmptyRuleName {
                    field: field.clone(),
                })
            } else {
                Validation::success(())
            });
            checks.push(if seen_specific.insert((field.as_str(), name.as_str())) {
                Validation::success(())
            } else {
                Validation::fail(BindingViolation::DuplicateSpecific {
                    field: field.clone(),
                    rule_name: name.clone(),
                })
            });
        }

        if let Validation::Failure(violations) = Validation::all_vec(checks) {
            return Err(BuildError::InvalidBindings(
                violations.iter().cloned().collect(),
            ));
        }

        let specific: HashMap<_, _> = self
            .specific
            .into_iter()
            .map(|(field, name, hook)| ((field, name), hook))
            .collect();
        let common: HashMap<_, _> = self.common.into_iter().collect();

        Ok(HookResolver {
            specific,
            common,
            catalog: self.catalog,
        })
    }
}

impl<E: Entity + 'static> Default for HookResolverBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_field(field: &str, scope: HookScope) -> Check {
    if field.trim().is_empty() {
        Validation::fail(BindingViolation::EmptyField { scope })
    } else {
        Validation::success(())
    }
}
