//! Transition engine that runs guarded, hooked transitions on an entity.

use crate::core::{Entity, Lookup, StateValue, Transitionable, TransitionRegistry};
use crate::engine::config::EngineConfig;
use crate::engine::error::{DenialReason, TransitionError};
use crate::events::{
    EventNotifier, NoopNotifier, StateTransitioned, TransitionRecord, STATE_TRANSITIONED,
};
use crate::hooks::{HookResolver, HookScope, HookStage, SharedHook};
use crate::inspect::{Inspection, RegistrySnapshot};
use chrono::Utc;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Registry used by an engine: its own, or one kept beside the entity.
enum RegistrySlot<'a, E: Entity> {
    Owned(TransitionRegistry<E>),
    Borrowed(&'a mut TransitionRegistry<E>),
}

impl<E: Entity> Deref for RegistrySlot<'_, E> {
    type Target = TransitionRegistry<E>;

    fn deref(&self) -> &Self::Target {
        match self {
            RegistrySlot::Owned(registry) => registry,
            RegistrySlot::Borrowed(registry) => &**registry,
        }
    }
}

impl<E: Entity> DerefMut for RegistrySlot<'_, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            RegistrySlot::Owned(registry) => registry,
            RegistrySlot::Borrowed(registry) => &mut **registry,
        }
    }
}

/// Runs transitions for one borrowed entity.
///
/// The [`TransitionRegistry`] is filled by the entity's registration
/// callback the first time it is needed and is frozen from then on. An
/// engine built with [`TransitionEngine::new`] keeps the registry to itself,
/// so the rule set lives as long as that engine. To keep one rule set for an
/// entity instance across many engines, store a registry next to the entity
/// and use [`TransitionEngine::with_registry`].
///
/// Hooks and the notifier are shared and may serve many engines. One engine
/// must not be driven from two threads at once; distinct entities need no
/// coordination.
pub struct TransitionEngine<'a, E: Transitionable + 'static> {
    entity: &'a mut E,
    registry: RegistrySlot<'a, E>,
    hooks: Arc<HookResolver<E>>,
    notifier: Arc<dyn EventNotifier<E>>,
    config: EngineConfig,
}

impl<'a, E: Transitionable + 'static> TransitionEngine<'a, E> {
    /// Create an engine with its own registry, no hooks, a no-op notifier
    /// and default config.
    pub fn new(entity: &'a mut E) -> Self {
        Self::with_slot(entity, RegistrySlot::Owned(TransitionRegistry::new()))
    }

    /// Create an engine over a registry that outlives it.
    ///
    /// The registry belongs to this entity instance: it is initialized by the
    /// first engine that needs it, and later engines reuse the frozen rules
    /// without running the callback again.
    pub fn with_registry(entity: &'a mut E, registry: &'a mut TransitionRegistry<E>) -> Self {
        Self::with_slot(entity, RegistrySlot::Borrowed(registry))
    }

    fn with_slot(entity: &'a mut E, registry: RegistrySlot<'a, E>) -> Self {
        Self {
            entity,
            registry,
            hooks: Arc::new(HookResolver::empty()),
            notifier: Arc::new(NoopNotifier),
            config: EngineConfig::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<HookResolver<E>>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_notifier<N>(self, notifier: N) -> Self
    where
        N: EventNotifier<E> + 'static,
    {
        self.with_shared_notifier(Arc::new(notifier))
    }

    pub fn with_shared_notifier(mut self, notifier: Arc<dyn EventNotifier<E>>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replace the config. With `publish_events: false` the engine never
    /// notifies, whatever notifier is attached.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn entity(&self) -> &E {
        &*self.entity
    }

    pub fn entity_mut(&mut self) -> &mut E {
        &mut *self.entity
    }

    pub fn registry(&self) -> &TransitionRegistry<E> {
        &*self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Move `field` from its current value to `target`.
    ///
    /// Runs, in order: the guard check, `before` hooks (common then
    /// specific), the attribute write, `persist`, the notification, and
    /// `after` hooks (specific then common). An error before the write leaves
    /// the entity untouched. A persistence error leaves the written value in
    /// place and skips `after` hooks. An `after` hook error is returned even
    /// though the transition is already committed; see
    /// [`TransitionError::is_committed`].
    ///
    /// The notification step is skipped when the config opts out through
    /// [`EngineConfig::publish_events`].
    pub fn transition_to(
        &mut self,
        field: &str,
        target: E::State,
    ) -> Result<TransitionRecord<E::State>, TransitionError> {
        let current = self.current_value(field)?;
        let rule_name = self.authorize(field, &current, &target)?;

        let entity_type = self.entity.entity_type().to_string();
        let common = self.hooks.resolve_common(&entity_type, field)?;
        let specific = self
            .hooks
            .resolve_specific(&entity_type, field, &rule_name)?;

        if let Some(hook) = &common {
            self.run_hook(
                hook,
                HookScope::Common,
                HookStage::Before,
                field,
                &current,
                &target,
            )?;
        }
        if let Some(hook) = &specific {
            self.run_hook(
                hook,
                HookScope::Specific,
                HookStage::Before,
                field,
                &current,
                &target,
            )?;
        }

        self.entity.set_attribute(field, target.clone());

        if let Err(source) = self.entity.persist() {
            warn!(
                entity = %entity_type,
                field,
                to = %target.name(),
                error = %source,
                "persisting transition failed; attribute change is not rolled back"
            );
            return Err(TransitionError::PersistenceFailure {
                entity_type,
                field: field.to_string(),
                to: target.name().into_owned(),
                source,
            });
        }

        let record = TransitionRecord {
            id: Uuid::new_v4(),
            entity_type,
            field: field.to_string(),
            from: current,
            to: target,
            occurred_at: Utc::now(),
        };

        if self.config.publish_events {
            self.notifier.publish(
                STATE_TRANSITIONED,
                &StateTransitioned {
                    entity: &*self.entity,
                    record: &record,
                },
            );
        }

        info!(
            entity = %record.entity_type,
            field,
            from = %record.from.name(),
            to = %record.to.name(),
            rule = %rule_name,
            event_id = %record.id,
            "state transitioned"
        );

        if let Some(hook) = &specific {
            self.run_hook(
                hook,
                HookScope::Specific,
                HookStage::After,
                field,
                &record.from,
                &record.to,
            )?;
        }
        if let Some(hook) = &common {
            self.run_hook(
                hook,
                HookScope::Common,
                HookStage::After,
                field,
                &record.from,
                &record.to,
            )?;
        }

        Ok(record)
    }

    /// Whether `transition_to(field, target)` would get past the guard check.
    ///
    /// Never runs hooks, writes, persists or publishes. Unknown fields and
    /// denied edges both answer `false`.
    pub fn can_transition(&mut self, field: &str, target: &E::State) -> bool {
        match self.current_value(field) {
            Ok(current) => self.authorize(field, &current, target).is_ok(),
            Err(_) => false,
        }
    }

    /// [`TransitionEngine::transition_to`] on the configured default field.
    pub fn transition(
        &mut self,
        target: E::State,
    ) -> Result<TransitionRecord<E::State>, TransitionError> {
        let field = self.config.default_field.clone();
        self.transition_to(&field, target)
    }

    /// [`TransitionEngine::can_transition`] on the configured default field.
    pub fn can_transition_default(&mut self, target: &E::State) -> bool {
        let field = self.config.default_field.clone();
        self.can_transition(&field, target)
    }

    /// Current value of `field` and the edges registered for it.
    pub fn inspect(&mut self, field: &str) -> Result<Inspection<E::State>, TransitionError> {
        let current = self.current_value(field)?;
        let snapshot = RegistrySnapshot::from_registry(&*self.registry);
        Ok(Inspection::new(
            self.entity.entity_type(),
            field,
            current,
            &snapshot,
        ))
    }

    /// Every registered edge, initializing the registry if needed.
    pub fn snapshot(&mut self) -> RegistrySnapshot<E::State> {
        self.registry.ensure_initialized(&*self.entity);
        RegistrySnapshot::from_registry(&*self.registry)
    }

    /// Check the field exists, make sure rules are registered, read the value.
    fn current_value(&mut self, field: &str) -> Result<E::State, TransitionError> {
        if !self.entity.has_attribute(field) {
            return Err(self.unknown_field(field));
        }

        self.registry.ensure_initialized(&*self.entity);

        self.entity
            .get_attribute(field)
            .ok_or_else(|| self.unknown_field(field))
    }

    /// Look up the edge and return the matched rule's name.
    fn authorize(
        &self,
        field: &str,
        current: &E::State,
        target: &E::State,
    ) -> Result<String, TransitionError> {
        let reason = match self.registry.lookup(field, current, target, &*self.entity) {
            Lookup::Allowed(rule) => return Ok(rule.name().to_string()),
            Lookup::NoRule => DenialReason::NoMatchingRule,
            Lookup::GuardRejected(_) => DenialReason::GuardRejected,
        };

        debug!(
            entity = self.entity.entity_type(),
            field,
            from = %current.name(),
            to = %target.name(),
            %reason,
            "transition denied"
        );

        Err(TransitionError::TransitionDenied {
            entity_type: self.entity.entity_type().to_string(),
            field: field.to_string(),
            from: current.name().into_owned(),
            to: target.name().into_owned(),
            reason,
        })
    }

    fn run_hook(
        &mut self,
        hook: &SharedHook<E>,
        scope: HookScope,
        stage: HookStage,
        field: &str,
        from: &E::State,
        to: &E::State,
    ) -> Result<(), TransitionError> {
        let result = match stage {
            HookStage::Before => hook.before(&mut *self.entity, from, to),
            HookStage::After => hook.after(&mut *self.entity, from, to),
        };

        result.map_err(|source| {
            warn!(field, %scope, %stage, error = %source, "transition hook failed");
            TransitionError::Hook {
                field: field.to_string(),
                scope,
                stage,
                source,
            }
        })
    }

    fn unknown_field(&self, field: &str) -> TransitionError {
        TransitionError::UnknownField {
            entity_type: self.entity.entity_type().to_string(),
            field: field.to_string(),
        }
    }
}
