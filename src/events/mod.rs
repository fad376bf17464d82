//! Transition notifications.
//!
//! After a transition has been persisted the engine publishes exactly one
//! [`StateTransitioned`] event on [`STATE_TRANSITIONED`]. Notifiers are
//! synchronous and infallible from the engine's point of view; a notifier
//! that needs to do I/O should queue the event and return.

use crate::core::{Entity, StateValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Topic every transition notification is published on.
pub const STATE_TRANSITIONED: &str = "state.transitioned";

/// Owned description of a committed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: StateValue> {
    /// Event identifier, shared with the published notification
    pub id: Uuid,
    /// Type name of the transitioned entity
    pub entity_type: String,
    /// The state field that changed
    pub field: String,
    /// Value before the transition
    pub from: S,
    /// Value after the transition
    pub to: S,
    /// When the new value was persisted
    pub occurred_at: DateTime<Utc>,
}

/// Notification payload: the record plus a view of the entity itself.
pub struct StateTransitioned<'a, E: Entity> {
    pub entity: &'a E,
    pub record: &'a TransitionRecord<E::State>,
}

impl<E: Entity> StateTransitioned<'_, E> {
    pub fn field(&self) -> &str {
        &self.record.field
    }

    pub fn from(&self) -> &E::State {
        &self.record.from
    }

    pub fn to(&self) -> &E::State {
        &self.record.to
    }
}

/// Receiver of transition notifications.
pub trait EventNotifier<E: Entity>: Send + Sync {
    fn publish(&self, topic: &str, event: &StateTransitioned<'_, E>);
}

impl<E, F> EventNotifier<E> for F
where
    E: Entity,
    F: Fn(&str, &StateTransitioned<'_, E>) + Send + Sync,
{
    fn publish(&self, topic: &str, event: &StateTransitioned<'_, E>) {
        self(topic, event)
    }
}

/// Pin a closure's signature to the notifier shape.
///
/// Closures passed straight to a generic `EventNotifier` parameter cannot
/// always infer their higher-ranked argument lifetimes; routing them through
/// here fixes the signature.
pub fn from_fn<E, F>(f: F) -> F
where
    E: Entity,
    F: Fn(&str, &StateTransitioned<'_, E>) + Send + Sync,
{
    f
}

/// Notifier that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl<E: Entity> EventNotifier<E> for NoopNotifier {
    fn publish(&self, _topic: &str, _event: &StateTransitioned<'_, E>) {}
}

/// Notifier that keeps a copy of every published record.
#[derive(Debug)]
pub struct RecordingNotifier<S: StateValue> {
    records: Mutex<Vec<(String, TransitionRecord<S>)>>,
}

impl<S: StateValue> RecordingNotifier<S> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Records published so far, in order.
    pub fn records(&self) -> Vec<TransitionRecord<S>> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Topics published so far, in order.
    pub fn topics(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(topic, _)| topic.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: StateValue> Default for RecordingNotifier<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EventNotifier<E> for RecordingNotifier<E::State> {
    fn publish(&self, topic: &str, event: &StateTransitioned<'_, E>) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((topic.to_string(), event.record.clone()));
    }
}
