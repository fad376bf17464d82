//! Read-only views of registered transitions.
//!
//! External tooling (a debug command, an admin page) needs to show which
//! edges exist and which targets are reachable from an entity's current
//! value without running a transition. Snapshots are plain data and can be
//! shipped as JSON or bincode.

use crate::core::{Entity, StateValue, TransitionRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// One registered edge, without its guard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Edge<S: StateValue> {
    pub from: S,
    pub to: S,
    /// Derived rule name, e.g. `DraftToPublished`
    pub name: String,
    /// Whether the rule carries a guard
    pub guarded: bool,
}

/// Every registered edge, grouped by field in registration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RegistrySnapshot<S: StateValue> {
    /// Snapshot format version
    pub version: u32,

    /// Field name -> edges in registration order
    pub fields: BTreeMap<String, Vec<Edge<S>>>,
}

impl<S: StateValue> RegistrySnapshot<S> {
    pub fn from_registry<E>(registry: &TransitionRegistry<E>) -> Self
    where
        E: Entity<State = S>,
    {
        let fields = registry
            .fields()
            .map(|field| {
                let edges = registry
                    .rules(field)
                    .iter()
                    .map(|rule| Edge {
                        from: rule.from().clone(),
                        to: rule.to().clone(),
                        name: rule.name().to_string(),
                        guarded: rule.guard().is_some(),
                    })
                    .collect();
                (field.to_string(), edges)
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            fields,
        }
    }

    /// Edges registered for `field`, in registration order.
    pub fn edges(&self, field: &str) -> &[Edge<S>] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Targets with an edge out of `current` on `field`. Guards are not
    /// evaluated, so a listed target may still be denied.
    pub fn reachable_from(&self, field: &str, current: &S) -> Vec<S> {
        self.edges(field)
            .iter()
            .filter(|edge| edge.from == *current)
            .map(|edge| edge.to.clone())
            .collect()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(self)
    }
}

/// Current value of one field plus the edges around it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Inspection<S: StateValue> {
    pub entity_type: String,
    pub field: String,
    pub current: S,
    /// All edges registered for the field
    pub edges: Vec<Edge<S>>,
    /// Targets with an edge out of `current`, guards not evaluated
    pub reachable: Vec<S>,
}

impl<S: StateValue> Inspection<S> {
    pub fn new(
        entity_type: impl Into<String>,
        field: impl Into<String>,
        current: S,
        snapshot: &RegistrySnapshot<S>,
    ) -> Self {
        let field = field.into();
        let edges = snapshot.edges(&field).to_vec();
        let reachable = snapshot.reachable_from(&field, &current);
        Self {
            entity_type: entity_type.into(),
            field,
            current,
            edges,
            reachable,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }
}

impl<S: StateValue> fmt::Display for Inspection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.current.name();
        writeln!(f, "Entity: {}", self.entity_type)?;
        writeln!(f, "Current state [{}]: {}", self.field, current)?;

        if self.reachable.is_empty() {
            writeln!(f, "Possible transitions from [{current}]: none")?;
        } else {
            let targets: Vec<_> = self.reachable.iter().map(|s| s.name()).collect();
            writeln!(
                f,
                "Possible transitions from [{current}]: {}",
                targets.join(", ")
            )?;
        }

        write!(f, "Available transitions:")?;
        for edge in &self.edges {
            write!(f, "\n - {} \u{2192} {}", edge.from.name(), edge.to.name())?;
            if edge.guarded {
                write!(f, " (guarded)")?;
            }
        }
        Ok(())
    }
}
