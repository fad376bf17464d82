//! Errors reported by the transition engine.

use crate::core::PersistenceError;
use crate::hooks::{HookBindingError, HookError, HookScope, HookStage};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a requested edge was refused.
///
/// Both reasons surface as the same [`TransitionError::TransitionDenied`]
/// kind; the reason is carried for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenialReason {
    /// No rule on the field has the requested `(from, to)` pair.
    NoMatchingRule,
    /// The first matching rule's guard returned `false`.
    GuardRejected,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NoMatchingRule => f.write_str("no matching rule"),
            DenialReason::GuardRejected => f.write_str("guard rejected"),
        }
    }
}

/// Errors that can occur during a transition.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Field '{field}' does not exist on {entity_type}")]
    UnknownField { entity_type: String, field: String },

    #[error("Transition of field '{field}' on {entity_type} from '{from}' to '{to}' is not allowed ({reason})")]
    TransitionDenied {
        entity_type: String,
        field: String,
        from: String,
        to: String,
        reason: DenialReason,
    },

    #[error(transparent)]
    InvalidHookBinding(#[from] HookBindingError),

    /// The new value was written to the entity but could not be saved.
    /// The attribute change and any `before` hook effects are not undone.
    #[error("Failed to persist field '{field}' on {entity_type} after setting it to '{to}'")]
    PersistenceFailure {
        entity_type: String,
        field: String,
        to: String,
        #[source]
        source: PersistenceError,
    },

    #[error("{scope} {stage} hook on field '{field}' failed: {source}")]
    Hook {
        field: String,
        scope: HookScope,
        stage: HookStage,
        #[source]
        source: HookError,
    },
}

impl TransitionError {
    /// Whether the transition had already been persisted and published when
    /// this error occurred. Only `after` hook failures qualify.
    pub fn is_committed(&self) -> bool {
        matches!(
            self,
            TransitionError::Hook {
                stage: HookStage::After,
                ..
            }
        )
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, TransitionError::TransitionDenied { .. })
    }
}
