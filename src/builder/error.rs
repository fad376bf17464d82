//! Build errors for rule and hook resolver builders.

use crate::hooks::HookScope;
use thiserror::Error;

/// Errors that can occur when building rules and hook resolvers.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Rule field not specified. Call .field(name) before .build()")]
    MissingField,

    #[error("Rule source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Rule target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Hook bindings rejected: {} problem(s), first: {}", .0.len(), first_violation(.0))]
    InvalidBindings(Vec<BindingViolation>),
}

/// A single problem found while validating hook bindings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindingViolation {
    #[error("{scope} hook bound to an empty field name")]
    EmptyField { scope: HookScope },

    #[error("specific hook on field '{field}' has an empty rule name")]
    EmptyRuleName { field: String },

    #[error("field '{field}' already has a common hook")]
    DuplicateCommon { field: String },

    #[error("rule '{rule_name}' on field '{field}' already has a specific hook")]
    DuplicateSpecific { field: String, rule_name: String },
}

fn first_violation(violations: &[BindingViolation]) -> String {
    violations
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}
