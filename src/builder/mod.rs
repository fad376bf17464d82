//! Builder API for rules and hook resolvers.
//!
//! This module provides fluent builders and the `state_enum!` macro for
//! declaring transitions with minimal boilerplate while keeping them typed.

pub mod error;
pub mod hooks;
pub mod macros;
pub mod rule;

pub use error::{BindingViolation, BuildError};
pub use hooks::HookResolverBuilder;
pub use rule::RuleBuilder;
