//! Core transition types.
//!
//! This module contains the data side of the engine:
//! - State values via the `StateValue` trait
//! - Entities via the `Entity` and `Transitionable` traits
//! - Guards, rules and the per-entity `TransitionRegistry`
//!
//! Nothing in here runs hooks, persists, or publishes; that is the engine's
//! job.

mod entity;
mod guard;
mod registry;
mod rule;
mod state;

pub use entity::{Entity, PersistenceError, Transitionable};
pub use guard::Guard;
pub use registry::{Lookup, TransitionRegistry};
pub use rule::{rule_name, studly, Rule};
pub use state::StateValue;
