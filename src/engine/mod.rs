//! Transition execution.
//!
//! [`TransitionEngine`] wraps a borrowed entity together with its
//! [`crate::core::TransitionRegistry`] and drives the guard check, hook,
//! mutation, persistence and notification sequence.

pub mod config;
pub mod error;
pub mod executor;

pub use config::{ConfigError, EngineConfig, DEFAULT_STATE_FIELD};
pub use error::{DenialReason, TransitionError};
pub use executor::TransitionEngine;
