//! Error types for state machine construction and dispatch.

use crate::core::Hook;
use thiserror::Error;

/// Error type returned by state hooks.
///
/// Any `std::error::Error + Send + Sync` converts into it with `?`. The
/// original value is kept as the `source` of [`FsmError::Callback`] and can be
/// recovered with `downcast_ref`.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T, E = FsmError> = std::result::Result<T, E>;

/// Errors that can occur while building or driving a state machine.
///
/// Every variant is recoverable: a failed operation never leaves an instance
/// in a state it did not fully commit to.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("State '{name}' is not registered")]
    StateNotFound { name: String },

    #[error("No transition from state '{state}' for event '{event}'")]
    TransitionNotFound { state: String, event: String },

    #[error("Follow-up events can only be requested from on-event hooks, not from {hook}")]
    InvalidCallSite { hook: Hook },

    #[error("{hook} hook of state '{state}' failed: {source}")]
    Callback {
        state: String,
        hook: Hook,
        #[source]
        source: CallbackError,
    },

    #[error("Invalid blueprint: {message}")]
    InvalidBlueprint { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FsmError {
    /// Name of the state the error refers to, if any.
    pub fn state_name(&self) -> Option<&str> {
        match self {
            Self::StateNotFound { name } => Some(name),
            Self::TransitionNotFound { state, .. } | Self::Callback { state, .. } => Some(state),
            _ => None,
        }
    }
}
