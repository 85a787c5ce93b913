//! Core state machine types.
//!
//! This module contains the data model the dispatch engine works on:
//! - Events and event keys
//! - States, their hooks and their fallbacks
//! - The firing context handed to hooks, resolvers and listeners
//! - A ready-made transition history listener

mod context;
mod event;
mod fallback;
mod history;
mod state;

pub use context::Context;
pub use event::{Event, EventKey, Eventer, UnknownEventKey};
pub use fallback::{Fallback, FallbackResolver};
pub use history::{TransitionLog, TransitionRecord};
pub use state::{Callback, Hook, State, StateId};
