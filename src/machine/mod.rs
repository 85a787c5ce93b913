//! Machine definitions, live instances and the dispatch engine.
//!
//! # Key Concepts
//!
//! - **Definition**: [`StateMachine`] registers states, transitions,
//!   fallbacks and listeners. It never changes while instances borrow it.
//! - **Instance**: [`StateMachineInstance`] pairs a definition with a current
//!   state and drives it with `fire*` calls.
//! - **Dispatch**: each fire resolves a target, runs exit, enter and event
//!   hooks in that order, commits, notifies listeners, then follows any
//!   chained event.

mod definition;
mod dispatch;
mod instance;
mod listener;

pub use definition::StateMachine;
pub use instance::StateMachineInstance;
pub use listener::TransitionListener;
