//! Statewise: an embeddable finite state machine engine
//!
//! A host application declares named states, keyed transitions between them
//! and optional hooks run on entering, exiting, or receiving an event in a
//! state. Instances resolve events against the current state, run the hooks
//! in a fixed order and notify listeners after every committed transition.
//!
//! # Core Concepts
//!
//! - **State**: a named node with keyed transitions, an optional fallback and
//!   on-enter / on-event / on-exit hooks
//! - **StateMachine**: the shared definition; holds no current state
//! - **StateMachineInstance**: a definition plus a current state, driven by
//!   `fire`
//! - **Fallbacks**: catch-all routes, static or computed, at state then
//!   machine scope
//! - **Chaining**: an on-event hook may request a follow-up event, fired as
//!   soon as the current transition commits
//!
//! # Example
//!
//! ```rust
//! use statewise::{State, StateMachine};
//!
//! let mut machine: StateMachine<&str> = StateMachine::new("traffic");
//! let green = machine.add_state(State::new("GREEN"));
//! let yellow = machine.add_state(State::new("YELLOW"));
//! let bounce = machine.add_state(State::new("BOUNCE").on_event(|ctx| {
//!     ctx.fire("CONTINUE")?;
//!     Ok(())
//! }));
//! let red = machine.add_state(State::new("RED"));
//! let exit = machine.add_state(State::new("EXIT"));
//!
//! machine.state_mut(green).add_transition("TICK", yellow);
//! machine
//!     .state_mut(yellow)
//!     .add_transition("TICK", bounce)
//!     .set_fallback_transition(exit);
//! machine.state_mut(bounce).add_transition("CONTINUE", red);
//!
//! let mut light = machine.instance(green);
//! light.fire("TICK").unwrap();
//! light.fire("TICK").unwrap();
//! assert_eq!(light.current_state().name(), "RED");
//! ```

pub mod blueprint;
pub mod core;
pub mod error;
pub mod graph;
pub mod machine;
mod macros;

// Re-export commonly used types
pub use crate::core::{Context, Event, EventKey, Eventer, Hook, State, StateId, TransitionLog};
pub use error::{CallbackError, FsmError, Result};
pub use graph::Graph;
pub use machine::{StateMachine, StateMachineInstance};
