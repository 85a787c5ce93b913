//! Live machines: a definition plus a current state.

use super::definition::StateMachine;
use crate::core::{Context, Event, EventKey, Eventer, State, StateId};
use crate::error::Result;
use std::fmt;

/// A steppable machine: one definition, one current state.
///
/// Instances are cheap to create. Several may borrow the same definition at
/// once, each tracking its own position; they share the definition's
/// listeners.
///
/// # Example
///
/// ```rust
/// use statewise::{State, StateMachine};
///
/// let mut machine: StateMachine<&str> = StateMachine::new("turnstile");
/// let locked = machine.add_state(State::new("LOCKED"));
/// let open = machine.add_state(State::new("OPEN"));
/// machine.state_mut(locked).add_transition("coin", open);
/// machine.state_mut(open).add_transition("push", locked);
///
/// let mut gate = machine.instance_from_name("LOCKED").unwrap();
/// gate.fire("coin").unwrap();
/// assert_eq!(gate.current_state().name(), "OPEN");
///
/// // Other instances keep their own position.
/// let other = machine.instance(locked);
/// assert_eq!(other.current_state().name(), "LOCKED");
/// ```
pub struct StateMachineInstance<'m, K, D = ()> {
    machine: &'m StateMachine<K, D>,
    current: StateId,
}

impl<'m, K, D> StateMachineInstance<'m, K, D> {
    /// Position an instance at `id` without running any hook.
    pub fn from_state(machine: &'m StateMachine<K, D>, id: StateId) -> Self {
        Self {
            machine,
            current: id,
        }
    }

    /// Position an instance at the state named `name` without running any
    /// hook. Fails with `StateNotFound` for unknown names.
    pub fn from_state_name(machine: &'m StateMachine<K, D>, name: &str) -> Result<Self> {
        let id = machine.state_id(name)?;
        Ok(Self::from_state(machine, id))
    }

    pub fn machine(&self) -> &'m StateMachine<K, D> {
        self.machine
    }

    pub fn current_state(&self) -> &'m State<K, D> {
        self.machine.state(self.current)
    }

    pub fn current_state_id(&self) -> StateId {
        self.current
    }

    /// Move to `id` without running any hook or notifying listeners.
    pub fn set_current_state(&mut self, id: StateId) {
        self.current = id;
    }

    /// Register a listener on the shared definition.
    ///
    /// Sibling instances of the same definition observe it too.
    pub fn add_transition_listener<F>(&self, listener: F)
    where
        F: Fn(&Context<'_, K, D>) + Send + Sync + 'static,
    {
        self.machine.add_transition_listener(listener);
    }
}

impl<K: EventKey, D> StateMachineInstance<'_, K, D> {
    /// Fire an event without payload.
    pub fn fire(&mut self, key: K) -> Result<()> {
        self.fire_event(Event::new(key))
    }

    /// Fire an event carrying `data`.
    pub fn fire_with(&mut self, key: K, data: D) -> Result<()> {
        self.fire_event(Event::new(key).with_data(data))
    }

    /// Fire a command: its `kind()` is the key, the command the payload.
    pub fn fire_command(&mut self, command: D) -> Result<()>
    where
        D: Eventer<K>,
    {
        self.fire_event(Event::from_command(command))
    }

    /// Fire an event, then any follow-up events its on-event hooks request.
    ///
    /// On error the instance stays in the last state it committed to: the
    /// starting state if the first episode failed.
    pub fn fire_event(&mut self, event: Event<K, D>) -> Result<()> {
        self.machine.dispatch(&mut self.current, event)
    }
}

impl<K, D> Clone for StateMachineInstance<'_, K, D> {
    fn clone(&self) -> Self {
        Self {
            machine: self.machine,
            current: self.current,
        }
    }
}

impl<K, D> fmt::Debug for StateMachineInstance<'_, K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachineInstance")
            .field("machine", &self.machine.name())
            .field("current", &self.current_state().name())
            .finish()
    }
}
