//! The machine definition: a registry of named states.

use super::instance::StateMachineInstance;
use super::listener::{Listeners, TransitionListener};
use crate::core::{Context, Fallback, FallbackResolver, State, StateId};
use crate::error::{FsmError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A finite state machine definition.
///
/// The definition is a template: it holds states, transitions, fallbacks and
/// listeners, but no current state. Live machines are
/// [`StateMachineInstance`]s borrowing a definition; any number of them can
/// share one, from several threads, once construction is finished.
///
/// Transition listeners belong to the definition. A listener registered
/// through any instance observes the transitions of every instance built from
/// the same definition.
///
/// # Example
///
/// ```rust
/// use statewise::{State, StateMachine};
///
/// let mut machine: StateMachine<&str> = StateMachine::new("traffic");
/// let green = machine.add_state(State::new("GREEN"));
/// let yellow = machine.add_state(State::new("YELLOW"));
/// let red = machine.add_state(State::new("RED"));
///
/// machine.state_mut(green).add_transition("TICK", yellow);
/// machine.state_mut(yellow).add_transition("TICK", red);
/// machine.state_mut(red).add_transition("TICK", green);
///
/// let mut light = machine.instance(green);
/// light.fire("TICK").unwrap();
/// assert_eq!(light.current_state().name(), "YELLOW");
/// ```
pub struct StateMachine<K, D = ()> {
    name: String,
    states: Vec<State<K, D>>,
    by_name: HashMap<String, StateId>,
    fallback: Fallback<K, D>,
    listeners: Listeners<K, D>,
}

impl<K, D> StateMachine<K, D> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            by_name: HashMap::new(),
            fallback: Fallback::Unset,
            listeners: Listeners::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a state and return its handle.
    ///
    /// Registering a name that already exists replaces that state's
    /// definition in place: the handle is kept, so transitions targeting the
    /// old definition now reach the new one.
    pub fn add_state(&mut self, state: State<K, D>) -> StateId {
        if let Some(&id) = self.by_name.get(state.name()) {
            tracing::debug!(machine = %self.name, state = %state.name(), "Redefining state");
            self.states[id.0] = state;
            return id;
        }

        let id = StateId(self.states.len());
        self.by_name.insert(state.name().to_string(), id);
        self.states.push(state);
        id
    }

    /// State behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another machine.
    pub fn state(&self, id: StateId) -> &State<K, D> {
        &self.states[id.0]
    }

    /// Mutable access to a state, to wire its transitions and fallback.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another machine.
    pub fn state_mut(&mut self, id: StateId) -> &mut State<K, D> {
        &mut self.states[id.0]
    }

    /// Handle of the state registered under `name`.
    pub fn state_id(&self, name: &str) -> Result<StateId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| FsmError::StateNotFound {
                name: name.to_string(),
            })
    }

    pub fn state_by_name(&self, name: &str) -> Option<&State<K, D>> {
        self.by_name.get(name).map(|id| self.state(*id))
    }

    /// States in registration order, with their handles.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State<K, D>)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(index, state)| (StateId(index), state))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Machine-scope fallback, consulted after the current state's own.
    pub fn fallback(&self) -> &Fallback<K, D> {
        &self.fallback
    }

    /// Route events no state resolves to `to`. Clears any fallback handler.
    pub fn set_fallback_transition(&mut self, to: StateId) -> &mut Self {
        self.fallback = Fallback::Static(to);
        self
    }

    /// Route events no state resolves to whatever `resolver` picks. Clears
    /// any static fallback transition.
    pub fn set_fallback_handler<F>(&mut self, resolver: F) -> &mut Self
    where
        F: Fn(&Context<'_, K, D>) -> Option<StateId> + Send + Sync + 'static,
    {
        let resolver: FallbackResolver<K, D> = Box::new(resolver);
        self.fallback = Fallback::Dynamic(resolver);
        self
    }

    pub fn clear_fallback(&mut self) -> &mut Self {
        self.fallback = Fallback::Unset;
        self
    }

    /// Register an observer of completed transitions.
    ///
    /// Listeners run in registration order after each transition commits, for
    /// every instance of this definition. There is no removal.
    pub fn add_transition_listener<F>(&self, listener: F)
    where
        F: Fn(&Context<'_, K, D>) + Send + Sync + 'static,
    {
        let listener: TransitionListener<K, D> = Arc::new(listener);
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn listeners(&self) -> &Listeners<K, D> {
        &self.listeners
    }

    /// Live machine positioned at `id`. No hook runs.
    pub fn instance(&self, id: StateId) -> StateMachineInstance<'_, K, D> {
        StateMachineInstance::from_state(self, id)
    }

    /// Live machine positioned at the state named `name`. No hook runs.
    pub fn instance_from_name(&self, name: &str) -> Result<StateMachineInstance<'_, K, D>> {
        StateMachineInstance::from_state_name(self, name)
    }
}

impl<K, D> fmt::Debug for StateMachine<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("states", &self.states)
            .field("fallback", &self.fallback)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<K, D> fmt::Display for StateMachine<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_keep_registration_order() {
        let mut machine: StateMachine<&str> = StateMachine::new("order");
        machine.add_state(State::new("C"));
        machine.add_state(State::new("A"));
        machine.add_state(State::new("B"));

        let names: Vec<_> = machine.states().map(|(_, s)| s.name()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(machine.len(), 3);
    }

    #[test]
    fn state_id_looks_up_by_name() {
        let mut machine: StateMachine<&str> = StateMachine::new("lookup");
        let green = machine.add_state(State::new("GREEN"));

        assert_eq!(machine.state_id("GREEN").unwrap(), green);
        assert_eq!(machine.state_by_name("GREEN").map(State::name), Some("GREEN"));
        assert!(machine.state_by_name("BLUE").is_none());
    }

    #[test]
    fn unknown_name_is_state_not_found() {
        let machine: StateMachine<&str> = StateMachine::new("lookup");

        match machine.state_id("BLUE") {
            Err(FsmError::StateNotFound { name }) => assert_eq!(name, "BLUE"),
            other => panic!("Expected StateNotFound, got {other:?}"),
        }
        assert!(matches!(
            machine.instance_from_name("BLUE"),
            Err(FsmError::StateNotFound { .. })
        ));
    }

    #[test]
    fn re_adding_a_name_redefines_in_place() {
        let mut machine: StateMachine<&str> = StateMachine::new("redefine");
        let a = machine.add_state(State::new("A"));
        let b = machine.add_state(State::new("B"));
        machine.state_mut(a).add_transition("go", b);

        let b_again = machine.add_state(State::new("B").on_enter(|_| Ok(())));

        assert_eq!(b, b_again);
        assert_eq!(machine.len(), 2);
        assert!(machine.state(b).has_hook(crate::core::Hook::Enter));
        assert_eq!(machine.state(a).target(&"go"), Some(b));
    }

    #[test]
    fn machine_fallback_is_last_write_wins() {
        let mut machine: StateMachine<&str> = StateMachine::new("fallback");
        let exit = machine.add_state(State::new("EXIT"));

        machine.set_fallback_handler(|_| None);
        machine.set_fallback_transition(exit);
        assert_eq!(machine.fallback().static_target(), Some(exit));

        machine.set_fallback_handler(move |_| Some(exit));
        assert!(machine.fallback().is_dynamic());

        machine.clear_fallback();
        assert!(machine.fallback().is_unset());
    }

    #[test]
    fn listeners_can_be_added_through_shared_reference() {
        let machine: StateMachine<&str> = StateMachine::new("listeners");
        let shared = &machine;
        shared.add_transition_listener(|_| {});
        shared.add_transition_listener(|_| {});
        assert_eq!(machine.listener_count(), 2);
    }
}
