//! States: named nodes holding transitions, a fallback and hooks.

use super::context::Context;
use super::event::EventKey;
use super::fallback::{Fallback, FallbackResolver};
use crate::error::CallbackError;
use std::collections::HashMap;
use std::fmt;

/// Handle to a state registered in a [`StateMachine`](crate::StateMachine).
///
/// Handles compare by identity: two handles are equal only if they refer to
/// the same registered state. They are only meaningful for the machine that
/// issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Registration index of the state within its machine.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The three hook points of a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Runs when a transition enters the state from a different state.
    Enter,
    /// Runs on every event resolved into the state, self transitions included.
    Event,
    /// Runs when a transition leaves the state for a different state.
    Exit,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enter => "on-enter",
            Self::Event => "on-event",
            Self::Exit => "on-exit",
        })
    }
}

/// Hook invoked with the firing context of the current episode.
pub type Callback<K, D> =
    Box<dyn Fn(&mut Context<'_, K, D>) -> Result<(), CallbackError> + Send + Sync>;

/// A named node of the machine graph.
///
/// States are declared with their hooks and registered with
/// [`StateMachine::add_state`](crate::StateMachine::add_state); transitions
/// are wired afterwards through
/// [`StateMachine::state_mut`](crate::StateMachine::state_mut), once the
/// target handles exist.
///
/// # Example
///
/// ```rust
/// use statewise::{State, StateMachine};
///
/// let mut machine: StateMachine<&str> = StateMachine::new("door");
/// let closed = machine.add_state(State::new("CLOSED"));
/// let open = machine.add_state(State::new("OPEN").on_enter(|_ctx| Ok(())));
///
/// machine.state_mut(closed).add_transition("push", open);
/// machine.state_mut(open).add_transition("pull", closed);
///
/// assert_eq!(machine.state(closed).target(&"push"), Some(open));
/// ```
pub struct State<K, D = ()> {
    name: String,
    transitions: HashMap<K, StateId>,
    fallback: Fallback<K, D>,
    on_enter: Option<Callback<K, D>>,
    on_event: Option<Callback<K, D>>,
    on_exit: Option<Callback<K, D>>,
}

impl<K, D> State<K, D> {
    /// Declare a state with no transitions and no hooks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transitions: HashMap::new(),
            fallback: Fallback::Unset,
            on_enter: None,
            on_event: None,
            on_exit: None,
        }
    }

    /// Hook run when entering this state from a different one.
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, K, D>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.on_enter = Some(Box::new(hook));
        self
    }

    /// Hook run on every event resolved into this state.
    ///
    /// This is the only hook allowed to request a follow-up event through
    /// [`Context::fire`].
    pub fn on_event<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, K, D>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.on_event = Some(Box::new(hook));
        self
    }

    /// Hook run when leaving this state for a different one.
    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_, K, D>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.on_exit = Some(Box::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fallback(&self) -> &Fallback<K, D> {
        &self.fallback
    }

    /// Route unmatched events to `to`. Clears any fallback handler.
    pub fn set_fallback_transition(&mut self, to: StateId) -> &mut Self {
        self.fallback = Fallback::Static(to);
        self
    }

    /// Route unmatched events to whatever `resolver` picks. Clears any static
    /// fallback transition.
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

    pub fn has_hook(&self, hook: Hook) -> bool {
        self.hook(hook).is_some()
    }

    pub(crate) fn hook(&self, hook: Hook) -> Option<&Callback<K, D>> {
        match hook {
            Hook::Enter => self.on_enter.as_ref(),
            Hook::Event => self.on_event.as_ref(),
            Hook::Exit => self.on_exit.as_ref(),
        }
    }

    /// Keyed transitions, in no particular order.
    pub fn transitions(&self) -> impl Iterator<Item = (&K, StateId)> + '_ {
        self.transitions.iter().map(|(key, to)| (key, *to))
    }

    /// True when the state has neither keyed transitions nor a fallback of
    /// its own.
    pub fn is_terminal(&self) -> bool {
        self.transitions.is_empty() && self.fallback.is_unset()
    }
}

impl<K: EventKey, D> State<K, D> {
    /// Add a keyed transition. An existing transition for `key` is replaced.
    pub fn add_transition(&mut self, key: K, to: StateId) -> &mut Self {
        self.transitions.insert(key, to);
        self
    }

    /// Target of the keyed transition for `key`, ignoring fallbacks.
    pub fn target(&self, key: &K) -> Option<StateId> {
        self.transitions.get(key).copied()
    }
}

impl<K, D> fmt::Debug for State<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("transitions", &self.transitions.len())
            .field("fallback", &self.fallback)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_event", &self.on_event.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

impl<K, D> fmt::Display for State<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_terminal() {
        let state: State<&str> = State::new("EXIT");
        assert_eq!(state.name(), "EXIT");
        assert!(state.is_terminal());
        assert!(!state.has_hook(Hook::Enter));
        assert!(!state.has_hook(Hook::Event));
        assert!(!state.has_hook(Hook::Exit));
    }

    #[test]
    fn hooks_are_registered_per_phase() {
        let state: State<&str> = State::new("RED")
            .on_enter(|_| Ok(()))
            .on_exit(|_| Ok(()));

        assert!(state.has_hook(Hook::Enter));
        assert!(!state.has_hook(Hook::Event));
        assert!(state.has_hook(Hook::Exit));
    }

    #[test]
    fn add_transition_replaces_same_key() {
        let mut state: State<&str> = State::new("GREEN");
        state.add_transition("TICK", StateId(1));
        state.add_transition("TICK", StateId(2));

        assert_eq!(state.target(&"TICK"), Some(StateId(2)));
        assert_eq!(state.transitions().count(), 1);
        assert!(!state.is_terminal());
    }

    #[test]
    fn fallback_setters_are_last_write_wins() {
        let mut state: State<&str> = State::new("YELLOW");

        state.set_fallback_transition(StateId(4));
        assert_eq!(state.fallback().static_target(), Some(StateId(4)));

        state.set_fallback_handler(|_| None);
        assert!(state.fallback().is_dynamic());
        assert_eq!(state.fallback().static_target(), None);

        state.set_fallback_transition(StateId(5));
        assert!(!state.fallback().is_dynamic());
        assert_eq!(state.fallback().static_target(), Some(StateId(5)));

        state.clear_fallback();
        assert!(state.is_terminal());
    }

    #[test]
    fn fallback_alone_makes_state_non_terminal() {
        let mut state: State<&str> = State::new("YELLOW");
        state.set_fallback_transition(StateId(0));
        assert!(!state.is_terminal());
    }

    #[test]
    fn hook_display_names() {
        assert_eq!(Hook::Enter.to_string(), "on-enter");
        assert_eq!(Hook::Event.to_string(), "on-event");
        assert_eq!(Hook::Exit.to_string(), "on-exit");
    }
}
