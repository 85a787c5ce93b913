//! The firing envelope handed to hooks, fallback resolvers and listeners.

use super::event::Event;
use super::state::{Hook, State, StateId};
use crate::error::{FsmError, Result};
use crate::machine::StateMachine;
use std::fmt;

/// Context of one firing episode.
///
/// Hooks receive it mutably, fallback resolvers and transition listeners
/// read-only. The engine sets `from` when the episode starts and `to` once
/// the target has been resolved; callers can only read them.
pub struct Context<'m, K, D = ()> {
    machine: &'m StateMachine<K, D>,
    event: Event<K, D>,
    from: StateId,
    to: Option<StateId>,
    hook: Option<Hook>,
    follow_up: Option<Event<K, D>>,
}

impl<'m, K, D> Context<'m, K, D> {
    pub(crate) fn new(machine: &'m StateMachine<K, D>, from: StateId, event: Event<K, D>) -> Self {
        Self {
            machine,
            event,
            from,
            to: None,
            hook: None,
            follow_up: None,
        }
    }

    pub fn machine(&self) -> &'m StateMachine<K, D> {
        self.machine
    }

    pub fn event(&self) -> &Event<K, D> {
        &self.event
    }

    pub fn key(&self) -> &K {
        self.event.key()
    }

    pub fn data(&self) -> Option<&D> {
        self.event.data()
    }

    /// State the episode started in.
    pub fn from(&self) -> StateId {
        self.from
    }

    pub fn from_state(&self) -> &'m State<K, D> {
        self.machine.state(self.from)
    }

    /// Resolved target; `None` while fallbacks are still being resolved.
    pub fn to(&self) -> Option<StateId> {
        self.to
    }

    pub fn to_state(&self) -> Option<&'m State<K, D>> {
        self.to.map(|to| self.machine.state(to))
    }

    /// Hook currently running, or `None` outside of hooks.
    pub fn hook(&self) -> Option<Hook> {
        self.hook
    }

    /// Follow-up event requested so far in this episode.
    pub fn follow_up(&self) -> Option<&Event<K, D>> {
        self.follow_up.as_ref()
    }

    /// Request a follow-up event, fired right after this episode commits.
    ///
    /// Only valid inside an on-event hook; inside on-enter or on-exit it fails
    /// with [`FsmError::InvalidCallSite`] naming that hook. A mutable context
    /// is never handed out between hooks. A second request in the same hook
    /// replaces the first.
    pub fn fire_event(&mut self, event: Event<K, D>) -> Result<()> {
        match self.hook {
            Some(Hook::Event) => {
                self.follow_up = Some(event);
                Ok(())
            }
            Some(hook) => Err(FsmError::InvalidCallSite { hook }),
            // Unreachable from outside the crate: resolvers and listeners get
            // `&Context`, and only hooks are handed `&mut Context`. The hook
            // named here is a placeholder, not the caller.
            None => Err(FsmError::InvalidCallSite { hook: Hook::Enter }),
        }
    }

    /// Request a follow-up event with an explicit payload.
    pub fn fire_with(&mut self, key: K, data: D) -> Result<()> {
        self.fire_event(Event::new(key).with_data(data))
    }

    pub(crate) fn set_target(&mut self, to: StateId) {
        self.to = Some(to);
    }

    pub(crate) fn enter_hook(&mut self, hook: Hook) {
        self.hook = Some(hook);
    }

    pub(crate) fn leave_hook(&mut self) {
        self.hook = None;
    }

    pub(crate) fn take_follow_up(&mut self) -> Option<Event<K, D>> {
        self.follow_up.take()
    }
}

impl<K, D: Clone> Context<'_, K, D> {
    /// Request a follow-up event carrying forward the current payload.
    pub fn fire(&mut self, key: K) -> Result<()> {
        let event = match self.event.data() {
            Some(data) => Event::new(key).with_data(data.clone()),
            None => Event::new(key),
        };
        self.fire_event(event)
    }
}

impl<K: fmt::Debug, D> fmt::Debug for Context<'_, K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("machine", &self.machine.name())
            .field("key", self.event.key())
            .field("from", &self.from_state().name())
            .field("to", &self.to_state().map(State::name))
            .field("hook", &self.hook)
            .finish()
    }
}
