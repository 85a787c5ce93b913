//! Transition resolution and firing episodes.
//!
//! One episode resolves the target, runs exit, enter and event hooks, commits
//! the new current state and notifies listeners. A follow-up event requested
//! by the on-event hook starts the next episode from the committed state.

use super::definition::StateMachine;
use crate::core::{Context, Event, EventKey, Hook, StateId};
use crate::error::{FsmError, Result};
use tracing::{debug, trace};

impl<K: EventKey, D> StateMachine<K, D> {
    /// Resolve the target of the context's event from its `from` state.
    ///
    /// First match wins: the state's keyed transition, the state's fallback,
    /// then the machine's fallback. A dynamic fallback returning `None` passes
    /// on to the next scope. A target handle issued by another machine does
    /// not resolve.
    pub fn resolve(&self, ctx: &Context<'_, K, D>) -> Result<StateId> {
        let current = self.state(ctx.from());

        let resolved = match current.target(ctx.key()) {
            Some(to) => Some((to, "keyed transition")),
            None => current
                .fallback()
                .resolve(ctx)
                .map(|to| (to, "state fallback"))
                .or_else(|| self.fallback().resolve(ctx).map(|to| (to, "machine fallback"))),
        };

        match resolved {
            Some((to, by)) if to.index() < self.len() => {
                trace!(
                    machine = %self.name(),
                    state = %current.name(),
                    event = %ctx.key(),
                    to = %self.state(to).name(),
                    by,
                    "Resolved target"
                );
                return Ok(to);
            }
            Some((to, by)) => debug!(
                machine = %self.name(),
                state = %current.name(),
                event = %ctx.key(),
                target = to.index(),
                by,
                "Target is not a state of this machine"
            ),
            None => debug!(
                machine = %self.name(),
                state = %current.name(),
                event = %ctx.key(),
                "No transition found"
            ),
        }

        Err(FsmError::TransitionNotFound {
            state: current.name().to_string(),
            event: ctx.key().to_string(),
        })
    }

    /// Fire `event` from `*current`, following chained events until none is
    /// requested.
    ///
    /// `*current` is only written when an episode commits, so on error it
    /// holds the last committed state.
    pub(crate) fn dispatch(&self, current: &mut StateId, event: Event<K, D>) -> Result<()> {
        let mut pending = Some(event);
        while let Some(event) = pending.take() {
            pending = self.episode(current, event)?;
            if let Some(next) = &pending {
                trace!(machine = %self.name(), event = %next.key(), "Chaining follow-up event");
            }
        }
        Ok(())
    }

    fn episode(&self, current: &mut StateId, event: Event<K, D>) -> Result<Option<Event<K, D>>> {
        let mut ctx = Context::new(self, *current, event);
        let next = self.resolve(&ctx)?;
        ctx.set_target(next);

        if next != *current {
            self.run_hook(*current, Hook::Exit, &mut ctx)?;
            self.run_hook(next, Hook::Enter, &mut ctx)?;
        }
        self.run_hook(next, Hook::Event, &mut ctx)?;

        *current = next;
        debug!(
            machine = %self.name(),
            from = %ctx.from_state().name(),
            to = %self.state(next).name(),
            event = %ctx.key(),
            "Transition committed"
        );

        self.listeners().notify(&ctx);
        Ok(ctx.take_follow_up())
    }

    fn run_hook(&self, id: StateId, hook: Hook, ctx: &mut Context<'_, K, D>) -> Result<()> {
        let state = self.state(id);
        let Some(callback) = state.hook(hook) else {
            return Ok(());
        };

        trace!(machine = %self.name(), state = %state.name(), %hook, event = %ctx.key(), "Running hook");
        ctx.enter_hook(hook);
        let outcome = callback(&mut *ctx);
        ctx.leave_hook();

        outcome.map_err(|source| {
            debug!(machine = %self.name(), state = %state.name(), %hook, error = %source, "Hook failed");
            // Engine errors raised inside the hook, such as a misplaced
            // follow-up request, surface unwrapped.
            match source.downcast::<FsmError>() {
                Ok(inner) => *inner,
                Err(source) => FsmError::Callback {
                    state: state.name().to_string(),
                    hook,
                    source,
                },
            }
        })
    }
}
