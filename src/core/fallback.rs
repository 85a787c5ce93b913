//! Catch-all transitions used when no keyed transition matches.

use super::context::Context;
use super::state::StateId;
use std::fmt;

/// Computes a fallback target from the firing context.
///
/// Returning `None` means "no opinion": resolution moves on to the next scope.
pub type FallbackResolver<K, D> =
    Box<dyn Fn(&Context<'_, K, D>) -> Option<StateId> + Send + Sync>;

/// Fallback configured for one scope (a state, or the whole machine).
///
/// A scope holds at most one fallback, so setting a static target replaces a
/// resolver and vice versa.
pub enum Fallback<K, D = ()> {
    Unset,
    /// Always route unmatched events to this state.
    Static(StateId),
    /// Let a resolver pick the target.
    Dynamic(FallbackResolver<K, D>),
}

impl<K, D> Fallback<K, D> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }

    pub fn static_target(&self) -> Option<StateId> {
        match self {
            Self::Static(to) => Some(*to),
            _ => None,
        }
    }

    /// Target picked by this fallback for the given context, if any.
    pub fn resolve(&self, ctx: &Context<'_, K, D>) -> Option<StateId> {
        match self {
            Self::Unset => None,
            Self::Static(to) => Some(*to),
            Self::Dynamic(resolver) => resolver(ctx),
        }
    }
}

impl<K, D> Default for Fallback<K, D> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<K, D> fmt::Debug for Fallback<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("Unset"),
            Self::Static(to) => f.debug_tuple("Static").field(to).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
