//! Events submitted to a state machine.
//!
//! An event is a key matched against transition tables plus an optional
//! payload that every hook of the firing episode can read.

use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// Bound for values usable as event keys.
///
/// Keys are matched by equality and hashing, and rendered with `Display` in
/// errors and graph labels. Strings and the enums declared with
/// [`event_keys!`](crate::event_keys) satisfy it.
pub trait EventKey: Eq + Hash + Clone + fmt::Display {}

impl<T> EventKey for T where T: Eq + Hash + Clone + fmt::Display {}

/// A command-style payload that knows which event it fires.
///
/// Firing a command uses `kind()` as the event key and the command itself as
/// the event data, so hooks can read the command back from the context.
///
/// # Example
///
/// ```rust
/// use statewise::core::Eventer;
///
/// #[derive(Clone)]
/// enum TripCommand {
///     Book { id: String },
///     Complete,
/// }
///
/// impl Eventer<&'static str> for TripCommand {
///     fn kind(&self) -> &'static str {
///         match self {
///             Self::Book { .. } => "book",
///             Self::Complete => "complete",
///         }
///     }
/// }
///
/// assert_eq!(TripCommand::Complete.kind(), "complete");
/// ```
pub trait Eventer<K> {
    /// The event key this command is dispatched under.
    fn kind(&self) -> K;
}

/// An event key together with its optional payload.
///
/// # Example
///
/// ```rust
/// use statewise::core::Event;
///
/// let event = Event::new("TICK").with_data(3u32);
/// assert_eq!(event.key(), &"TICK");
/// assert_eq!(event.data(), Some(&3));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Event<K, D = ()> {
    key: K,
    data: Option<D>,
}

impl<K, D> Event<K, D> {
    /// Create an event without payload.
    pub fn new(key: K) -> Self {
        Self { key, data: None }
    }

    /// Attach a payload, replacing any previous one.
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Build an event from a command, using it as both key source and payload.
    pub fn from_command(command: D) -> Self
    where
        D: Eventer<K>,
    {
        Self {
            key: command.kind(),
            data: Some(command),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    pub fn into_parts(self) -> (K, Option<D>) {
        (self.key, self.data)
    }
}

/// Returned when parsing an event key declared with
/// [`event_keys!`](crate::event_keys) from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown event key '{0}'")]
pub struct UnknownEventKey(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Pay {
        amount: u32,
    }

    impl Eventer<&'static str> for Pay {
        fn kind(&self) -> &'static str {
            "pay"
        }
    }

    #[test]
    fn new_event_has_no_data() {
        let event: Event<&str> = Event::new("TICK");
        assert_eq!(event.key(), &"TICK");
        assert!(event.data().is_none());
    }

    #[test]
    fn with_data_replaces_payload() {
        let event = Event::new("TICK").with_data(1).with_data(2);
        assert_eq!(event.data(), Some(&2));
    }

    #[test]
    fn command_becomes_key_and_payload() {
        let event = Event::from_command(Pay { amount: 12 });

        assert_eq!(event.key(), &"pay");
        assert_eq!(event.data(), Some(&Pay { amount: 12 }));

        let (key, data) = event.into_parts();
        assert_eq!(key, "pay");
        assert_eq!(data.map(|p| p.amount), Some(12));
    }
}
