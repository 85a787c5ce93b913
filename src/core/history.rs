//! Transition history recorded by a transition listener.
//!
//! [`TransitionLog`] is a cloneable handle to a shared record list. Attaching
//! it to a machine registers a listener, so every instance built from that
//! definition appends to the same log.

use super::event::EventKey;
use crate::machine::StateMachine;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Record of a single completed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the state the episode started in
    pub from: String,
    /// Name of the state the episode committed to
    pub to: String,
    /// Event key, as displayed
    pub event: String,
    /// When the transition committed
    pub timestamp: DateTime<Utc>,
}

/// Shared, append-only log of completed transitions.
///
/// # Example
///
/// ```rust
/// use statewise::{State, StateMachine, TransitionLog};
///
/// let mut machine: StateMachine<&str> = StateMachine::new("switch");
/// let off = machine.add_state(State::new("OFF"));
/// let on = machine.add_state(State::new("ON"));
/// machine.state_mut(off).add_transition("flip", on);
/// machine.state_mut(on).add_transition("flip", off);
///
/// let log = TransitionLog::new();
/// log.attach(&machine);
///
/// let mut switch = machine.instance(off);
/// switch.fire("flip").unwrap();
/// switch.fire("flip").unwrap();
///
/// assert_eq!(log.path(), vec!["OFF", "ON", "OFF"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransitionLog {
    records: Arc<Mutex<Vec<TransitionRecord>>>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register this log as a transition listener of `machine`.
    pub fn attach<K, D>(&self, machine: &StateMachine<K, D>)
    where
        K: EventKey + 'static,
        D: 'static,
    {
        let log = self.clone();
        machine.add_transition_listener(move |ctx| {
            log.record(TransitionRecord {
                from: ctx.from_state().name().to_string(),
                to: ctx
                    .to_state()
                    .map(|state| state.name().to_string())
                    .unwrap_or_default(),
                event: ctx.key().to_string(),
                timestamp: Utc::now(),
            });
        });
    }

    pub fn record(&self, record: TransitionRecord) {
        self.records.lock().push(record);
    }

    /// Snapshot of all records, oldest first.
    pub fn records(&self) -> Vec<TransitionRecord> {
        self.records.lock().clone()
    }

    /// States traversed: the first record's origin, then every target.
    pub fn path(&self) -> Vec<String> {
        let records = self.records.lock();
        let mut path = Vec::with_capacity(records.len() + 1);
        if let Some(first) = records.first() {
            path.push(first.from.clone());
        }
        path.extend(records.iter().map(|record| record.to.clone()));
        path
    }

    /// Time between the first and last record, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let records = self.records.lock();
        let (first, last) = (records.first()?, records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: &str, to: &str, timestamp: DateTime<Utc>) -> TransitionRecord {
        TransitionRecord {
            from: from.into(),
            to: to.into(),
            event: "TICK".into(),
            timestamp,
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log = TransitionLog::new();
        assert!(log.is_empty());
        assert!(log.path().is_empty());
        assert!(log.duration().is_none());
    }

    #[test]
    fn clones_share_records() {
        let log = TransitionLog::new();
        let other = log.clone();

        other.record(record("GREEN", "YELLOW", Utc::now()));

        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].to, "YELLOW");
    }

    #[test]
    fn path_follows_records() {
        let log = TransitionLog::new();
        log.record(record("GREEN", "YELLOW", Utc::now()));
        log.record(record("YELLOW", "RED", Utc::now()));

        assert_eq!(log.path(), vec!["GREEN", "YELLOW", "RED"]);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let log = TransitionLog::new();
        log.record(record("GREEN", "YELLOW", start));
        log.record(record(
            "YELLOW",
            "RED",
            start + chrono::Duration::milliseconds(250),
        ));

        assert_eq!(log.duration(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn clear_empties_the_log() {
        let log = TransitionLog::new();
        log.record(record("GREEN", "YELLOW", Utc::now()));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn records_serialize_to_json() {
        let original = record("GREEN", "YELLOW", Utc::now());
        let json = serde_json::to_string(&original).unwrap();
        let decoded: TransitionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }
}
